pub mod activity;
pub mod allow_list;
pub mod classify;
pub(crate) mod common;
pub mod rewards;
pub mod scan;
