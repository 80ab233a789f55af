pub mod classify;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod extraction;
pub mod migrations;
pub mod rewards;
pub mod scan;
pub mod setup;
pub mod state;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
