use std::path::Path;

use crate::ClientResult;
use crate::commands::common::load_allow_list;
use crate::config::AppConfig;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{AllowListData, AllowListEntry};
use crate::state::resolve_home;

#[derive(Debug, Default)]
pub struct AllowListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn show() -> ClientResult<SuccessEnvelope> {
    show_with_options(AllowListOptions::default())
}

#[doc(hidden)]
pub fn show_with_options(options: AllowListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let home = resolve_home(options.home_override)?;
    let config = AppConfig::load(Some(&home))?;
    let allow_list = load_allow_list(&config)?;

    let entries = allow_list
        .entries()
        .iter()
        .map(|(name, counts)| AllowListEntry {
            name: name.clone(),
            counts: *counts,
        })
        .collect::<Vec<AllowListEntry>>();

    success(
        "allow-list show",
        AllowListData {
            source: allow_list.source().describe(),
            total: entries.len(),
            entries,
        },
    )
}
