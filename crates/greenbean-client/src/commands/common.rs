use std::path::Path;

use crate::ClientResult;
use crate::classify::AllowList;
use crate::config::AppConfig;
use crate::rewards::{RewardsEngine, SqliteRewardsStore};
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};

pub(crate) fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    match home_override {
        Some(home) => ensure_initialized_at(home),
        None => ensure_initialized(),
    }
}

pub(crate) fn open_engine(setup: &SetupContext) -> ClientResult<RewardsEngine<SqliteRewardsStore>> {
    RewardsEngine::open(SqliteRewardsStore::new(&setup.db_path))
}

pub(crate) fn load_allow_list(config: &AppConfig) -> ClientResult<AllowList> {
    let allow_list = AllowList::load(&config.allow_list)?;
    tracing::debug!(
        source = %config.allow_list.describe(),
        entries = allow_list.len(),
        "allow-list loaded"
    );
    Ok(allow_list)
}
