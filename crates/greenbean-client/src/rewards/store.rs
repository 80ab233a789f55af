use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rusqlite::{Connection, TransactionBehavior, params};

use super::{BonusKind, RewardsState};
use crate::state::{map_sqlite_error, open_connection};
use crate::{ClientError, ClientResult};

const TOTAL_POINTS_KEY: &str = "total_points";
const CURRENT_BADGE_KEY: &str = "current_badge";
const UPDATED_AT_KEY: &str = "updated_at";
const BONUS_KEY_PREFIX: &str = "bonus_granted:";
const MEDICINE_KEY_PREFIX: &str = "medicine:";

/// Durable home for the single `RewardsState` record.
pub trait RewardsStore: Send + Sync {
    fn load(&self) -> ClientResult<RewardsState>;

    /// Reads the stored state, runs `mutate` on it and writes the result as
    /// one atomic step, so concurrent writers never overwrite each other.
    /// Must either persist the whole state or fail without partial writes.
    fn update<F, T>(&self, mutate: F) -> ClientResult<(RewardsState, T)>
    where
        F: FnOnce(&mut RewardsState) -> T;
}

/// Key-value record in the `rewards_kv` table of the rewards database.
#[derive(Debug, Clone)]
pub struct SqliteRewardsStore {
    db_path: PathBuf,
}

impl SqliteRewardsStore {
    /// `db_path` must point at a database prepared by `setup::ensure_initialized*`.
    pub fn new(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn read_state(&self, connection: &Connection) -> ClientResult<RewardsState> {
        let mut statement = connection
            .prepare("SELECT key, value FROM rewards_kv ORDER BY key")
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        let rows = statement
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut state = RewardsState::default();
        for row in rows {
            let (key, value) = row.map_err(|error| map_sqlite_error(&self.db_path, &error))?;
            apply_record(&mut state, &key, &value)
                .ok_or_else(|| ClientError::store_corrupt(&self.db_path))?;
        }

        if state.total_points < 0 {
            return Err(ClientError::store_corrupt(&self.db_path));
        }

        Ok(state)
    }

    fn write_state(&self, connection: &Connection, state: &RewardsState) -> ClientResult<()> {
        connection
            .execute("DELETE FROM rewards_kv", [])
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        for (key, value) in state_records(state) {
            connection
                .execute(
                    "INSERT INTO rewards_kv (key, value) VALUES (?1, ?2)",
                    params![key, value],
                )
                .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        }
        Ok(())
    }
}

impl RewardsStore for SqliteRewardsStore {
    fn load(&self) -> ClientResult<RewardsState> {
        let connection = open_connection(&self.db_path)?;
        self.read_state(&connection)
    }

    fn update<F, T>(&self, mutate: F) -> ClientResult<(RewardsState, T)>
    where
        F: FnOnce(&mut RewardsState) -> T,
    {
        let mut connection = open_connection(&self.db_path)?;
        // IMMEDIATE takes the write lock before the read, so another process
        // cannot commit between our read and our write.
        let transaction = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;

        let mut state = self.read_state(&transaction)?;
        let output = mutate(&mut state);
        self.write_state(&transaction, &state)?;

        transaction
            .commit()
            .map_err(|error| map_sqlite_error(&self.db_path, &error))?;
        Ok((state, output))
    }
}

fn state_records(state: &RewardsState) -> Vec<(String, String)> {
    let mut records = vec![
        (TOTAL_POINTS_KEY.to_string(), state.total_points.to_string()),
        (UPDATED_AT_KEY.to_string(), chrono::Utc::now().to_rfc3339()),
    ];
    if let Some(badge) = &state.current_badge {
        records.push((CURRENT_BADGE_KEY.to_string(), badge.clone()));
    }
    for kind in &state.bonuses_granted {
        records.push((format!("{BONUS_KEY_PREFIX}{}", kind.as_str()), "true".to_string()));
    }
    for medicine in &state.logged_medicines {
        records.push((format!("{MEDICINE_KEY_PREFIX}{medicine}"), "true".to_string()));
    }
    records
}

fn apply_record(state: &mut RewardsState, key: &str, value: &str) -> Option<()> {
    if key == TOTAL_POINTS_KEY {
        state.total_points = value.parse::<i64>().ok()?;
    } else if key == CURRENT_BADGE_KEY {
        state.current_badge = Some(value.to_string());
    } else if key == UPDATED_AT_KEY {
        // informational only
    } else if let Some(kind) = key.strip_prefix(BONUS_KEY_PREFIX) {
        if value == "true" {
            state.bonuses_granted.insert(BonusKind::parse(kind)?);
        }
    } else if let Some(medicine) = key.strip_prefix(MEDICINE_KEY_PREFIX) {
        state.logged_medicines.insert(medicine.to_string());
    } else {
        return None;
    }
    Some(())
}

/// Process-local store, handy for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryRewardsStore {
    saved: Mutex<Option<RewardsState>>,
}

impl MemoryRewardsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RewardsState) -> Self {
        Self {
            saved: Mutex::new(Some(state)),
        }
    }

    pub fn snapshot(&self) -> Option<RewardsState> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RewardsStore for MemoryRewardsStore {
    fn load(&self) -> ClientResult<RewardsState> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn update<F, T>(&self, mutate: F) -> ClientResult<(RewardsState, T)>
    where
        F: FnOnce(&mut RewardsState) -> T,
    {
        let mut saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
        let mut state = saved.clone().unwrap_or_default();
        let output = mutate(&mut state);
        *saved = Some(state.clone());
        Ok((state, output))
    }
}
