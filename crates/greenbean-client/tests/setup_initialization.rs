use std::fs;

use greenbean_client::setup::ensure_initialized_at;
use rusqlite::Connection;
use tempfile::tempdir;

fn object_exists(connection: &Connection, object_type: &str, object_name: &str) -> bool {
    connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [object_type, object_name],
            |_| Ok(()),
        )
        .is_ok()
}

fn meta_value(connection: &Connection, key: &str) -> Option<String> {
    connection
        .query_row(
            "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .ok()
}

#[test]
fn setup_creates_rewards_db_at_home_override() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("greenbean-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            assert!(setup_context.db_path.ends_with("rewards.db"));
            assert_eq!(setup_context.schema_version, "v1");
            assert!(home.join("rewards.db").exists());
        }
    }
}

#[test]
fn setup_is_idempotent_for_existing_store() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("greenbean-home");

        let first = ensure_initialized_at(&home);
        assert!(first.is_ok());
        let second = ensure_initialized_at(&home);
        assert!(second.is_ok());

        if let (Ok(first_context), Ok(second_context)) = (first, second) {
            assert_eq!(first_context.db_path, second_context.db_path);
            assert_eq!(first_context.schema_version, second_context.schema_version);
        }
    }
}

#[test]
fn setup_creates_core_tables() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("greenbean-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                assert!(object_exists(&conn, "table", "internal_meta"));
                assert!(object_exists(&conn, "table", "rewards_kv"));
            }
        }
    }
}

#[test]
fn setup_repairs_missing_schema_version_key() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("greenbean-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                let delete_result = conn.execute(
                    "DELETE FROM internal_meta WHERE key = ?1",
                    ["schema_version"],
                );
                assert!(delete_result.is_ok());
            }

            let repaired = ensure_initialized_at(&home);
            assert!(repaired.is_ok());

            let verify_connection = Connection::open(&setup_context.db_path);
            assert!(verify_connection.is_ok());
            if let Ok(conn) = verify_connection {
                assert_eq!(meta_value(&conn, "schema_version"), Some("v1".to_string()));
            }
        }
    }
}

#[test]
fn setup_fails_when_rewards_table_missing() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("greenbean-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                let drop_result = conn.execute_batch("DROP TABLE rewards_kv;");
                assert!(drop_result.is_ok());
            }

            let failed = ensure_initialized_at(&home);
            assert!(failed.is_err());
            if let Err(error) = failed {
                assert_eq!(error.code, "store_corrupt");
            }
        }
    }
}

#[test]
fn setup_maps_locked_database_to_store_locked() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("greenbean-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                let begin_lock = conn.execute_batch("BEGIN EXCLUSIVE;");
                assert!(begin_lock.is_ok());

                let locked_error = ensure_initialized_at(&home);
                assert!(locked_error.is_err());
                if let Err(error) = locked_error {
                    assert_eq!(error.code, "store_locked");
                }

                let rollback = conn.execute_batch("ROLLBACK;");
                assert!(rollback.is_ok());
            }
        }
    }
}

#[test]
fn setup_maps_corrupt_database_to_store_corrupt() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("greenbean-home");
        let create_home = fs::create_dir_all(&home);
        assert!(create_home.is_ok());

        let write_file = fs::write(home.join("rewards.db"), "not-a-sqlite-database");
        assert!(write_file.is_ok());

        let result = ensure_initialized_at(&home);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "store_corrupt");
        }
    }
}
