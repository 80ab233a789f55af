use std::path::PathBuf;

use greenbean_client::commands::activity::{self, ActivityOptions};
use greenbean_client::commands::rewards::{self, RewardsOptions};
use greenbean_client::rewards::{RewardsEngine, RewardsStore, SqliteRewardsStore};
use greenbean_client::setup::ensure_initialized_at;
use serde_json::{Value, json};
use tempfile::tempdir;

fn temp_home() -> std::io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempdir()?;
    let home = dir.path().join("greenbean-home");
    Ok((dir, home))
}

fn options(home: &std::path::Path) -> RewardsOptions<'_> {
    RewardsOptions {
        home_override: Some(home),
    }
}

fn rewards_of(data: &Value) -> &Value {
    &data["rewards"]
}

#[test]
fn fresh_home_shows_empty_rewards() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let result = rewards::show_with_options(options(&home));
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.command, "rewards show");
            let view = rewards_of(&envelope.data);
            assert_eq!(view["total_points"], json!(0));
            assert_eq!(view["current_badge"], Value::Null);
            assert_eq!(view["has_received_first_purchase_bonus"], json!(false));
            assert_eq!(view["next_badge"]["label"], json!("Planet Caretaker"));
            assert_eq!(view["next_badge"]["points_to_go"], json!(100));
        }
    }
}

#[test]
fn earned_points_persist_across_invocations() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let first = rewards::earn_with_options(12.40, None, options(&home));
        assert!(first.is_ok());
        if let Ok(envelope) = first {
            assert_eq!(envelope.data["points_awarded"], json!(110));
            assert_eq!(
                rewards_of(&envelope.data)["current_badge"],
                json!("Planet Caretaker")
            );
        }

        let second = rewards::earn_with_options(10.0, None, options(&home));
        assert!(second.is_ok());
        if let Ok(envelope) = second {
            assert_eq!(envelope.data["points_awarded"], json!(50));
            assert_eq!(rewards_of(&envelope.data)["total_points"], json!(160));
        }

        let shown = rewards::show_with_options(options(&home));
        assert!(shown.is_ok());
        if let Ok(envelope) = shown {
            let view = rewards_of(&envelope.data);
            assert_eq!(view["total_points"], json!(160));
            assert_eq!(view["bonuses_granted"], json!(["first_purchase"]));
        }
    }
}

#[test]
fn reset_persists_and_regrants_first_purchase_bonus() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let earned = rewards::earn_with_options(80.0, Some("birthday".to_string()), options(&home));
        assert!(earned.is_ok());
        if let Ok(envelope) = earned {
            assert_eq!(
                rewards_of(&envelope.data)["current_badge"],
                json!("Ecological Hero")
            );
        }

        let reset = rewards::reset_with_options(options(&home));
        assert!(reset.is_ok());

        let shown = rewards::show_with_options(options(&home));
        assert!(shown.is_ok());
        if let Ok(envelope) = shown {
            assert_eq!(rewards_of(&envelope.data)["total_points"], json!(0));
            assert_eq!(rewards_of(&envelope.data)["current_badge"], Value::Null);
        }

        let after = rewards::earn_with_options(20.0, None, options(&home));
        assert!(after.is_ok());
        if let Ok(envelope) = after {
            assert_eq!(rewards_of(&envelope.data)["total_points"], json!(150));
            assert_eq!(
                rewards_of(&envelope.data)["current_badge"],
                json!("Planet Caretaker")
            );
        }
    }
}

#[test]
fn negative_amount_is_rejected_without_touching_state() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let result = rewards::earn_with_options(-3.0, None, options(&home));
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
        }

        let shown = rewards::show_with_options(options(&home));
        assert!(shown.is_ok());
        if let Ok(envelope) = shown {
            assert_eq!(rewards_of(&envelope.data)["total_points"], json!(0));
        }
    }
}

#[test]
fn first_reminder_bonus_is_granted_once() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let first = activity::reminder_with_options(ActivityOptions {
            home_override: Some(&home),
        });
        assert!(first.is_ok());
        if let Ok(envelope) = first {
            assert_eq!(envelope.command, "activity reminder");
            assert_eq!(envelope.data["points_awarded"], json!(100));
            assert_eq!(
                rewards_of(&envelope.data)["current_badge"],
                json!("Planet Caretaker")
            );
        }

        let second = activity::reminder_with_options(ActivityOptions {
            home_override: Some(&home),
        });
        assert!(second.is_ok());
        if let Ok(envelope) = second {
            assert_eq!(envelope.data["points_awarded"], json!(0));
            assert_eq!(rewards_of(&envelope.data)["total_points"], json!(100));
        }
    }
}

#[test]
fn medicine_log_awards_each_distinct_name_once() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let log = |name: &str| {
            activity::medicine_with_options(
                name,
                ActivityOptions {
                    home_override: Some(&home),
                },
            )
        };

        let first = log("Ibuprofen");
        assert!(first.is_ok());
        if let Ok(envelope) = first {
            assert_eq!(envelope.data["points_awarded"], json!(50));
            assert_eq!(envelope.data["subject"], json!("Ibuprofen"));
        }

        let repeat = log("  ibuprofen ");
        assert!(repeat.is_ok());
        if let Ok(envelope) = repeat {
            assert_eq!(envelope.data["points_awarded"], json!(0));
        }

        let other = log("Loratadine");
        assert!(other.is_ok());
        if let Ok(envelope) = other {
            assert_eq!(envelope.data["points_awarded"], json!(50));
            assert_eq!(rewards_of(&envelope.data)["medicines_logged"], json!(2));
        }

        let blank = log("   ");
        assert!(blank.is_err());
    }
}

#[test]
fn sqlite_store_round_trips_engine_state() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let setup = ensure_initialized_at(&home);
        assert!(setup.is_ok());
        if let Ok(context) = setup {
            let engine = RewardsEngine::open(SqliteRewardsStore::new(&context.db_path));
            assert!(engine.is_ok());
            if let Ok(engine) = engine {
                assert!(engine.award_purchase(100.0, None).is_ok());
                assert!(engine.log_medicine("Aspirin").is_ok());

                let reloaded = SqliteRewardsStore::new(&context.db_path).load();
                assert!(reloaded.is_ok());
                if let Ok(state) = reloaded {
                    assert_eq!(state, engine.state());
                    assert_eq!(state.total_points, 600);
                    assert_eq!(state.current_badge.as_deref(), Some("Ecological Hero"));
                }
            }
        }
    }
}

#[test]
fn engines_sharing_a_database_keep_each_others_points() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let setup = ensure_initialized_at(&home);
        assert!(setup.is_ok());
        if let Ok(context) = setup {
            let first = RewardsEngine::open(SqliteRewardsStore::new(&context.db_path));
            let second = RewardsEngine::open(SqliteRewardsStore::new(&context.db_path));
            assert!(first.is_ok() && second.is_ok());
            if let (Ok(first), Ok(second)) = (first, second) {
                let earlier = first.compute_points(20.0, None);
                assert_eq!(earlier.map(|state| state.total_points).ok(), Some(150));

                // `second` was opened before `first` wrote anything.
                let later = second.award_purchase(20.0, None);
                assert!(later.is_ok());
                if let Ok(outcome) = later {
                    assert_eq!(outcome.points_awarded, 100);
                    assert_eq!(outcome.state.total_points, 250);
                }

                let reloaded = SqliteRewardsStore::new(&context.db_path).load();
                assert_eq!(reloaded.map(|state| state.total_points).ok(), Some(250));
            }
        }
    }
}

#[test]
fn engines_on_parallel_threads_sum_every_purchase() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let setup = ensure_initialized_at(&home);
        assert!(setup.is_ok());
        if let Ok(context) = setup {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let db_path = context.db_path.clone();
                    std::thread::spawn(move || {
                        let engine = RewardsEngine::open(SqliteRewardsStore::new(&db_path));
                        assert!(engine.is_ok());
                        if let Ok(engine) = engine {
                            for _ in 0..10 {
                                assert!(engine.compute_points(1.0, None).is_ok());
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                assert!(handle.join().is_ok());
            }

            // 20 purchases at 5 points plus one first-purchase bonus.
            let reloaded = SqliteRewardsStore::new(&context.db_path).load();
            assert_eq!(reloaded.map(|state| state.total_points).ok(), Some(150));
        }
    }
}

#[test]
fn saturated_points_reload_without_corruption() {
    let temp = temp_home();
    assert!(temp.is_ok());
    if let Ok((_temp, home)) = temp {
        let huge = rewards::earn_with_options(2e18, None, options(&home));
        assert!(huge.is_ok());
        if let Ok(envelope) = huge {
            assert_eq!(rewards_of(&envelope.data)["total_points"], json!(i64::MAX));
        }

        let shown = rewards::show_with_options(options(&home));
        assert!(shown.is_ok());
        if let Ok(envelope) = shown {
            let view = rewards_of(&envelope.data);
            assert_eq!(view["total_points"], json!(i64::MAX));
            assert_eq!(view["current_badge"], json!("Sustainability Champion"));
        }
    }
}
