// tests/settings_shop_test.rs
//
// Catalog configuration, preferences and the reward shop.

mod common;

use common::{adhoc, count, day, seeded_db, task};
use gamify_lib::models::{
    Difficulty, DifficultyMultipliers, FrontUpdate, NewFront, NewPieceType, NewReward,
    PieceTypeUpdate, PurchaseOutcome, TaskStatus, Tier, TierMultipliers,
};
use gamify_lib::{repository, settings, shop, tracker, TrackerError};

fn reward_id(conn: &rusqlite::Connection, name: &str) -> i64 {
    shop::list_rewards(conn)
        .unwrap()
        .into_iter()
        .find(|r| r.name == name)
        .map(|r| r.id)
        .expect("seeded reward")
}

#[test]
fn new_front_gets_baseline_multipliers() {
    let conn = seeded_db();
    settings::add_front(&conn, &NewFront::new("chess", "Chess")).unwrap();

    let front = repository::get_front(&conn, "chess").unwrap().unwrap();
    assert_eq!(front.tiers, TierMultipliers::default());
    assert_eq!(front.difficulties, DifficultyMultipliers::default());
    assert_eq!(front.weight, 1.0);
    assert_eq!(settings::list_fronts(&conn).unwrap().len(), 7);
}

#[test]
fn duplicate_codes_are_named_conflicts() {
    let conn = seeded_db();
    let err = settings::add_front(&conn, &NewFront::new("sport", "Sport again")).unwrap_err();
    assert!(matches!(err, TrackerError::DuplicateCode { kind: "Front", .. }));

    let piece = NewPieceType {
        front_code: "books".into(),
        code: "SportStrength".into(),
        name: "Clash".into(),
        tier: Tier::Daily,
        base_xp: 10.0,
    };
    let err = settings::add_piece_type(&conn, &piece).unwrap_err();
    match err {
        TrackerError::DuplicateCode { kind, code } => {
            assert_eq!(kind, "Piece type");
            assert_eq!(code, "SportStrength");
        }
        other => panic!("expected a duplicate code, got {:?}", other),
    }
}

#[test]
fn piece_type_needs_an_existing_front() {
    let conn = seeded_db();
    let piece = NewPieceType {
        front_code: "nowhere".into(),
        code: "Orphan".into(),
        name: "Orphan".into(),
        tier: Tier::Weekly,
        base_xp: 10.0,
    };
    assert!(matches!(
        settings::add_piece_type(&conn, &piece),
        Err(TrackerError::NotFound { .. })
    ));
}

#[test]
fn piece_type_edits_change_future_rewards_only() {
    let conn = seeded_db();
    let before = tracker::log_task(
        &conn,
        &task("sport", "SportStrength", Tier::Daily, 2, TaskStatus::Done),
    )
    .unwrap();

    settings::update_piece_type(
        &conn,
        "SportStrength",
        &PieceTypeUpdate {
            name: "Heavy strength".into(),
            tier: Tier::Daily,
            base_xp: 60.0,
        },
    )
    .unwrap();
    let after = tracker::log_task(
        &conn,
        &task("sport", "SportStrength", Tier::Daily, 2, TaskStatus::Done),
    )
    .unwrap();

    assert_eq!(after.xp_delta, 60.0);
    let frozen = repository::get_task(&conn, before.task_id).unwrap().unwrap();
    assert_eq!(frozen.total_xp, 40.0);

    let daily = settings::list_piece_types(&conn, "sport", Tier::Daily).unwrap();
    assert_eq!(daily.len(), 5);
    assert!(daily.windows(2).all(|w| w[0].base_xp <= w[1].base_xp));
    assert_eq!(daily.last().unwrap().name, "Heavy strength");

    settings::delete_piece_type(&conn, "SportStrength").unwrap();
    assert!(matches!(
        settings::delete_piece_type(&conn, "SportStrength"),
        Err(TrackerError::NotFound { .. })
    ));
}

#[test]
fn multiplier_update_is_not_retroactive() {
    let conn = seeded_db();
    let first = tracker::log_task(
        &conn,
        &task("sport", "SportStrength", Tier::Daily, 2, TaskStatus::Done),
    )
    .unwrap();

    let tiers = TierMultipliers {
        daily: 2.0,
        ..TierMultipliers::default()
    };
    let difficulties = DifficultyMultipliers([0.5, 1.5, 1.5, 2.0, 3.0]);
    settings::update_front_multipliers(&conn, "sport", &tiers, &difficulties).unwrap();

    let second = tracker::log_task(
        &conn,
        &task("sport", "SportStrength", Tier::Daily, 2, TaskStatus::Done),
    )
    .unwrap();
    assert_eq!(second.xp_delta, 120.0);
    assert_eq!(
        repository::get_task(&conn, first.task_id).unwrap().unwrap().total_xp,
        40.0
    );

    let missing = settings::update_front_multipliers(&conn, "nowhere", &tiers, &difficulties);
    assert!(matches!(missing, Err(TrackerError::NotFound { .. })));
}

#[test]
fn front_settings_update_changes_weighting() {
    let conn = seeded_db();
    tracker::log_task(&conn, &adhoc("books", 100)).unwrap();
    assert!((tracker::get_overall_summary(&conn).unwrap().xp - 80.0).abs() < 1e-9);

    settings::update_front(
        &conn,
        "books",
        &FrontUpdate {
            name: "Reading".into(),
            coef: 2.0,
            weight: 2.0,
        },
    )
    .unwrap();

    assert_eq!(tracker::get_overall_summary(&conn).unwrap().xp, 200.0);
    let books = tracker::get_front_summary(&conn, "books").unwrap();
    assert_eq!(books.name, "Reading");
    assert_eq!(books.summary.xp, 100.0);
}

#[test]
fn deleting_a_front_cascades() {
    let conn = seeded_db();
    tracker::log_task(
        &conn,
        &task("brain", "BrainMathDrill", Tier::Daily, 2, TaskStatus::Done),
    )
    .unwrap();
    tracker::log_task(&conn, &adhoc("sport", 30)).unwrap();

    settings::delete_front(&conn, "brain").unwrap();

    assert!(repository::get_front(&conn, "brain").unwrap().is_none());
    assert_eq!(count(&conn, "SELECT count(*) FROM piece_types WHERE front_code = 'brain'"), 0);
    assert_eq!(count(&conn, "SELECT count(*) FROM tasks WHERE front_code = 'brain'"), 0);
    assert_eq!(tracker::get_balance(&conn).unwrap(), 30.0);

    assert!(matches!(
        settings::delete_front(&conn, "brain"),
        Err(TrackerError::NotFound { .. })
    ));
}

#[test]
fn last_difficulty_is_remembered_per_front() {
    let conn = seeded_db();
    assert_eq!(settings::last_difficulty(&conn, "sport").unwrap().value(), 2);

    settings::remember_difficulty(&conn, "sport", Difficulty::new(4).unwrap()).unwrap();
    assert_eq!(settings::last_difficulty(&conn, "sport").unwrap().value(), 4);
    assert_eq!(settings::last_difficulty(&conn, "guitar").unwrap().value(), 2);

    repository::set_pref(&conn, "english_diff", "banana").unwrap();
    assert_eq!(settings::last_difficulty(&conn, "english").unwrap().value(), 2);
}

#[test]
fn purchase_is_declined_when_short() {
    let conn = seeded_db();
    let series = reward_id(&conn, "Late-night series");

    let outcome = shop::purchase(&conn, series, day(16)).unwrap();
    assert_eq!(outcome, PurchaseOutcome::Declined { balance: 0.0, cost: 200 });
    assert_eq!(count(&conn, "SELECT count(*) FROM purchases"), 0);
}

#[test]
fn purchase_spends_price_at_time_of_purchase() {
    let conn = seeded_db();
    // 200 XP reaches level 2: 200 coins + 100 bonus
    tracker::log_task(&conn, &adhoc("sport", 200)).unwrap();
    assert_eq!(tracker::get_balance(&conn).unwrap(), 300.0);

    let series = reward_id(&conn, "Late-night series");
    let outcome = shop::purchase(&conn, series, day(16)).unwrap();
    match outcome {
        PurchaseOutcome::Completed { new_balance, .. } => assert_eq!(new_balance, 100.0),
        other => panic!("expected a completed purchase, got {:?}", other),
    }

    shop::update_reward(
        &conn,
        series,
        &NewReward {
            name: "Late-night series".into(),
            cost_coins: 50,
            image_path: Some("/tmp/series.png".into()),
        },
    )
    .unwrap();

    let history = shop::purchase_history(&conn).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].coins_spent, 200);
    assert_eq!(history[0].reward_name, "Late-night series");
    assert_eq!(tracker::get_balance(&conn).unwrap(), 100.0);
}

#[test]
fn reward_catalog_crud() {
    let conn = seeded_db();
    let id = shop::add_reward(
        &conn,
        &NewReward {
            name: "Coffee".into(),
            cost_coins: 10,
            image_path: None,
        },
    )
    .unwrap();

    let rewards = shop::list_rewards(&conn).unwrap();
    assert_eq!(rewards.len(), 5);
    assert_eq!(rewards[0].name, "Coffee");
    assert!(rewards.windows(2).all(|w| w[0].cost_coins <= w[1].cost_coins));

    shop::delete_reward(&conn, id).unwrap();
    assert!(matches!(
        shop::delete_reward(&conn, id),
        Err(TrackerError::NotFound { .. })
    ));
    assert!(matches!(
        shop::purchase(&conn, id, day(16)),
        Err(TrackerError::NotFound { .. })
    ));
}

#[test]
fn failed_front_delete_leaves_everything_in_place() {
    let conn = seeded_db();
    let pieces = count(&conn, "SELECT count(*) FROM piece_types WHERE front_code = 'brain'");
    assert!(pieces > 0);
    conn.execute_batch("DROP TABLE tasks").unwrap();

    // Front and piece rows go first, then the task delete fails
    let result = settings::delete_front(&conn, "brain");
    assert!(matches!(result, Err(TrackerError::Database(_))));
    assert!(repository::get_front(&conn, "brain").unwrap().is_some());
    assert_eq!(
        count(&conn, "SELECT count(*) FROM piece_types WHERE front_code = 'brain'"),
        pieces
    );
}
