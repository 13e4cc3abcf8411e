use chrono::NaiveDate;
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Amount, DraftRow, Engine, EngineError, LedgerCategory, LedgerCodeInput, NewUser, Role,
    Session, TransactionListFilter,
};
use migration::MigratorTrait;

async fn engine_with_admin() -> (Engine, Session) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine
        .bootstrap_user(NewUser {
            name: "Admin".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    let admin = engine.authenticate("admin", "secret1").await.unwrap();
    (engine, admin)
}

async fn user_with_role(engine: &Engine, admin: &Session, username: &str, role: Role) -> Session {
    engine
        .create_user(
            admin,
            NewUser {
                name: username.to_string(),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                role,
                password: "secret1".to_string(),
            },
        )
        .await
        .unwrap();
    engine.authenticate(username, "secret1").await.unwrap()
}

async fn ledger_code(engine: &Engine, admin: &Session, code: &str) -> Uuid {
    engine
        .create_ledger_code(
            admin,
            LedgerCodeInput {
                code: code.to_string(),
                category: LedgerCategory::Income,
                sub_category: None,
                employee_id: None,
                is_active: true,
            },
        )
        .await
        .unwrap()
        .id
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn empty_history_resolves_to_zero() {
    let (engine, admin) = engine_with_admin().await;

    let balance = engine
        .resolve_previous_balance(day(2024, 1, 10))
        .await
        .unwrap();
    assert_eq!(balance, Amount::ZERO);

    let opened = engine
        .open_day(&admin, day(2024, 1, 10), day(2024, 1, 10))
        .await
        .unwrap();
    assert_eq!(opened.previous_balance, Amount::ZERO);
    assert!(opened.rows.is_empty());
    assert!(!opened.locked);

    let record = engine.balance_record(day(2024, 1, 10)).await.unwrap();
    assert!(record.is_some(), "opening a day creates its balance record");
}

#[tokio::test]
async fn save_carries_closing_balance_forward() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "Milk sales").await;
    let today = day(2024, 5, 2);

    engine
        .save_all(
            &admin,
            day(2024, 5, 1),
            today,
            vec![DraftRow::new(code, "opening float").cash_in(1000)],
        )
        .await
        .unwrap();

    let outcome = engine
        .save_all(
            &admin,
            today,
            today,
            vec![
                DraftRow::new(code, "milk").cash_in(500),
                DraftRow::new(code, "feed").expenditure_cash(200),
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcome.saved_count, 2);
    assert_eq!(outcome.failed_count, 0);
    assert_eq!(outcome.previous_balance, Amount::new(1000));
    assert_eq!(outcome.totals.total_recovery, Amount::new(500));
    assert_eq!(outcome.totals.total_expense, Amount::new(200));
    assert_eq!(outcome.totals.today_net, Amount::new(300));
    assert_eq!(outcome.closing_balance, Amount::new(1300));
    assert_eq!(outcome.day.rows.len(), 2);
    assert_eq!(outcome.day.total_balance, Amount::new(1300));

    let next = engine
        .resolve_previous_balance(day(2024, 5, 3))
        .await
        .unwrap();
    assert_eq!(next, outcome.closing_balance);
}

#[tokio::test]
async fn expenditure_out_counts_on_both_sides() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "Repairs").await;
    let date = day(2024, 6, 1);

    let outcome = engine
        .save_all(
            &admin,
            date,
            date,
            vec![DraftRow::new(code, "tractor tyre").expenditure_out(100)],
        )
        .await
        .unwrap();

    assert_eq!(outcome.totals.total_recovery, Amount::new(100));
    assert_eq!(outcome.totals.total_expense, Amount::new(100));
    assert_eq!(outcome.totals.today_net, Amount::ZERO);
    assert_eq!(outcome.closing_balance, outcome.previous_balance);
}

#[tokio::test]
async fn identical_rows_are_committed_once() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "Seeds").await;
    let date = day(2024, 6, 1);
    let row = DraftRow::new(code, "maize seed").expenditure_cash(250);

    let outcome = engine
        .save_all(&admin, date, date, vec![row.clone(), row])
        .await
        .unwrap();

    assert_eq!(outcome.saved_count, 1);
    assert_eq!(outcome.day.rows.len(), 1);
    assert_eq!(outcome.totals.total_expense, Amount::new(250));
}

#[tokio::test]
async fn incomplete_rows_are_skipped_and_negative_rows_rejected() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "Misc").await;
    let date = day(2024, 6, 1);

    let outcome = engine
        .save_all(
            &admin,
            date,
            date,
            vec![
                DraftRow::new(code, "   ").cash_in(10),
                DraftRow::new(code, "no amounts"),
                DraftRow {
                    description: "no code".to_string(),
                    cash_in: Amount::new(10),
                    ..Default::default()
                },
                DraftRow::new(code, "kept").cash_in(10),
            ],
        )
        .await
        .unwrap();
    assert_eq!(outcome.saved_count, 1);

    let err = engine
        .save_all(
            &admin,
            date,
            date,
            vec![
                DraftRow::new(code, "fine").cash_in(10),
                DraftRow::new(code, "bad").bank_in(-1),
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn overflowing_totals_reject_the_save_before_writing() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "Harvest").await;
    let date = day(2024, 6, 2);

    let err = engine
        .save_all(
            &admin,
            date,
            date,
            vec![DraftRow::new(code, "big").cash_in(i64::MAX).bank_in(1)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let filter = TransactionListFilter {
        include_balance_entries: true,
        ..Default::default()
    };
    let (rows, _) = engine
        .list_transactions_page(&admin, &filter, 10, None)
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert!(engine.balance_record(date).await.unwrap().is_none());
    assert!(engine
        .balance_record(day(2024, 6, 3))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn unknown_ledger_code_is_counted_as_failure() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "Fuel").await;
    let date = day(2024, 6, 1);

    let outcome = engine
        .save_all(
            &admin,
            date,
            date,
            vec![
                DraftRow::new(code, "diesel").expenditure_cash(300),
                DraftRow::new(Uuid::new_v4(), "ghost").cash_in(50),
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcome.saved_count, 1);
    assert_eq!(outcome.failed_count, 1);
    // Totals follow the submitted rows, failed ones included.
    assert_eq!(outcome.totals.today_net, Amount::new(-250));
}

#[tokio::test]
async fn resaving_updates_rows_in_place() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "Eggs").await;
    let date = day(2024, 7, 1);

    let first = engine
        .save_all(
            &admin,
            date,
            date,
            vec![DraftRow::new(code, "eggs").cash_in(100)],
        )
        .await
        .unwrap();
    let existing = first.day.rows[0].id;

    let second = engine
        .save_all(
            &admin,
            date,
            date,
            vec![
                DraftRow::new(code, "eggs").cash_in(150).id(existing),
                DraftRow::new(code, "hens").cash_in(40),
            ],
        )
        .await
        .unwrap();

    assert_eq!(second.saved_count, 2);
    assert_eq!(second.day.rows.len(), 2);
    assert_eq!(second.closing_balance, Amount::new(190));
    let updated = engine.transaction(existing).await.unwrap();
    assert_eq!(updated.cash_in, Amount::new(150));
}

#[tokio::test]
async fn fallback_matches_chain_of_closings() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "General").await;

    let mut last = None;
    for (date, row) in [
        (day(2024, 8, 1), DraftRow::new(code, "float").cash_in(1000)),
        (day(2024, 8, 2), DraftRow::new(code, "wages").expenditure_cash(300)),
        (day(2024, 8, 3), DraftRow::new(code, "transfer").bank_in(50)),
    ] {
        let outcome = engine.save_all(&admin, date, date, vec![row]).await.unwrap();
        last = Some(outcome.closing_balance);
    }

    // Neither 8/6 nor 8/5 has a balance record: cumulative fallback.
    let fallback = engine
        .resolve_previous_balance(day(2024, 8, 6))
        .await
        .unwrap();
    assert_eq!(Some(fallback), last);
    assert_eq!(fallback, Amount::new(750));
}

#[tokio::test]
async fn nearest_record_wins_over_cumulative_sum() {
    let (engine, admin) = engine_with_admin().await;
    let code = ledger_code(&engine, &admin, "General").await;

    engine
        .save_all(
            &admin,
            day(2024, 9, 1),
            day(2024, 9, 1),
            vec![DraftRow::new(code, "float").cash_in(1000)],
        )
        .await
        .unwrap();
    let row = engine
        .open_day(&admin, day(2024, 9, 1), day(2024, 9, 1))
        .await
        .unwrap()
        .rows[0]
        .id;
    engine
        .delete_transaction(&admin, row, day(2024, 9, 1))
        .await
        .unwrap();

    // 9/2 keeps the carried-forward figure even though the row is gone.
    let stored = engine
        .resolve_previous_balance(day(2024, 9, 2))
        .await
        .unwrap();
    assert_eq!(stored, Amount::new(1000));
    let cumulative = engine
        .resolve_previous_balance(day(2024, 9, 10))
        .await
        .unwrap();
    assert_eq!(cumulative, Amount::ZERO);
}

#[tokio::test]
async fn day_lock_applies_per_role() {
    let (engine, admin) = engine_with_admin().await;
    let writer = user_with_role(&engine, &admin, "writer", Role::Write).await;
    let reader = user_with_role(&engine, &admin, "reader", Role::Read).await;
    let code = ledger_code(&engine, &admin, "Produce").await;
    let today = day(2024, 10, 15);
    let yesterday = day(2024, 10, 14);
    let row = || vec![DraftRow::new(code, "vegetables").cash_in(80)];

    let err = engine
        .save_all(&writer, yesterday, today, row())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .save_all(&reader, today, today, row())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.save_all(&writer, today, today, row()).await.unwrap();
    engine
        .save_all(&admin, yesterday, today, row())
        .await
        .unwrap();

    let opened = engine.open_day(&writer, yesterday, today).await.unwrap();
    assert!(opened.locked);
    let opened = engine.open_day(&reader, today, today).await.unwrap();
    assert!(opened.locked);
}

#[tokio::test]
async fn balance_entries_cannot_be_deleted() {
    let (engine, admin) = engine_with_admin().await;
    let date = day(2024, 11, 1);
    engine.open_day(&admin, date, date).await.unwrap();

    let filter = TransactionListFilter {
        include_balance_entries: true,
        ..Default::default()
    };
    let (rows, _) = engine
        .list_transactions_page(&admin, &filter, 10, None)
        .await
        .unwrap();
    let record = rows.iter().find(|tx| tx.is_balance_entry).unwrap();

    let err = engine
        .delete_transaction(&admin, record.id, date)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn search_pages_through_rows_in_date_order() {
    let (engine, admin) = engine_with_admin().await;
    let fuel = ledger_code(&engine, &admin, "Fuel").await;
    let milk = ledger_code(&engine, &admin, "Milk").await;

    engine
        .save_all(
            &admin,
            day(2024, 12, 1),
            day(2024, 12, 1),
            vec![
                DraftRow::new(fuel, "Diesel for pump").expenditure_cash(10),
                DraftRow::new(milk, "morning milk").cash_in(20),
                DraftRow::new(milk, "evening milk").cash_in(30),
            ],
        )
        .await
        .unwrap();
    engine
        .save_all(
            &admin,
            day(2024, 12, 2),
            day(2024, 12, 2),
            vec![
                DraftRow::new(fuel, "diesel top-up").expenditure_cash(5),
                DraftRow::new(milk, "milk").cash_in(25),
            ],
        )
        .await
        .unwrap();

    let filter = TransactionListFilter::default();
    let mut cursor = None;
    let mut seen = Vec::new();
    loop {
        let (page, next) = engine
            .list_transactions_page(&admin, &filter, 2, cursor.as_deref())
            .await
            .unwrap();
        assert!(page.len() <= 2);
        seen.extend(page);
        match next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    assert_eq!(seen.len(), 5);
    assert!(seen.iter().all(|tx| !tx.is_balance_entry));
    assert!(
        seen.windows(2)
            .all(|w| (w[0].transaction_date, w[0].order) <= (w[1].transaction_date, w[1].order))
    );

    let filter = TransactionListFilter {
        search: Some("DIESEL".to_string()),
        ..Default::default()
    };
    let (page, next) = engine
        .list_transactions_page(&admin, &filter, 10, None)
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert!(next.is_none());

    let filter = TransactionListFilter {
        from: Some(day(2024, 12, 2)),
        to: Some(day(2024, 12, 3)),
        ledger_code_id: Some(milk),
        ..Default::default()
    };
    let (page, _) = engine
        .list_transactions_page(&admin, &filter, 10, None)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].cash_in, Amount::new(25));

    let err = engine
        .list_transactions_page(&admin, &TransactionListFilter::default(), 10, Some("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCursor(_)));
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let (engine, admin) = engine_with_admin().await;
    let feed = ledger_code(&engine, &admin, "Feed").await;
    let date = day(2025, 1, 6);

    engine
        .save_all(
            &admin,
            date,
            date,
            vec![
                DraftRow::new(feed, "50% advance").cash_in(100),
                DraftRow::new(feed, "500 kg feed").expenditure_cash(40),
                DraftRow::new(feed, "bag_2").expenditure_cash(5),
                DraftRow::new(feed, "bagx2").expenditure_cash(6),
            ],
        )
        .await
        .unwrap();

    let search = |term: &str| TransactionListFilter {
        search: Some(term.to_string()),
        ..Default::default()
    };

    let (page, _) = engine
        .list_transactions_page(&admin, &search("0%"), 10, None)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].description, "50% advance");

    let (page, _) = engine
        .list_transactions_page(&admin, &search("g_2"), 10, None)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].description, "bag_2");
}
