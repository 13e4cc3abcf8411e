use std::time::Duration;

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    AgristoreInput, AgristoreKind, Amount, BikeInput, DraftRow, EmployeeInput, Engine,
    EngineError, LedgerCategory, LedgerCodeInput, NewUser, Role, Session, Status, UserUpdate,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, Session, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
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
    (engine, admin, db)
}

fn new_user(username: &str, role: Role) -> NewUser {
    NewUser {
        name: username.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        role,
        password: "secret1".to_string(),
    }
}

fn code_input(code: &str, category: LedgerCategory) -> LedgerCodeInput {
    LedgerCodeInput {
        code: code.to_string(),
        category,
        sub_category: None,
        employee_id: None,
        is_active: true,
    }
}

fn employee_input(name: &str) -> EmployeeInput {
    EmployeeInput {
        name: name.to_string(),
        designation: "Field officer".to_string(),
        salary: Amount::new(1_500_000),
        status: Status::Active,
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn save(engine: &Engine, admin: &Session, date: NaiveDate, rows: Vec<DraftRow>) {
    engine.save_all(admin, date, date, rows).await.unwrap();
}

#[tokio::test]
async fn login_rejects_bad_credentials_and_inactive_users() {
    let (engine, admin, _db) = engine_with_db().await;
    let clerk = engine
        .create_user(&admin, new_user("Clerk", Role::Write))
        .await
        .unwrap();
    assert_eq!(clerk.username, "clerk");

    let session = engine.authenticate("CLERK", "secret1").await.unwrap();
    assert_eq!(session.role, Role::Write);

    let err = engine.authenticate("clerk", "wrong!!").await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
    let err = engine.authenticate("nobody", "secret1").await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    engine
        .update_user(
            &admin,
            clerk.id,
            UserUpdate {
                status: Some(Status::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let err = engine.authenticate("clerk", "secret1").await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn user_admin_guards() {
    let (engine, admin, _db) = engine_with_db().await;

    let err = engine
        .create_user(&admin, new_user("admin", Role::Read))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine
        .update_user(
            &admin,
            admin.user_id,
            UserUpdate {
                role: Some(Role::Read),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = engine.delete_user(&admin, admin.user_id).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine
        .create_user(&admin, new_user("viewer", Role::Read))
        .await
        .unwrap();
    let viewer = engine.authenticate("viewer", "secret1").await.unwrap();
    let err = engine.list_users(&viewer).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine
        .set_password(&viewer, viewer.user_id, "another1")
        .await
        .unwrap();
    engine.authenticate("viewer", "another1").await.unwrap();
    let err = engine
        .set_password(&viewer, admin.user_id, "another1")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine.delete_user(&admin, viewer.user_id).await.unwrap();
    assert_eq!(engine.list_users(&admin).await.unwrap().len(), 1);
}

#[tokio::test]
async fn ledger_codes_are_unique_after_normalization() {
    let (engine, admin, _db) = engine_with_db().await;

    engine
        .create_ledger_code(&admin, code_input("Diesel Pump", LedgerCategory::Expense))
        .await
        .unwrap();
    let err = engine
        .create_ledger_code(&admin, code_input("  diesel   PUMP ", LedgerCategory::Expense))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let mut missing_employee = code_input("Wages", LedgerCategory::Expense);
    missing_employee.employee_id = Some(uuid::Uuid::new_v4());
    let err = engine
        .create_ledger_code(&admin, missing_employee)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn ledger_code_lifecycle() {
    let (engine, admin, _db) = engine_with_db().await;
    let income = engine
        .create_ledger_code(&admin, code_input("Milk", LedgerCategory::Income))
        .await
        .unwrap();
    let spare = engine
        .create_ledger_code(&admin, code_input("Spare", LedgerCategory::Expense))
        .await
        .unwrap();

    let listed = engine
        .list_ledger_codes(Some(LedgerCategory::Income), false)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].code, "Milk");

    engine
        .set_ledger_code_active(&admin, spare.id, false)
        .await
        .unwrap();
    assert_eq!(engine.list_ledger_codes(None, false).await.unwrap().len(), 1);
    assert_eq!(engine.list_ledger_codes(None, true).await.unwrap().len(), 2);

    let date = day(2025, 1, 6);
    engine
        .save_all(
            &admin,
            date,
            date,
            vec![DraftRow::new(income.id, "milk").cash_in(100)],
        )
        .await
        .unwrap();
    let err = engine
        .delete_ledger_code(&admin, income.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine.delete_ledger_code(&admin, spare.id).await.unwrap();
    let err = engine.ledger_code(spare.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn read_role_is_view_only() {
    let (engine, admin, _db) = engine_with_db().await;
    engine
        .create_user(&admin, new_user("viewer", Role::Read))
        .await
        .unwrap();
    let viewer = engine.authenticate("viewer", "secret1").await.unwrap();

    let err = engine
        .create_ledger_code(&viewer, code_input("Milk", LedgerCategory::Income))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = engine
        .create_employee(&viewer, employee_input("Asha"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = engine
        .set_cash_in_hand(&viewer, Amount::new(10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn referenced_employee_cannot_be_deleted() {
    let (engine, admin, _db) = engine_with_db().await;
    let ravi = engine
        .create_employee(&admin, employee_input("Ravi"))
        .await
        .unwrap();
    let asha = engine
        .create_employee(&admin, employee_input("Asha"))
        .await
        .unwrap();

    let bike = engine
        .save_bike(
            &admin,
            None,
            BikeInput {
                registration_number: "KA-01-1234".to_string(),
                model: "Splendor".to_string(),
                employee_id: Some(ravi.id),
                purchased_on: Some(day(2023, 4, 1)),
                status: Status::Active,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(engine.list_bikes().await.unwrap(), vec![bike.clone()]);

    let err = engine.delete_employee(&admin, ravi.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine.delete_employee(&admin, asha.id).await.unwrap();
    assert_eq!(engine.list_employees(true).await.unwrap().len(), 1);

    engine.delete_bike(&admin, bike.id).await.unwrap();
    let err = engine.bike(bike.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    engine.delete_employee(&admin, ravi.id).await.unwrap();

    let err = engine
        .create_employee(
            &admin,
            EmployeeInput {
                salary: Amount::new(-1),
                ..employee_input("Neg")
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn agristore_amount_follows_quantity_and_rate() {
    let (engine, admin, _db) = engine_with_db().await;
    let input = AgristoreInput {
        transaction_date: day(2025, 2, 3),
        item: "Urea 50kg".to_string(),
        kind: AgristoreKind::Sale,
        quantity: 3,
        rate: Amount::new(26_650),
        notes: None,
    };

    let entry = engine
        .save_agristore_entry(&admin, None, input.clone())
        .await
        .unwrap();
    assert_eq!(entry.amount, Amount::new(79_950));

    let entry = engine
        .save_agristore_entry(
            &admin,
            Some(entry.id),
            AgristoreInput {
                quantity: 4,
                ..input
            },
        )
        .await
        .unwrap();
    assert_eq!(entry.amount, Amount::new(106_600));
    assert_eq!(engine.list_agristore().await.unwrap().len(), 1);
}

#[tokio::test]
async fn monthly_report_sums_the_month() {
    let (engine, admin, _db) = engine_with_db().await;
    let milk = engine
        .create_ledger_code(&admin, code_input("Milk", LedgerCategory::Income))
        .await
        .unwrap();
    let feed = engine
        .create_ledger_code(&admin, code_input("Feed", LedgerCategory::Expense))
        .await
        .unwrap();

    save(
        &engine,
        &admin,
        day(2024, 2, 28),
        vec![DraftRow::new(milk.id, "float").cash_in(1000)],
    )
    .await;
    save(
        &engine,
        &admin,
        day(2024, 3, 5),
        vec![
            DraftRow::new(milk.id, "milk").cash_in(500),
            DraftRow::new(feed.id, "bran").expenditure_cash(200),
        ],
    )
    .await;
    save(
        &engine,
        &admin,
        day(2024, 3, 6),
        vec![DraftRow::new(feed.id, "cake").expenditure_out(100)],
    )
    .await;

    let report = engine.monthly_report(&admin, 2024, 3).await.unwrap();
    assert_eq!(report.opening_balance, Amount::new(1000));
    assert_eq!(report.total_cash_in, Amount::new(500));
    assert_eq!(report.total_expenditure_cash, Amount::new(200));
    assert_eq!(report.total_expenditure_out, Amount::new(100));
    assert_eq!(report.net, Amount::new(200));
    assert_eq!(report.closing_balance, Amount::new(1200));

    let codes: Vec<_> = report.by_ledger_code.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(codes, vec!["Feed", "Milk"]);
    assert_eq!(report.by_ledger_code[0].expenditure_cash, Amount::new(200));

    assert_eq!(report.days[0].date, day(2024, 3, 5));
    assert_eq!(report.days[0].row_count, 2);
    assert_eq!(report.days[0].previous_balance, Some(Amount::new(1000)));
    assert_eq!(report.days[0].total_balance, Some(Amount::new(1300)));

    let err = engine.monthly_report(&admin, 2024, 13).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn cash_watch_receives_updates() {
    let (engine, admin, db) = engine_with_db().await;
    let mut watch = engine.watch_cash_in_hand();
    assert_eq!(watch.current(), Amount::ZERO);

    engine
        .set_cash_in_hand(&admin, Amount::new(5_000))
        .await
        .unwrap();
    let next = tokio::time::timeout(Duration::from_secs(1), watch.changed())
        .await
        .unwrap();
    assert_eq!(next, Some(Amount::new(5_000)));
    watch.unsubscribe();

    engine
        .set_cash_in_hand(&admin, Amount::new(7_500))
        .await
        .unwrap();
    assert_eq!(engine.cash_in_hand(), Amount::new(7_500));

    let reopened = Engine::builder().database(db).build().await.unwrap();
    assert_eq!(reopened.cash_in_hand(), Amount::new(7_500));
}
