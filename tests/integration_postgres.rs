//! Postgres repository tests
//!
//! Need a live database: `DATABASE_URL=... cargo test -- --ignored`

use rust_decimal_macros::dec;
use uuid::Uuid;

use transaction_streaming::domain::{Amount, Transaction, TransactionStatus, TransactionType};
use transaction_streaming::ports::TransactionRepository;
use transaction_streaming::repository::PgTransactionRepository;

mod common;

fn new_transaction(user_id: Uuid, kind: TransactionType) -> Transaction {
    Transaction::new(
        user_id,
        Amount::new(dec!(42.5)).unwrap(),
        "USD".to_string(),
        kind,
        Some("pg test".to_string()),
    )
}

#[test]
fn test_schema_splits_into_create_statements() {
    let statements = common::schema_statements();

    assert_eq!(statements.len(), 5);
    for statement in &statements {
        assert!(statement.starts_with("CREATE"), "unexpected statement: {}", statement);
    }
}

#[test]
fn test_schema_keeps_amount_and_currency_unbounded() {
    let transactions = common::schema_statements()
        .into_iter()
        .find(|s| s.starts_with("CREATE TABLE IF NOT EXISTS transactions"))
        .unwrap();

    assert!(transactions.contains("amount NUMERIC NOT NULL"));
    assert!(transactions.contains("currency TEXT NOT NULL"));
    assert!(!transactions.contains("NUMERIC("));
    assert!(!transactions.contains("VARCHAR("));
}

#[tokio::test]
#[ignore]
async fn test_create_and_get_round_trip() {
    let pool = common::setup_test_db().await;
    let repo = PgTransactionRepository::new(pool.clone());
    let user_id = common::seed_user(&pool).await;

    let tx = new_transaction(user_id, TransactionType::Deposit);
    repo.create(&tx).await.unwrap();

    let stored = repo.get_by_id(tx.id).await.unwrap();
    assert_eq!(stored, tx);

    assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore]
async fn test_update_writes_status_and_timestamp_only() {
    let pool = common::setup_test_db().await;
    let repo = PgTransactionRepository::new(pool.clone());
    let user_id = common::seed_user(&pool).await;

    let original = new_transaction(user_id, TransactionType::Withdraw);
    repo.create(&original).await.unwrap();

    let mut changed = original.clone();
    changed.transition_to(TransactionStatus::Failed);
    changed.description = Some("should not be written".to_string());
    repo.update(&changed).await.unwrap();

    let stored = repo.get_by_id(original.id).await.unwrap();
    assert_eq!(stored.status, TransactionStatus::Failed);
    assert_eq!(stored.updated_at, changed.updated_at);
    assert_eq!(stored.description, original.description);

    let ghost = new_transaction(user_id, TransactionType::Deposit);
    assert!(repo.update(&ghost).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore]
async fn test_listing_is_newest_first_and_scoped() {
    let pool = common::setup_test_db().await;
    let repo = PgTransactionRepository::new(pool.clone());
    let user_id = common::seed_user(&pool).await;
    let other = common::seed_user(&pool).await;

    let mut ids = Vec::new();
    for kind in [TransactionType::Deposit, TransactionType::Purchase, TransactionType::Withdraw] {
        let tx = new_transaction(user_id, kind);
        repo.create(&tx).await.unwrap();
        ids.push(tx.id);
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    repo.create(&new_transaction(other, TransactionType::Deposit))
        .await
        .unwrap();

    let mine = repo.get_by_user_id(user_id, 10, 0).await.unwrap();
    let listed: Vec<Uuid> = mine.iter().map(|tx| tx.id).collect();
    ids.reverse();
    assert_eq!(listed, ids);

    let second_page = repo.get_by_user_id(user_id, 2, 2).await.unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].id, ids[2]);

    let pending = repo
        .get_by_status(TransactionStatus::Pending, 100, 0)
        .await
        .unwrap();
    assert!(pending.iter().all(|tx| tx.status == TransactionStatus::Pending));

    assert!(repo.user_exists(user_id).await.unwrap());
    assert!(!repo.user_exists(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_amount_scale_and_long_currency_are_stored_exactly() {
    let pool = common::setup_test_db().await;
    let repo = PgTransactionRepository::new(pool.clone());
    let user_id = common::seed_user(&pool).await;

    for (amount, currency) in [
        (dec!(0.123456789), "USD"),
        (dec!(0.000000001), "BTC"),
        (dec!(12.5), "TETHER-USD-ERC20-X"),
    ] {
        let tx = Transaction::new(
            user_id,
            Amount::new(amount).unwrap(),
            currency.to_string(),
            TransactionType::Deposit,
            None,
        );
        repo.create(&tx).await.unwrap();

        let stored = repo.get_by_id(tx.id).await.unwrap();
        assert_eq!(stored, tx);
        assert_eq!(stored.amount, amount);
    }
}
