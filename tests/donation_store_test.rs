mod common;

use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use std::sync::Arc;

use common::{donation, setup_db, repositories, OTHER_VALID_KEY, VALID_KEY};
use namada_donation_indexer::infrastructure::persistence::repositories::{
    DonationRepository, DONATION_BATCH_SIZE,
};
use namada_donation_indexer::infrastructure::persistence::DbError;

/// Bound values per row: hash, from, amount, key, memo, timestamp
const COLUMNS_PER_DONATION: usize = 6;

#[tokio::test]
async fn test_duplicate_hash_keeps_first_insert() {
    let conn = setup_db().await;
    let repos = repositories(&conn);

    let first = donation("0xaaa", "0xfirst", 100, &format!("for {}", VALID_KEY));
    let second = donation("0xaaa", "0xsecond", 999, &format!("for {}", OTHER_VALID_KEY));

    assert!(repos.donation.save_donation(&first).await.unwrap());
    assert!(!repos.donation.save_donation(&second).await.unwrap());

    assert_eq!(repos.donation.count().await.unwrap(), 1);
    let stored = repos.donation.get_by_hash("0xaaa").await.unwrap().unwrap();
    assert_eq!(stored.from_address, "0xfirst");
    assert_eq!(stored.amount, Decimal::from(100));
    assert_eq!(stored.namada_key, VALID_KEY);
    assert_eq!(stored.input_message, first.input_message);
    assert_eq!(stored.timestamp, first.timestamp);
}

#[tokio::test]
async fn test_batch_skips_already_stored_hashes() {
    let conn = setup_db().await;
    let repos = repositories(&conn);

    let memo = format!("send to {}", VALID_KEY);
    repos
        .donation
        .save_donation(&donation("0x1", "0xoriginal", 5, &memo))
        .await
        .unwrap();

    let batch = vec![
        donation("0x1", "0xreplayed", 7, &memo),
        donation("0x2", "0xnew", 8, &memo),
    ];
    let inserted = repos.donation.save_batch(&batch).await.unwrap();

    assert_eq!(inserted, 1);
    assert_eq!(repos.donation.count().await.unwrap(), 2);
    let kept = repos.donation.get_by_hash("0x1").await.unwrap().unwrap();
    assert_eq!(kept.from_address, "0xoriginal");
}

#[tokio::test]
async fn test_namada_key_derived_at_write_time() {
    let conn = setup_db().await;
    let repos = repositories(&conn);

    let memo = format!("gm friend tnamINVALIDCHK please send {} thanks", VALID_KEY);
    repos
        .donation
        .save_batch(&[
            donation("0xvalid", "0xa", 1, &memo),
            donation("0xnokey", "0xb", 2, "no address here"),
        ])
        .await
        .unwrap();

    let valid = repos.donation.get_by_hash("0xvalid").await.unwrap().unwrap();
    assert_eq!(valid.namada_key, VALID_KEY);

    // Kept for auditing, with an empty key
    let no_key = repos.donation.get_by_hash("0xnokey").await.unwrap().unwrap();
    assert_eq!(no_key.namada_key, "");
    assert_eq!(no_key.input_message, "no address here");
}

#[tokio::test]
async fn test_large_batch_stores_every_hash() {
    let conn = setup_db().await;
    let repos = repositories(&conn);

    let memo = format!("to {}", VALID_KEY);
    let records: Vec<_> = (0..2500)
        .map(|i| donation(&format!("0x{:064x}", i), "0xdonor", 1000 + i, &memo))
        .collect();

    let inserted = repos.donation.save_batch(&records).await.unwrap();

    assert_eq!(inserted, 2500);
    assert_eq!(repos.donation.count().await.unwrap(), 2500);
    for i in [0, 999, 1000, 1999, 2000, 2499] {
        let hash = format!("0x{:064x}", i);
        assert!(repos.donation.get_by_hash(&hash).await.unwrap().is_some());
    }
}

#[tokio::test]
async fn test_batch_chunking_issues_one_insert_per_chunk() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1000,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1000,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 500,
                },
            ])
            .into_connection(),
    );
    let repository = DonationRepository::new(Arc::clone(&db));

    let records: Vec<_> = (0..2500)
        .map(|i| donation(&format!("0x{}", i), "0xdonor", i, "memo"))
        .collect();

    assert_eq!(DONATION_BATCH_SIZE, 1000);
    let inserted = repository.save_batch(&records).await.unwrap();
    assert_eq!(inserted, 2500);

    drop(repository);
    let log = Arc::try_unwrap(db)
        .ok()
        .expect("repository dropped")
        .into_transaction_log();
    let rows_per_statement: Vec<usize> = log
        .iter()
        .flat_map(|transaction| transaction.statements())
        .map(|statement| {
            let binds = statement.values.as_ref().map_or(0, |values| values.0.len());
            binds / COLUMNS_PER_DONATION
        })
        .collect();
    assert_eq!(rows_per_statement, vec![1000, 1000, 500]);
}

#[tokio::test]
async fn test_empty_batch_issues_no_statement() {
    let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
    let repository = DonationRepository::new(Arc::clone(&db));

    assert_eq!(repository.save_batch(&[]).await.unwrap(), 0);

    drop(repository);
    let log = Arc::try_unwrap(db)
        .ok()
        .expect("repository dropped")
        .into_transaction_log();
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_failing_batch_surfaces_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1000,
        }])
        .append_exec_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();
    let repository = DonationRepository::new(Arc::new(db));

    let records: Vec<_> = (0..2500)
        .map(|i| donation(&format!("0x{}", i), "0xdonor", i, "memo"))
        .collect();

    match repository.save_batch(&records).await {
        Err(DbError::BatchError {
            batch,
            total_batches,
            ..
        }) => {
            assert_eq!(batch, 1);
            assert_eq!(total_batches, 3);
        }
        other => panic!("expected batch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_watermark_is_zero_on_fresh_store() {
    let conn = setup_db().await;
    let repos = repositories(&conn);

    assert_eq!(repos.scraped_block.get_last_scraped_block().await.unwrap(), 0);
    assert!(!repos.scraped_block.is_block_scraped(0).await.unwrap());
    assert!(repos
        .scraped_block
        .get_recent_scraping_activity(10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_watermark_is_max_recorded_block() {
    let conn = setup_db().await;
    let repos = repositories(&conn);

    repos.scraped_block.mark_block_as_scraped(500, 3).await.unwrap();
    repos.scraped_block.mark_block_as_scraped(900, 1).await.unwrap();
    // Out-of-order write does not lower the watermark
    repos.scraped_block.mark_block_as_scraped(700, 2).await.unwrap();

    assert_eq!(repos.scraped_block.get_last_scraped_block().await.unwrap(), 900);
    assert!(repos.scraped_block.is_block_scraped(700).await.unwrap());
    assert!(!repos.scraped_block.is_block_scraped(701).await.unwrap());
}

#[tokio::test]
async fn test_rescraping_block_updates_count_and_timestamp() {
    let conn = setup_db().await;
    let repos = repositories(&conn);

    repos.scraped_block.mark_block_as_scraped(42, 1).await.unwrap();
    let before = repos
        .scraped_block
        .get_block_scraping_stats(42)
        .await
        .unwrap()
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    repos.scraped_block.mark_block_as_scraped(42, 5).await.unwrap();
    let after = repos
        .scraped_block
        .get_block_scraping_stats(42)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(after.transactions_found, 5);
    assert!(after.scraped_at > before.scraped_at);
    assert_eq!(
        repos
            .scraped_block
            .get_recent_scraping_activity(10)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_recent_activity_newest_first_and_limited() {
    let conn = setup_db().await;
    let repos = repositories(&conn);

    for block in [10u64, 20, 30] {
        repos.scraped_block.mark_block_as_scraped(block, 0).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let recent = repos
        .scraped_block
        .get_recent_scraping_activity(2)
        .await
        .unwrap();
    let blocks: Vec<u64> = recent.iter().map(|w| w.block_number).collect();
    assert_eq!(blocks, vec![30, 20]);

    assert!(repos
        .scraped_block
        .get_block_scraping_stats(15)
        .await
        .unwrap()
        .is_none());
}
