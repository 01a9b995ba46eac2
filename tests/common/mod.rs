#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use namada_donation_indexer::config::{
    AppConfig, ChainApiConfig, DatabaseConfig, IngestionConfig,
};
use namada_donation_indexer::domain::models::{NewDonation, RawTransaction};
use namada_donation_indexer::infrastructure::chain::{ChainClientError, ChainDataClient};
use namada_donation_indexer::infrastructure::persistence::entities::{donations, scraped_blocks};
use namada_donation_indexer::infrastructure::persistence::{
    DbPool, Repositories, RepositoryFactory,
};

pub const VALID_KEY: &str = "tnam1qp045wqf0k8rk07yhlldngympwhl5fuksq45n9vd";
pub const OTHER_VALID_KEY: &str = "tnam169s5wjpyxexjcypqddr7ce6yv349n4q68g6dh4y7";
pub const DONATION_ADDRESS: &str = "0x15322b546e31f5bfe144c4ae133a9db6f0059fe3";

/// In-memory SQLite with both tables created from the entities
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    // Every connection to :memory: is a separate database
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let conn = Database::connect(options)
        .await
        .expect("Failed to open in-memory sqlite");

    let schema = Schema::new(DbBackend::Sqlite);
    let backend = conn.get_database_backend();
    conn.execute(backend.build(&schema.create_table_from_entity(donations::Entity)))
        .await
        .expect("Failed to create donations table");
    conn.execute(backend.build(&schema.create_table_from_entity(scraped_blocks::Entity)))
        .await
        .expect("Failed to create scraped_blocks table");

    Arc::new(conn)
}

pub fn repositories(conn: &Arc<DatabaseConnection>) -> Repositories {
    RepositoryFactory::create_repositories(&DbPool::from_connection(Arc::clone(conn)))
}

pub fn test_config(starting_block: u64) -> AppConfig {
    AppConfig {
        chain: ChainApiConfig {
            url: "http://localhost:0/api".to_string(),
            api_key: String::new(),
            request_timeout_secs: 1,
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        ingestion: IngestionConfig {
            donation_address: DONATION_ADDRESS.to_string(),
            starting_block,
            scrape_interval_ms: 60_000,
            skip_initial_scrape: false,
        },
    }
}

pub fn timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).unwrap()
}

pub fn donation(hash: &str, from: &str, amount: i64, memo: &str) -> NewDonation {
    NewDonation {
        transaction_hash: hash.to_string(),
        from_address: from.to_string(),
        amount: Decimal::from(amount),
        input_message: memo.to_string(),
        timestamp: timestamp(1_700_000_000),
    }
}

pub fn raw_tx(hash: &str, block_number: u64, memo: &str) -> RawTransaction {
    RawTransaction {
        hash: hash.to_string(),
        block_number: block_number.to_string(),
        time_stamp: (1_700_000_000 + block_number).to_string(),
        from: "0xsender".to_string(),
        to: DONATION_ADDRESS.to_string(),
        value: "1000000000000000".to_string(),
        input: format!("0x{}", hex::encode(memo)),
        is_error: "0".to_string(),
        txreceipt_status: "1".to_string(),
    }
}

/// Chain client serving a fixed transaction list and recording every
/// requested range
#[derive(Debug, Default)]
pub struct MockChainClient {
    pub head: AtomicU64,
    pub transactions: Mutex<Vec<RawTransaction>>,
    pub requested_ranges: Mutex<Vec<(u64, u64)>>,
    pub head_requests: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub head_delay: Option<Duration>,
    /// (entered, release): fetch signals `entered` then waits for `release`
    pub fetch_gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MockChainClient {
    pub fn new(head: u64, transactions: Vec<RawTransaction>) -> Self {
        Self {
            head: AtomicU64::new(head),
            transactions: Mutex::new(transactions),
            ..Default::default()
        }
    }

    pub fn set_head(&self, head: u64) {
        self.head.store(head, Ordering::SeqCst);
    }

    pub fn push(&self, tx: RawTransaction) {
        self.transactions.lock().unwrap().push(tx);
    }

    pub fn ranges(&self) -> Vec<(u64, u64)> {
        self.requested_ranges.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainDataClient for MockChainClient {
    fn provider_name(&self) -> String {
        "Mock".to_string()
    }

    async fn get_latest_block_number(&self) -> Result<u64, ChainClientError> {
        self.head_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.head_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.head.load(Ordering::SeqCst))
    }

    async fn get_transactions(
        &self,
        address: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawTransaction>, ChainClientError> {
        assert_eq!(address, DONATION_ADDRESS);
        self.requested_ranges
            .lock()
            .unwrap()
            .push((from_block, to_block));

        if let Some((entered, release)) = &self.fetch_gate {
            entered.notify_one();
            release.notified().await;
        }

        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ChainClientError::ApiError("service unavailable".to_string()));
        }

        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| {
                let block: u64 = tx.block_number.parse().unwrap();
                block >= from_block && block <= to_block
            })
            .cloned()
            .collect())
    }
}
