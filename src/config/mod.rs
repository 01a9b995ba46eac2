use dotenv::dotenv;
use std::env;

/// Configuration for the chain-data API client
#[derive(Debug, Clone)]
pub struct ChainApiConfig {
    /// Etherscan-compatible API URL
    pub url: String,
    /// API key appended to every request
    pub api_key: String,
    /// Upper bound for a single chain-data call, in seconds
    pub request_timeout_secs: u64,
}

/// Configuration for the database
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
}

/// Configuration for the ingestion pipeline
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Address whose incoming transactions are treated as donations
    pub donation_address: String,
    /// First block scanned by the bootstrap run
    pub starting_block: u64,
    /// Scheduler cadence in milliseconds
    pub scrape_interval_ms: u64,
    /// Skip the bootstrap run at startup
    pub skip_initial_scrape: bool,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Chain-data API configuration
    pub chain: ChainApiConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Ingestion configuration
    pub ingestion: IngestionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Ensure .env file is loaded
        dotenv().ok();

        let chain_config = ChainApiConfig {
            url: env::var("ETHERSCAN_API_URL")
                .unwrap_or_else(|_| "https://api.etherscan.io/api".to_string()),
            api_key: env::var("ETHERSCAN_API_KEY").unwrap_or_default(),
            request_timeout_secs: parse_or("CHAIN_REQUEST_TIMEOUT_SECS", 60),
        };

        let database_config = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| {
                postgres_url(
                    &env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string()),
                    &env::var("POSTGRES_PASSWORD").unwrap_or_else(|_| "postgres".to_string()),
                    &env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string()),
                    &env::var("POSTGRES_PORT").unwrap_or_else(|_| "5434".to_string()),
                    &env::var("POSTGRES_DB").unwrap_or_else(|_| "donations".to_string()),
                )
            }),
        };

        let ingestion_config = IngestionConfig {
            donation_address: env::var("COINCENTER_ADDRESS").unwrap_or_default(),
            starting_block: parse_or("SCANNING_START_BLOCK", 0),
            scrape_interval_ms: parse_or("SCRAPE_INTERVAL_MS", 300_000),
            skip_initial_scrape: env::var("SKIP_INITIAL_SCRAPE")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        };

        Self {
            chain: chain_config,
            database: database_config,
            ingestion: ingestion_config,
        }
    }
}

fn parse_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn postgres_url(user: &str, password: &str, host: &str, port: &str, database: &str) -> String {
    format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, database)
}
