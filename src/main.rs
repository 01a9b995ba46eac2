use std::sync::Arc;
use std::time::Duration;

use namada_donation_indexer::application::ingestion::{DonationIngestor, IngestionScheduler};
use namada_donation_indexer::config::AppConfig;
use namada_donation_indexer::infrastructure::chain::EtherscanClient;
use namada_donation_indexer::infrastructure::persistence::{DbPool, RepositoryFactory};
use namada_donation_indexer::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    logging::log_info(&format!(
        "Starting namada-donation-indexer v{}",
        env!("CARGO_PKG_VERSION")
    ));

    let config = AppConfig::from_env();

    let db_pool = DbPool::new(&config).await?;
    let repositories = RepositoryFactory::create_repositories(&db_pool);
    let chain_client = Arc::new(EtherscanClient::new(&config)?);

    let ingestor = Arc::new(DonationIngestor::new(chain_client, repositories, &config));

    // A failed bootstrap ends the process rather than leaving it running unscraped
    ingestor
        .initialize(config.ingestion.skip_initial_scrape)
        .await?;

    let mut scheduler = IngestionScheduler::new(
        Arc::clone(&ingestor),
        Duration::from_millis(config.ingestion.scrape_interval_ms),
    );
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    logging::log_info("Shutdown requested");
    scheduler.stop().await;

    Ok(())
}
