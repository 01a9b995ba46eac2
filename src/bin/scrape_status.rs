//! Prints scraping progress: the current watermark, its stats and the most
//! recent scrape passes. Optional first argument: how many passes to list.

use namada_donation_indexer::config::AppConfig;
use namada_donation_indexer::infrastructure::persistence::{DbPool, RepositoryFactory};
use namada_donation_indexer::utils::logging;

const DEFAULT_ACTIVITY_LIMIT: u64 = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    let limit = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(DEFAULT_ACTIVITY_LIMIT);

    let config = AppConfig::from_env();
    let db_pool = DbPool::new(&config).await?;
    let repositories = RepositoryFactory::create_repositories(&db_pool);

    let watermark = repositories.scraped_block.get_last_scraped_block().await?;
    let donations = repositories.donation.count().await?;

    println!("Donation address: {}", config.ingestion.donation_address);
    println!("Stored donations: {}", donations);
    println!("Last scraped block: {}", watermark);

    match repositories
        .scraped_block
        .get_block_scraping_stats(watermark)
        .await?
    {
        Some(stats) => println!(
            "  {} donations found, recorded at {}",
            stats.transactions_found, stats.scraped_at
        ),
        None => println!("  nothing scraped yet"),
    }

    let activity = repositories
        .scraped_block
        .get_recent_scraping_activity(limit)
        .await?;

    println!("Recent scraping activity ({}):", activity.len());
    for entry in activity {
        println!(
            "  block {:>10}  found {:>5}  at {}",
            entry.block_number, entry.transactions_found, entry.scraped_at
        );
    }

    Ok(())
}
