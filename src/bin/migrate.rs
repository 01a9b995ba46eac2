use migration::{Migrator, MigratorTrait};
use namada_donation_indexer::config::AppConfig;
use namada_donation_indexer::infrastructure::persistence::DbPool;
use namada_donation_indexer::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    let config = AppConfig::from_env();

    logging::log_info("Running database migrations...");

    let db_pool = DbPool::new(&config).await?;
    Migrator::up(db_pool.get_connection(), None).await?;

    logging::log_info("Migrations completed successfully!");

    Ok(())
}
