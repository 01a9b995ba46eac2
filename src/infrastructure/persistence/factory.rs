use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::infrastructure::persistence::connection::DbPool;
use crate::infrastructure::persistence::repositories::{
    DonationRepository, Repositories, ScrapedBlockRepository,
};

/// Factory for creating repositories
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create all repositories
    pub fn create_repositories(db_pool: &DbPool) -> Repositories {
        let conn = db_pool.shared_connection();

        Repositories::new(
            Self::create_donation_repository(Arc::clone(&conn)),
            Self::create_scraped_block_repository(conn),
        )
    }

    /// Create a donation repository
    pub fn create_donation_repository(conn: Arc<DatabaseConnection>) -> DonationRepository {
        DonationRepository::new(conn)
    }

    /// Create a scraped_blocks repository
    pub fn create_scraped_block_repository(
        conn: Arc<DatabaseConnection>,
    ) -> ScrapedBlockRepository {
        ScrapedBlockRepository::new(conn)
    }
}
