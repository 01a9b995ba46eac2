pub mod donation_repository;
pub mod scraped_block_repository;

pub use donation_repository::{DonationRepository, DONATION_BATCH_SIZE};
pub use scraped_block_repository::ScrapedBlockRepository;

/// Collection of all repositories
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Repository for donation records
    pub donation: DonationRepository,
    /// Repository for the scrape watermark
    pub scraped_block: ScrapedBlockRepository,
}

impl Repositories {
    /// Create a new Repositories instance
    pub fn new(donation: DonationRepository, scraped_block: ScrapedBlockRepository) -> Self {
        Self {
            donation,
            scraped_block,
        }
    }
}
