pub mod donations;
pub mod scraped_blocks;
