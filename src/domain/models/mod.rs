pub mod chain_transaction;
pub mod donation;
pub mod scrape_watermark;

pub use chain_transaction::{DecodedTransaction, RawTransaction};
pub use donation::{Donation, NewDonation};
pub use scrape_watermark::ScrapeWatermark;
