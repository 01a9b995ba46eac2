pub mod address_extractor;

pub use address_extractor::AddressExtractor;
