mod init_state;
mod orchestrator;
mod scheduler;

pub use init_state::{InitPhase, InitializationState};
pub use orchestrator::{DonationIngestor, RunOutcome, RunSummary};
pub use scheduler::IngestionScheduler;
