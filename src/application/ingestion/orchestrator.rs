use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::application::ingestion::init_state::{InitPhase, InitializationState};
use crate::config::{AppConfig, IngestionConfig};
use crate::domain::errors::IngestionError;
use crate::domain::models::{DecodedTransaction, NewDonation};
use crate::domain::services::AddressExtractor;
use crate::infrastructure::chain::{ChainClientError, ChainDataClient};
use crate::infrastructure::persistence::repositories::{
    DonationRepository, Repositories, ScrapedBlockRepository,
};
use crate::utils::logging;

/// What a single pass did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// First block requested from the chain client
    pub from_block: u64,
    /// Chain head used as the upper bound
    pub to_block: u64,
    /// Transactions that decoded and carried a valid Namada key
    pub transactions_found: usize,
    /// Rows actually inserted; lower than found when some were stored before
    pub inserted: u64,
    /// Block this pass settled on as the high-water mark
    pub watermark: u64,
    /// False when the pass found nothing and its block was already recorded
    pub watermark_recorded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// Another pass held the run guard
    Skipped,
}

/// Drives the fetch -> decode -> filter -> persist -> advance watermark
/// pipeline for the donation address
#[derive(Debug)]
pub struct DonationIngestor {
    chain_client: Arc<dyn ChainDataClient>,
    donation_repository: DonationRepository,
    scraped_block_repository: ScrapedBlockRepository,
    config: IngestionConfig,
    request_timeout: Duration,
    init_state: InitializationState,
    run_guard: Mutex<()>,
}

impl DonationIngestor {
    pub fn new(
        chain_client: Arc<dyn ChainDataClient>,
        repositories: Repositories,
        config: &AppConfig,
    ) -> Self {
        Self {
            chain_client,
            donation_repository: repositories.donation,
            scraped_block_repository: repositories.scraped_block,
            config: config.ingestion.clone(),
            request_timeout: Duration::from_secs(config.chain.request_timeout_secs.max(1)),
            init_state: InitializationState::new(),
            run_guard: Mutex::new(()),
        }
    }

    pub fn init_phase(&self) -> InitPhase {
        self.init_state.phase()
    }

    /// Prepare the ingestor for scheduled runs, performing the bootstrap
    /// scrape unless `skip_initial_scrape` is set.
    ///
    /// Only the first call does anything; later calls log and return. A
    /// failed bootstrap is returned to the caller and leaves the ingestor
    /// uninitialized so startup can be retried.
    pub async fn initialize(&self, skip_initial_scrape: bool) -> Result<(), IngestionError> {
        if self.config.donation_address.trim().is_empty() {
            return Err(IngestionError::ConfigError(
                "donation address is not configured (COINCENTER_ADDRESS)".to_string(),
            ));
        }

        if let Err(phase) = self.init_state.try_begin() {
            logging::log_info(&format!(
                "[ingestion] Already initialized ({:?}), skipping...",
                phase
            ));
            return Ok(());
        }

        logging::log_info(&format!(
            "[ingestion] Initializing with {} provider for {}",
            self.chain_client.provider_name(),
            self.config.donation_address
        ));

        if skip_initial_scrape {
            logging::log_info("[ingestion] Skipping initial scrape...");
        } else if let Err(e) = self.perform_initial_scrape().await {
            logging::log_error(&format!("[ingestion] ❌ Error during initial scrape: {}", e));
            self.init_state.abandon();
            return Err(e);
        }

        self.init_state.complete();
        logging::log_info("[ingestion] ✅ Initialization complete");
        Ok(())
    }

    /// Backfill from the configured starting block to the chain head.
    ///
    /// Waits for any pass already in flight instead of skipping.
    pub async fn perform_initial_scrape(&self) -> Result<RunSummary, IngestionError> {
        let _guard = self.run_guard.lock().await;

        logging::log_info(&format!(
            "[ingestion] 🔍 Starting initial scrape from block {}...",
            self.config.starting_block
        ));

        let summary = self.scrape_from(self.config.starting_block).await?;

        logging::log_info(&format!(
            "[ingestion] Initial scrape complete: {} historical donations, {} new, watermark {}",
            summary.transactions_found, summary.inserted, summary.watermark
        ));
        Ok(summary)
    }

    /// One incremental pass starting at the stored watermark.
    ///
    /// Returns [`RunOutcome::Skipped`] without touching the chain or the
    /// store when another pass is still running.
    pub async fn run_once(&self) -> Result<RunOutcome, IngestionError> {
        let Ok(_guard) = self.run_guard.try_lock() else {
            logging::log_warning("[ingestion] Previous pass still running, skipping this one");
            return Ok(RunOutcome::Skipped);
        };

        let from_block = self.scraped_block_repository.get_last_scraped_block().await?;
        let summary = self.scrape_from(from_block).await?;

        if summary.transactions_found > 0 {
            logging::log_info(&format!(
                "[ingestion] 📊 Blocks {}..={}: {} donations, {} new, watermark {}",
                summary.from_block,
                summary.to_block,
                summary.transactions_found,
                summary.inserted,
                summary.watermark
            ));
        } else {
            logging::log_debug(&format!(
                "[ingestion] Blocks {}..={}: nothing new",
                summary.from_block, summary.to_block
            ));
        }

        Ok(RunOutcome::Completed(summary))
    }

    /// Must be called with the run guard held
    async fn scrape_from(&self, from_block: u64) -> Result<RunSummary, IngestionError> {
        let to_block = self
            .with_timeout("fetching chain head", self.chain_client.get_latest_block_number())
            .await?;

        let donations = if to_block < from_block {
            logging::log_warning(&format!(
                "[ingestion] Chain head {} is behind block {}, nothing to fetch",
                to_block, from_block
            ));
            Vec::new()
        } else {
            let raw = self
                .with_timeout(
                    "fetching transactions",
                    self.chain_client.get_transactions(
                        &self.config.donation_address,
                        from_block,
                        to_block,
                    ),
                )
                .await?;
            let fetched = raw.len();
            let decoded = self.chain_client.decode_input_data(raw);
            let qualifying = Self::filter_donations(decoded);

            logging::log_debug(&format!(
                "[ingestion] {} fetched, {} with a Namada key",
                fetched,
                qualifying.len()
            ));
            qualifying
        };

        let records: Vec<NewDonation> = donations.iter().map(NewDonation::from).collect();
        let inserted = self.donation_repository.save_batch(&records).await?;

        let highest = donations.iter().map(|tx| tx.block_number).max();
        let watermark = highest.map_or(from_block, |block| block.max(from_block));

        // An empty pass must not reset the count stored for a block that a
        // previous pass already recorded
        let watermark_recorded = highest.is_some()
            || !self
                .scraped_block_repository
                .is_block_scraped(watermark)
                .await?;

        if watermark_recorded {
            let found = u32::try_from(donations.len()).unwrap_or(u32::MAX);
            self.scraped_block_repository
                .mark_block_as_scraped(watermark, found)
                .await?;
        }

        Ok(RunSummary {
            from_block,
            to_block,
            transactions_found: donations.len(),
            inserted,
            watermark,
            watermark_recorded,
        })
    }

    /// Keep transactions whose memo is non-empty and names a valid Namada
    /// address
    fn filter_donations(transactions: Vec<DecodedTransaction>) -> Vec<DecodedTransaction> {
        transactions
            .into_iter()
            .filter(|tx| {
                !tx.decoded_raw_input.is_empty()
                    && !AddressExtractor::extract_namada_key(&tx.decoded_raw_input).is_empty()
            })
            .collect()
    }

    async fn with_timeout<T, F>(&self, operation: &str, future: F) -> Result<T, IngestionError>
    where
        F: Future<Output = Result<T, ChainClientError>>,
    {
        match tokio::time::timeout(self.request_timeout, future).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(IngestionError::Timeout(format!(
                "{} took longer than {}s",
                operation,
                self.request_timeout.as_secs()
            ))),
        }
    }
}
