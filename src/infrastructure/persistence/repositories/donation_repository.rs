//! Repository for donation records
//! Writes are insert-only: a hash that is already stored is never overwritten

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use std::fmt;
use std::sync::Arc;

use crate::domain::models::{Donation, NewDonation};
use crate::domain::services::AddressExtractor;
use crate::infrastructure::persistence::entities::donations;
use crate::infrastructure::persistence::error::DbError;

/// Rows per bulk INSERT, keeps each statement well under the bind parameter limit
pub const DONATION_BATCH_SIZE: usize = 1000;

/// Repository for donation operations
#[derive(Clone)]
pub struct DonationRepository {
    conn: Arc<DatabaseConnection>,
}

impl fmt::Debug for DonationRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DonationRepository").finish_non_exhaustive()
    }
}

impl DonationRepository {
    /// Create a new DonationRepository
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Save a single donation, returns false if the hash was already stored
    pub async fn save_donation(&self, donation: &NewDonation) -> Result<bool, DbError> {
        let inserted = donations::Entity::insert(Self::to_active_model(donation))
            .on_conflict(Self::keep_existing())
            .exec_without_returning(self.conn.as_ref())
            .await?;

        Ok(inserted > 0)
    }

    /// Save donations in chunks of [`DONATION_BATCH_SIZE`], one statement per
    /// chunk, in order. Returns the number of rows actually inserted.
    ///
    /// The first failing chunk aborts the call; chunks already written stay
    /// written.
    pub async fn save_batch(&self, donations: &[NewDonation]) -> Result<u64, DbError> {
        if donations.is_empty() {
            return Ok(0);
        }

        let total_batches = donations.len().div_ceil(DONATION_BATCH_SIZE);
        let mut total_inserted = 0u64;

        for (batch, chunk) in donations.chunks(DONATION_BATCH_SIZE).enumerate() {
            let models = chunk.iter().map(Self::to_active_model);

            let inserted = donations::Entity::insert_many(models)
                .on_conflict(Self::keep_existing())
                .exec_without_returning(self.conn.as_ref())
                .await
                .map_err(|source| DbError::BatchError {
                    batch,
                    total_batches,
                    source,
                })?;

            total_inserted += inserted;
        }

        Ok(total_inserted)
    }

    /// Get a donation by its transaction hash
    pub async fn get_by_hash(&self, transaction_hash: &str) -> Result<Option<Donation>, DbError> {
        let result = donations::Entity::find_by_id(transaction_hash.to_string())
            .one(self.conn.as_ref())
            .await?;

        Ok(result.map(Self::to_domain_model))
    }

    /// Count stored donations
    pub async fn count(&self) -> Result<u64, DbError> {
        Ok(donations::Entity::find().count(self.conn.as_ref()).await?)
    }

    fn keep_existing() -> OnConflict {
        OnConflict::column(donations::Column::TransactionHash)
            .do_nothing()
            .to_owned()
    }

    /// The Namada key is derived here so that every write path stores it the
    /// same way
    fn to_active_model(donation: &NewDonation) -> donations::ActiveModel {
        donations::ActiveModel {
            transaction_hash: Set(donation.transaction_hash.clone()),
            from_address: Set(donation.from_address.clone()),
            amount: Set(donation.amount),
            namada_key: Set(AddressExtractor::extract_namada_key(
                &donation.input_message,
            )),
            input_message: Set(donation.input_message.clone()),
            timestamp: Set(donation.timestamp.into()),
        }
    }

    fn to_domain_model(entity: donations::Model) -> Donation {
        Donation {
            transaction_hash: entity.transaction_hash,
            from_address: entity.from_address,
            amount: entity.amount,
            namada_key: entity.namada_key,
            input_message: entity.input_message,
            timestamp: entity.timestamp.with_timezone(&Utc),
        }
    }
}
