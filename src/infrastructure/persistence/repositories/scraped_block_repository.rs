//! Repository for scraped_blocks operations
//! The highest recorded block is the point ingestion resumes from

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};
use std::fmt;
use std::sync::Arc;

use crate::domain::models::ScrapeWatermark;
use crate::infrastructure::persistence::entities::scraped_blocks;
use crate::infrastructure::persistence::error::DbError;

/// Repository for scrape watermark operations
#[derive(Clone)]
pub struct ScrapedBlockRepository {
    conn: Arc<DatabaseConnection>,
}

impl fmt::Debug for ScrapedBlockRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrapedBlockRepository")
            .finish_non_exhaustive()
    }
}

impl ScrapedBlockRepository {
    /// Create a new ScrapedBlockRepository
    pub fn new(conn: Arc<DatabaseConnection>) -> Self {
        Self { conn }
    }

    /// Record `block_number` as scraped. An existing row for the same block
    /// gets the new count and a fresh `scraped_at`.
    ///
    /// Monotonicity is the caller's job: recording a lower block is accepted
    /// and simply does not move the watermark.
    pub async fn mark_block_as_scraped(
        &self,
        block_number: u64,
        transactions_found: u32,
    ) -> Result<(), DbError> {
        let record = scraped_blocks::ActiveModel {
            block_number: Set(to_db_block(block_number)?),
            transactions_found: Set(i32::try_from(transactions_found).map_err(|_| {
                DbError::InvalidData(format!(
                    "transactions_found {} does not fit the column",
                    transactions_found
                ))
            })?),
            scraped_at: Set(Utc::now().into()),
        };

        scraped_blocks::Entity::insert(record)
            .on_conflict(
                OnConflict::column(scraped_blocks::Column::BlockNumber)
                    .update_columns([
                        scraped_blocks::Column::TransactionsFound,
                        scraped_blocks::Column::ScrapedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.conn.as_ref())
            .await?;

        Ok(())
    }

    /// Check whether a block has been recorded
    pub async fn is_block_scraped(&self, block_number: u64) -> Result<bool, DbError> {
        let existing = scraped_blocks::Entity::find_by_id(to_db_block(block_number)?)
            .one(self.conn.as_ref())
            .await?;

        Ok(existing.is_some())
    }

    /// Get the highest recorded block, or 0 when nothing has been scraped
    pub async fn get_last_scraped_block(&self) -> Result<u64, DbError> {
        let result = scraped_blocks::Entity::find()
            .order_by_desc(scraped_blocks::Column::BlockNumber)
            .one(self.conn.as_ref())
            .await?;

        match result {
            Some(model) => from_db_block(model.block_number),
            None => Ok(0),
        }
    }

    /// Get the recorded stats for one block
    pub async fn get_block_scraping_stats(
        &self,
        block_number: u64,
    ) -> Result<Option<ScrapeWatermark>, DbError> {
        let result = scraped_blocks::Entity::find_by_id(to_db_block(block_number)?)
            .one(self.conn.as_ref())
            .await?;

        result.map(Self::to_domain_model).transpose()
    }

    /// Get the most recently written rows, newest first
    pub async fn get_recent_scraping_activity(
        &self,
        limit: u64,
    ) -> Result<Vec<ScrapeWatermark>, DbError> {
        let results = scraped_blocks::Entity::find()
            .order_by_desc(scraped_blocks::Column::ScrapedAt)
            .order_by_desc(scraped_blocks::Column::BlockNumber)
            .limit(limit)
            .all(self.conn.as_ref())
            .await?;

        results.into_iter().map(Self::to_domain_model).collect()
    }

    fn to_domain_model(entity: scraped_blocks::Model) -> Result<ScrapeWatermark, DbError> {
        Ok(ScrapeWatermark {
            block_number: from_db_block(entity.block_number)?,
            transactions_found: u32::try_from(entity.transactions_found).map_err(|_| {
                DbError::InvalidData(format!(
                    "negative transactions_found {} for block {}",
                    entity.transactions_found, entity.block_number
                ))
            })?,
            scraped_at: entity.scraped_at.with_timezone(&Utc),
        })
    }
}

fn to_db_block(block_number: u64) -> Result<i64, DbError> {
    i64::try_from(block_number)
        .map_err(|_| DbError::InvalidData(format!("block {} out of range", block_number)))
}

fn from_db_block(block_number: i64) -> Result<u64, DbError> {
    u64::try_from(block_number)
        .map_err(|_| DbError::InvalidData(format!("negative block number {}", block_number)))
}
