use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_table("scraped_blocks").await? {
            manager
                .create_table(
                    Table::create()
                        .table(ScrapedBlocks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ScrapedBlocks::BlockNumber)
                                .big_integer()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ScrapedBlocks::TransactionsFound)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ScrapedBlocks::ScrapedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            // Recent activity is read ordered by scrape time
            manager
                .create_index(
                    Index::create()
                        .name("scraped_blocks_scraped_at")
                        .table(ScrapedBlocks::Table)
                        .col(ScrapedBlocks::ScrapedAt)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ScrapedBlocks::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum ScrapedBlocks {
    Table,
    BlockNumber,
    TransactionsFound,
    ScrapedAt,
}
