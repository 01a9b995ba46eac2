use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_table("donations").await? {
            manager
                .create_table(
                    Table::create()
                        .table(Donations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Donations::TransactionHash)
                                .text()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Donations::FromAddress).text().not_null())
                        .col(
                            ColumnDef::new(Donations::Amount)
                                .decimal_len(38, 0)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Donations::NamadaKey)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Donations::InputMessage).text().not_null())
                        .col(
                            ColumnDef::new(Donations::Timestamp)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Lookups by recipient
            manager
                .create_index(
                    Index::create()
                        .name("donations_namada_key")
                        .table(Donations::Table)
                        .col(Donations::NamadaKey)
                        .if_not_exists()
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Donations::Table).if_exists().to_owned())
            .await
    }
}

#[derive(Iden)]
enum Donations {
    Table,
    TransactionHash,
    FromAddress,
    Amount,
    NamadaKey,
    InputMessage,
    Timestamp,
}
