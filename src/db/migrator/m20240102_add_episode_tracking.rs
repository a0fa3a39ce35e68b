use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_column("requests", "total_episodes").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Requests::Table)
                        .add_column(
                            ColumnDef::new(Requests::TotalEpisodes)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_column("requests", "uploaded_episodes").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Requests::Table)
                        .add_column(
                            ColumnDef::new(Requests::UploadedEpisodes)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Requests::Table)
                    .drop_column(Requests::UploadedEpisodes)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Requests::Table)
                    .drop_column(Requests::TotalEpisodes)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Requests {
    Table,
    TotalEpisodes,
    UploadedEpisodes,
}
