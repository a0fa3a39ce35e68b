use crate::entities::prelude::*;
use crate::entities::vote_logs;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

const VOTE_LOG_UNIQUE_INDEX: &str = "idx_vote_logs_request_ip";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Tables from an earlier deployment are adopted as-is; missing
        // columns are filled in by later migrations.
        manager
            .create_table(
                schema
                    .create_table_from_entity(Requests)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(VoteLogs)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(VOTE_LOG_UNIQUE_INDEX)
                    .table(VoteLogs)
                    .col(vote_logs::Column::RequestId)
                    .col(vote_logs::Column::UserIp)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(VOTE_LOG_UNIQUE_INDEX)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(VoteLogs).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Requests).to_owned())
            .await?;

        Ok(())
    }
}
