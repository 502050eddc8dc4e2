//! Create `revoked_tokens` table: one row per revoked refresh token id.
//! Rows past `expires_at` are purged whenever the set is consulted.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RevokedToken::Table)
                    .if_not_exists()
                    .col(uuid(RevokedToken::Id).primary_key())
                    .col(string_len(RevokedToken::Jti, 64).unique_key().not_null())
                    .col(uuid(RevokedToken::UserId).not_null())
                    .col(timestamp_with_time_zone(RevokedToken::ExpiresAt).not_null())
                    .col(timestamp_with_time_zone(RevokedToken::RevokedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RevokedToken::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RevokedToken {
    Table,
    Id,
    Jti,
    UserId,
    ExpiresAt,
    RevokedAt,
}
