//! Create `users` table.
//!
//! Email is the login identifier; deactivation is the `is_active` flag,
//! there is no hard delete in the normal flow.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Name, 255).not_null())
                    .col(string_len(User::Email, 255).unique_key().not_null())
                    .col(boolean(User::IsActive).not_null().default(true))
                    .col(boolean(User::IsStaff).not_null().default(false))
                    .col(boolean(User::IsSuperuser).not_null().default(false))
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Name, Email, IsActive, IsStaff, IsSuperuser, CreatedAt, UpdatedAt }
