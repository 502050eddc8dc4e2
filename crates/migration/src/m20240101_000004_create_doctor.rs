//! Create `doctors` table.
//!
//! Email and license number are globally unique. The creator reference is
//! nullable so directory entries survive deletion of the creating user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Doctor::Table)
                    .if_not_exists()
                    .col(uuid(Doctor::Id).primary_key())
                    .col(string_len(Doctor::FirstName, 100).not_null())
                    .col(string_len(Doctor::LastName, 100).not_null())
                    .col(string_len(Doctor::Email, 255).unique_key().not_null())
                    .col(ColumnDef::new(Doctor::Phone).string_len(20).null())
                    .col(string_len(Doctor::Specialization, 50).not_null())
                    .col(string_len(Doctor::LicenseNumber, 100).unique_key().not_null())
                    .col(integer(Doctor::YearsOfExperience).not_null().default(0))
                    .col(ColumnDef::new(Doctor::Qualification).string_len(255).null())
                    .col(ColumnDef::new(Doctor::Bio).text().null())
                    .col(ColumnDef::new(Doctor::ConsultationFee).decimal_len(10, 2).null())
                    .col(boolean(Doctor::IsAvailable).not_null().default(true))
                    .col(ColumnDef::new(Doctor::HospitalName).string_len(255).null())
                    .col(ColumnDef::new(Doctor::Address).text().null())
                    .col(ColumnDef::new(Doctor::City).string_len(100).null())
                    .col(ColumnDef::new(Doctor::State).string_len(100).null())
                    .col(ColumnDef::new(Doctor::Country).string_len(100).null())
                    .col(ColumnDef::new(Doctor::CreatedBy).uuid().null())
                    .col(timestamp_with_time_zone(Doctor::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Doctor::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_doctor_created_by")
                            .from(Doctor::Table, Doctor::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Doctor::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Doctor {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Specialization,
    LicenseNumber,
    YearsOfExperience,
    Qualification,
    Bio,
    ConsultationFee,
    IsAvailable,
    HospitalName,
    Address,
    City,
    State,
    Country,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
