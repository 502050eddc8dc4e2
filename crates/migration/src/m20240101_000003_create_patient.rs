//! Create `patients` table with FK to `users`.
//!
//! Patient rows are scoped to the creating user; deleting the owner
//! removes the patient rows along with it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patient::Table)
                    .if_not_exists()
                    .col(uuid(Patient::Id).primary_key())
                    .col(string_len(Patient::FirstName, 100).not_null())
                    .col(string_len(Patient::LastName, 100).not_null())
                    .col(ColumnDef::new(Patient::Email).string_len(255).null())
                    .col(ColumnDef::new(Patient::Phone).string_len(20).null())
                    .col(date(Patient::DateOfBirth).not_null())
                    .col(string_len(Patient::Gender, 1).not_null())
                    .col(ColumnDef::new(Patient::BloodGroup).string_len(3).null())
                    .col(ColumnDef::new(Patient::Allergies).text().null())
                    .col(ColumnDef::new(Patient::MedicalHistory).text().null())
                    .col(ColumnDef::new(Patient::CurrentMedications).text().null())
                    .col(ColumnDef::new(Patient::EmergencyContactName).string_len(200).null())
                    .col(ColumnDef::new(Patient::EmergencyContactPhone).string_len(20).null())
                    .col(ColumnDef::new(Patient::Address).text().null())
                    .col(ColumnDef::new(Patient::City).string_len(100).null())
                    .col(ColumnDef::new(Patient::State).string_len(100).null())
                    .col(ColumnDef::new(Patient::Country).string_len(100).null())
                    .col(ColumnDef::new(Patient::PostalCode).string_len(20).null())
                    .col(uuid(Patient::CreatedBy).not_null())
                    .col(timestamp_with_time_zone(Patient::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Patient::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_patient_created_by")
                            .from(Patient::Table, Patient::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Patient::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Patient {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    Gender,
    BloodGroup,
    Allergies,
    MedicalHistory,
    CurrentMedications,
    EmergencyContactName,
    EmergencyContactPhone,
    Address,
    City,
    State,
    Country,
    PostalCode,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
