//! Create `patient_doctor_mappings` join table.
//!
//! The `(patient_id, doctor_id)` pair is unique; rows cascade away when
//! either endpoint is deleted. `assigned_by` survives user deletion.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mapping::Table)
                    .if_not_exists()
                    .col(uuid(Mapping::Id).primary_key())
                    .col(uuid(Mapping::PatientId).not_null())
                    .col(uuid(Mapping::DoctorId).not_null())
                    .col(ColumnDef::new(Mapping::AssignedBy).uuid().null())
                    .col(ColumnDef::new(Mapping::Notes).text().null())
                    .col(boolean(Mapping::IsPrimary).not_null().default(false))
                    .col(timestamp_with_time_zone(Mapping::AssignedAt).not_null())
                    .col(timestamp_with_time_zone(Mapping::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mapping_patient")
                            .from(Mapping::Table, Mapping::PatientId)
                            .to(Patient::Table, Patient::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mapping_doctor")
                            .from(Mapping::Table, Mapping::DoctorId)
                            .to(Doctor::Table, Doctor::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_mapping_assigned_by")
                            .from(Mapping::Table, Mapping::AssignedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The pair constraint is part of the data model, not a tuning index.
        manager
            .create_index(
                Index::create()
                    .name("uq_mapping_patient_doctor")
                    .table(Mapping::Table)
                    .col(Mapping::PatientId)
                    .col(Mapping::DoctorId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Mapping::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Mapping {
    #[sea_orm(iden = "patient_doctor_mappings")]
    Table,
    Id,
    PatientId,
    DoctorId,
    AssignedBy,
    Notes,
    IsPrimary,
    AssignedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Patient { Table, Id }

#[derive(DeriveIden)]
enum Doctor { Table, Id }

#[derive(DeriveIden)]
enum User { Table, Id }
