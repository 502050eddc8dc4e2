//! Supporting indexes for the common query paths: owner scoping, name and
//! email search, directory filters, and mapping lookups.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let indexes: Vec<(&str, &str, Vec<&str>)> = vec![
            ("idx_patients_created_by", "patients", vec!["created_by"]),
            ("idx_patients_email", "patients", vec!["email"]),
            ("idx_patients_name", "patients", vec!["last_name", "first_name"]),
            ("idx_doctors_specialization", "doctors", vec!["specialization"]),
            ("idx_doctors_is_available", "doctors", vec!["is_available"]),
            ("idx_mappings_patient", "patient_doctor_mappings", vec!["patient_id"]),
            ("idx_mappings_doctor", "patient_doctor_mappings", vec!["doctor_id"]),
            ("idx_mappings_assigned_by", "patient_doctor_mappings", vec!["assigned_by"]),
            ("idx_revoked_tokens_expires_at", "revoked_tokens", vec!["expires_at"]),
        ];

        for (name, table, cols) in indexes {
            let mut index = Index::create();
            index.name(name).table(Alias::new(table)).if_not_exists();
            for col in cols {
                index.col(Alias::new(col));
            }
            manager.create_index(index.to_owned()).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table) in [
            ("idx_patients_created_by", "patients"),
            ("idx_patients_email", "patients"),
            ("idx_patients_name", "patients"),
            ("idx_doctors_specialization", "doctors"),
            ("idx_doctors_is_available", "doctors"),
            ("idx_mappings_patient", "patient_doctor_mappings"),
            ("idx_mappings_doctor", "patient_doctor_mappings"),
            ("idx_mappings_assigned_by", "patient_doctor_mappings"),
            ("idx_revoked_tokens_expires_at", "revoked_tokens"),
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Alias::new(table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
