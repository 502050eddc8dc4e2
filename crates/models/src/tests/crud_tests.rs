use anyhow::Result;
use chrono::{NaiveDate, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{db::connect, doctor, mapping, patient, user};

async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn sample_dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(1984, 6, 1).unwrap()
}

fn patient_row(owner: Uuid) -> patient::ActiveModel {
    let now = Utc::now().into();
    patient::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set("Jane".into()),
        last_name: Set("Doe".into()),
        email: Set(None),
        phone: Set(None),
        date_of_birth: Set(sample_dob()),
        gender: Set("F".into()),
        blood_group: Set(Some("O+".into())),
        allergies: Set(None),
        medical_history: Set(None),
        current_medications: Set(None),
        emergency_contact_name: Set(None),
        emergency_contact_phone: Set(None),
        address: Set(None),
        city: Set(None),
        state: Set(None),
        country: Set(None),
        postal_code: Set(None),
        created_by: Set(owner),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

fn doctor_row(email: String, license: String) -> doctor::ActiveModel {
    let now = Utc::now().into();
    doctor::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set("Gregory".into()),
        last_name: Set("House".into()),
        email: Set(email),
        phone: Set(None),
        specialization: Set("nephrology".into()),
        license_number: Set(license),
        years_of_experience: Set(20),
        qualification: Set(None),
        bio: Set(None),
        consultation_fee: Set(None),
        is_available: Set(true),
        hospital_name: Set(None),
        address: Set(None),
        city: Set(None),
        state: Set(None),
        country: Set(None),
        created_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn test_user_and_patient_crud() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let email = format!("owner_{}@example.com", Uuid::new_v4());
    let owner = user::create(&db, "Owner", &email).await?;
    assert!(owner.is_active);
    assert_eq!(owner.email, email);

    let created = patient_row(owner.id).insert(&db).await?;
    assert_eq!(created.full_name(), "Jane Doe");

    // Owner-scoped lookup finds it; a different owner does not.
    let found = patient::Entity::find()
        .filter(patient::Column::Id.eq(created.id))
        .filter(patient::Column::CreatedBy.eq(owner.id))
        .one(&db)
        .await?;
    assert!(found.is_some());
    let not_found = patient::Entity::find()
        .filter(patient::Column::Id.eq(created.id))
        .filter(patient::Column::CreatedBy.eq(Uuid::new_v4()))
        .one(&db)
        .await?;
    assert!(not_found.is_none());

    patient::Entity::delete_by_id(created.id).exec(&db).await?;
    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_doctor_unique_license_constraint() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let license = format!("LIC-{}", Uuid::new_v4());
    let first = doctor_row(format!("d1_{}@example.com", Uuid::new_v4()), license.clone())
        .insert(&db)
        .await?;

    // Different email, same license: the unique constraint must reject it.
    let dup = doctor_row(format!("d2_{}@example.com", Uuid::new_v4()), license)
        .insert(&db)
        .await;
    assert!(dup.is_err());

    doctor::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_patient_delete_cascades_mappings() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let db = setup_test_db().await?;

    let owner = user::create(&db, "Owner", &format!("casc_{}@example.com", Uuid::new_v4())).await?;
    let p = patient_row(owner.id).insert(&db).await?;
    let d = doctor_row(format!("dc_{}@example.com", Uuid::new_v4()), format!("LIC-{}", Uuid::new_v4()))
        .insert(&db)
        .await?;

    let now = Utc::now().into();
    let m = mapping::ActiveModel {
        id: Set(Uuid::new_v4()),
        patient_id: Set(p.id),
        doctor_id: Set(d.id),
        assigned_by: Set(Some(owner.id)),
        notes: Set(None),
        is_primary: Set(true),
        assigned_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    patient::Entity::delete_by_id(p.id).exec(&db).await?;
    let orphan = mapping::Entity::find_by_id(m.id).one(&db).await?;
    assert!(orphan.is_none());

    doctor::Entity::delete_by_id(d.id).exec(&db).await?;
    user::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}
