use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<String, errors::ModelError> {
    let email = email.trim().to_lowercase();
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(email)
}

pub fn validate_name(name: &str) -> Result<String, errors::ModelError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    Ok(name.to_string())
}

/// Insert a regular active user; email is expected pre-normalized.
pub async fn create(db: &DatabaseConnection, name: &str, email: &str) -> Result<Model, errors::ModelError> {
    let email = validate_email(email)?;
    let name = validate_name(name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email),
        is_active: Set(true),
        is_staff: Set(false),
        is_superuser: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Flip the active flag; this is the deactivation path, rows are not
/// hard-deleted in the normal flow.
pub async fn set_active(db: &DatabaseConnection, id: Uuid, active: bool) -> Result<Model, errors::ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("user not found".into()))?;
    let mut am: ActiveModel = found.into();
    am.is_active = Set(active);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(validate_email(" User@Example.COM ").unwrap(), "user@example.com");
        assert!(validate_email("nope").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn name_must_not_be_blank() {
        assert!(validate_name("   ").is_err());
        assert_eq!(validate_name("  Ada ").unwrap(), "Ada");
    }
}
