use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// Revocation set for refresh tokens: one row per revoked `jti`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revoked_tokens")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub jti: String,
    pub user_id: Uuid,
    pub expires_at: DateTimeWithTimeZone,
    pub revoked_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Record a revocation. Returns false when the jti was already revoked.
pub async fn revoke(
    db: &DatabaseConnection,
    jti: &str,
    user_id: Uuid,
    expires_at: DateTimeWithTimeZone,
) -> Result<bool, errors::ModelError> {
    if is_revoked(db, jti).await? {
        return Ok(false);
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        jti: Set(jti.to_string()),
        user_id: Set(user_id),
        expires_at: Set(expires_at),
        revoked_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(true)
}

pub async fn is_revoked(db: &DatabaseConnection, jti: &str) -> Result<bool, errors::ModelError> {
    purge_expired(db).await?;
    let found = Entity::find()
        .filter(Column::Jti.eq(jti))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(found.is_some())
}

/// Query-time sweep: rows for tokens that have expired anyway carry no
/// information and are dropped.
pub async fn purge_expired(db: &DatabaseConnection) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::ExpiresAt.lt(Utc::now()))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
