//! 第三方同步的学生名册

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "external_students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub external_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub grade_level: Option<i32>,
    pub school: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub metadata: Option<String>,
    pub user_id: Option<i64>,
    pub last_synced_at: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_external_student(self) -> crate::models::integrations::entities::ExternalStudent {
        use chrono::{DateTime, Utc};

        crate::models::integrations::entities::ExternalStudent {
            id: self.id,
            external_id: self.external_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            grade_level: self.grade_level,
            school: self.school,
            metadata: self
                .metadata
                .and_then(|raw| serde_json::from_str(&raw).ok()),
            user_id: self.user_id,
            last_synced_at: DateTime::<Utc>::from_timestamp(self.last_synced_at, 0)
                .unwrap_or_default(),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
