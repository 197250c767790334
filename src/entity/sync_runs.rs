//! 出站同步记录

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub status: String,
    pub records_sent: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub error: Option<String>,
    pub triggered_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_sync_run(self) -> crate::models::integrations::entities::SyncRun {
        use crate::models::integrations::entities::{SyncRun, SyncStatus};
        use chrono::{DateTime, Utc};

        SyncRun {
            id: self.id,
            started_at: DateTime::<Utc>::from_timestamp(self.started_at, 0).unwrap_or_default(),
            finished_at: self
                .finished_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            status: self
                .status
                .parse::<SyncStatus>()
                .unwrap_or(SyncStatus::Failed),
            records_sent: self.records_sent,
            error: self.error,
            triggered_by: self.triggered_by,
        }
    }
}
