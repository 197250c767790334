//! 经验/金币流水

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reward_ledger")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub xp_delta: i64,
    pub coin_delta: i64,
    pub source: String,
    pub reference_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_ledger_entry(self) -> crate::models::progression::entities::LedgerEntry {
        use crate::models::progression::entities::{LedgerEntry, LedgerSource};
        use chrono::{DateTime, Utc};

        LedgerEntry {
            id: self.id,
            user_id: self.user_id,
            xp_delta: self.xp_delta,
            coin_delta: self.coin_delta,
            source: self
                .source
                .parse::<LedgerSource>()
                .unwrap_or(LedgerSource::Assignment),
            reference_id: self.reference_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
