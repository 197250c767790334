//! 抽奖券

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "raffle_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub raffle_id: i64,
    pub user_id: i64,
    pub entries: i32,
    pub coins_spent: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::raffles::Entity",
        from = "Column::RaffleId",
        to = "super::raffles::Column::Id"
    )]
    Raffle,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::raffles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Raffle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_raffle_entry(self) -> crate::models::raffles::entities::RaffleEntry {
        use chrono::{DateTime, Utc};

        crate::models::raffles::entities::RaffleEntry {
            id: self.id,
            raffle_id: self.raffle_id,
            user_id: self.user_id,
            entries: self.entries,
            coins_spent: self.coins_spent,
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
