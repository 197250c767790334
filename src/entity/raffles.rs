//! 班级抽奖

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "raffles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub created_by: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub prize: String,
    pub entry_cost: i64,
    pub max_entries_per_student: Option<i32>,
    pub status: String,
    pub closes_at: Option<i64>,
    pub winner_id: Option<i64>,
    pub drawn_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(has_many = "super::raffle_entries::Entity")]
    Entries,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::raffle_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_raffle(self) -> crate::models::raffles::entities::Raffle {
        use crate::models::raffles::entities::{Raffle, RaffleStatus};
        use chrono::{DateTime, Utc};

        Raffle {
            id: self.id,
            class_id: self.class_id,
            created_by: self.created_by,
            title: self.title,
            prize: self.prize,
            entry_cost: self.entry_cost,
            max_entries_per_student: self.max_entries_per_student,
            status: self
                .status
                .parse::<RaffleStatus>()
                .unwrap_or(RaffleStatus::Cancelled),
            closes_at: self
                .closes_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            winner_id: self.winner_id,
            drawn_at: self
                .drawn_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
