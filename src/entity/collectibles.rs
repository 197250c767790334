//! 头像收藏品目录

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "collectibles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub slot: String,
    pub rarity: String,
    pub price: i64,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_collectibles::Entity")]
    UserCollectibles,
}

impl Related<super::user_collectibles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCollectibles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_collectible(self) -> Option<crate::models::collectibles::entities::Collectible> {
        use crate::models::collectibles::entities::{Collectible, CollectibleSlot, Rarity};

        Some(Collectible {
            id: self.id,
            code: self.code,
            name: self.name,
            description: self.description,
            slot: self.slot.parse::<CollectibleSlot>().ok()?,
            rarity: self.rarity.parse::<Rarity>().unwrap_or(Rarity::Common),
            price: self.price,
            is_active: self.is_active,
        })
    }
}
