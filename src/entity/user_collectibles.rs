//! 用户拥有的收藏品

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_collectibles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub collectible_id: i64,
    pub acquired_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collectibles::Entity",
        from = "Column::CollectibleId",
        to = "super::collectibles::Column::Id"
    )]
    Collectible,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::collectibles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collectible.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
