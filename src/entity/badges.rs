//! 徽章目录

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "badges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub icon: String,
    pub criterion_kind: String,
    pub threshold: i64,
    pub coin_bonus: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_badges::Entity")]
    UserBadges,
}

impl Related<super::user_badges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBadges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 条件类型无法识别时返回 None（该徽章不参与评估）
    pub fn into_badge(self) -> Option<crate::models::badges::entities::Badge> {
        use crate::models::badges::entities::{Badge, BadgeCriterion};

        let criterion_kind = self.criterion_kind.parse::<BadgeCriterion>().ok()?;
        Some(Badge {
            id: self.id,
            code: self.code,
            name: self.name,
            description: self.description,
            icon: self.icon,
            criterion_kind,
            threshold: self.threshold,
            coin_bonus: self.coin_bonus,
        })
    }
}
