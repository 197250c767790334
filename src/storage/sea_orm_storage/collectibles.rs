//! 头像装扮商店

use super::progression::apply_grant;
use super::{SeaOrmStorage, now_ts};
use crate::entity::collectibles::{Column, Entity as Collectibles};
use crate::entity::user_collectibles::{
    ActiveModel as UserCollectibleActiveModel, Column as UserCollectibleColumn,
    Entity as UserCollectibles,
};
use crate::errors::{ClassQuestError, Result};
use crate::models::{
    collectibles::entities::{Collectible, CollectibleSlot},
    progression::entities::{LedgerSource, RewardGrant},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn list_collectibles_impl(
        &self,
        slot: Option<CollectibleSlot>,
    ) -> Result<Vec<Collectible>> {
        let mut select = Collectibles::find();
        if let Some(slot) = slot {
            select = select.filter(Column::Slot.eq(slot.to_string()));
        }

        let rows = select
            .order_by_asc(Column::Price)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询装扮失败: {e}")))?;

        Ok(rows.into_iter().filter_map(|m| m.into_collectible()).collect())
    }

    pub async fn get_collectible_by_id_impl(
        &self,
        collectible_id: i64,
    ) -> Result<Option<Collectible>> {
        let result = Collectibles::find_by_id(collectible_id)
            .one(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询装扮失败: {e}")))?;

        Ok(result.and_then(|m| m.into_collectible()))
    }

    pub async fn list_owned_collectible_ids_impl(&self, user_id: i64) -> Result<Vec<i64>> {
        UserCollectibles::find()
            .select_only()
            .column(UserCollectibleColumn::CollectibleId)
            .filter(UserCollectibleColumn::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询背包失败: {e}")))
    }

    /// 购买装扮，返回剩余金币
    pub async fn purchase_collectible_impl(
        &self,
        user_id: i64,
        collectible: &Collectible,
        xp_per_level: i64,
    ) -> Result<i64> {
        if !collectible.is_active {
            return Err(ClassQuestError::invalid_state(
                "This item is no longer available",
            ));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("开启事务失败: {e}")))?;

        let owned = UserCollectibles::find()
            .filter(UserCollectibleColumn::UserId.eq(user_id))
            .filter(UserCollectibleColumn::CollectibleId.eq(collectible.id))
            .count(&txn)
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("查询背包失败: {e}")))?;
        if owned > 0 {
            return Err(ClassQuestError::conflict("You already own this item"));
        }

        let balance = apply_grant(
            &txn,
            &RewardGrant {
                user_id,
                xp_delta: 0,
                coin_delta: -collectible.price,
                source: LedgerSource::Purchase,
                reference_id: Some(collectible.id),
            },
            xp_per_level,
        )
        .await?;

        UserCollectibleActiveModel {
            user_id: Set(user_id),
            collectible_id: Set(collectible.id),
            acquired_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ClassQuestError::database_operation(format!("写入背包失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ClassQuestError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(balance.coins)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{give_coins, memory_storage, seed_user};
    use crate::models::collectibles::entities::CollectibleSlot;
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_purchase_spends_coins_once() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "max", UserRole::Student).await;
        give_coins(&storage, user.id, 100).await;

        let hats = storage
            .list_collectibles_impl(Some(CollectibleSlot::Hat))
            .await
            .unwrap();
        assert!(hats.iter().all(|c| c.slot == CollectibleSlot::Hat));
        let cap = hats.iter().find(|c| c.code == "baseball_cap").unwrap();

        let remaining = storage
            .purchase_collectible_impl(user.id, cap, 100)
            .await
            .unwrap();
        assert_eq!(remaining, 100 - cap.price);

        let err = storage
            .purchase_collectible_impl(user.id, cap, 100)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E014");

        assert_eq!(
            storage
                .list_owned_collectible_ids_impl(user.id)
                .await
                .unwrap(),
            vec![cap.id]
        );
    }

    #[tokio::test]
    async fn test_purchase_without_coins_leaves_inventory_empty() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "poor", UserRole::Student).await;
        let crown = storage
            .list_collectibles_impl(None)
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.code == "golden_crown")
            .unwrap();

        let err = storage
            .purchase_collectible_impl(user.id, &crown, 100)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");
        assert!(
            storage
                .list_owned_collectible_ids_impl(user.id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
