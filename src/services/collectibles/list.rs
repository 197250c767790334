use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CollectibleService;
use crate::models::collectibles::entities::{Collectible, CollectibleWithOwnership};
use crate::models::collectibles::requests::CollectibleListParams;
use crate::models::collectibles::responses::CollectibleListResponse;
use crate::models::common::response::error_response;
use crate::models::users::entities::{AvatarLoadout, User};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn list_catalog(
    service: &CollectibleService,
    request: &HttpRequest,
    query: CollectibleListParams,
) -> ActixResult<HttpResponse> {
    respond(service, request, query, false).await
}

pub async fn list_mine(
    service: &CollectibleService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    respond(service, request, CollectibleListParams { slot: None }, true).await
}

async fn respond(
    service: &CollectibleService,
    request: &HttpRequest,
    query: CollectibleListParams,
    owned_only: bool,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 金币与装扮以数据库为准
    let fresh: User = match storage.get_user_by_id(user.id).await {
        Ok(Some(fresh)) => fresh,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };
    let catalog = match storage.list_collectibles(query.slot).await {
        Ok(catalog) => catalog,
        Err(e) => return Ok(error_response(&e)),
    };
    let owned = match storage.list_owned_collectible_ids(user.id).await {
        Ok(owned) => owned,
        Err(e) => return Ok(error_response(&e)),
    };

    let items = with_ownership(catalog, &owned, &fresh.avatar, owned_only);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CollectibleListResponse {
            coins: fresh.coins,
            items,
        },
        "Collectibles retrieved successfully",
    )))
}

/// 下架商品只对已拥有者可见
fn with_ownership(
    catalog: Vec<Collectible>,
    owned: &[i64],
    avatar: &AvatarLoadout,
    owned_only: bool,
) -> Vec<CollectibleWithOwnership> {
    catalog
        .into_iter()
        .filter_map(|collectible| {
            let is_owned = owned.contains(&collectible.id);
            if (owned_only || !collectible.is_active) && !is_owned {
                return None;
            }
            let equipped = avatar.get(collectible.slot) == Some(collectible.id);
            Some(CollectibleWithOwnership {
                collectible,
                owned: is_owned,
                equipped,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::collectibles::entities::{CollectibleSlot, Rarity};

    fn item(id: i64, slot: CollectibleSlot, is_active: bool) -> Collectible {
        Collectible {
            id,
            code: format!("item_{id}"),
            name: format!("Item {id}"),
            description: None,
            slot,
            rarity: Rarity::Common,
            price: 10,
            is_active,
        }
    }

    fn catalog() -> Vec<Collectible> {
        vec![
            item(1, CollectibleSlot::Hat, true),
            item(2, CollectibleSlot::Hat, true),
            item(3, CollectibleSlot::Pet, false),
            item(4, CollectibleSlot::Pet, false),
        ]
    }

    #[test]
    fn test_catalog_hides_retired_items_not_owned() {
        let avatar = AvatarLoadout {
            hat: Some(2),
            ..Default::default()
        };
        let items = with_ownership(catalog(), &[2, 3], &avatar, false);
        let ids: Vec<i64> = items.iter().map(|i| i.collectible.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!items[0].owned);
        assert!(items[1].owned && items[1].equipped);
        assert!(items[2].owned && !items[2].equipped);
    }

    #[test]
    fn test_mine_lists_only_owned() {
        let items = with_ownership(catalog(), &[1, 4], &AvatarLoadout::default(), true);
        let ids: Vec<i64> = items.iter().map(|i| i.collectible.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert!(items.iter().all(|i| i.owned && !i.equipped));
    }
}
