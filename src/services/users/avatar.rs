use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use super::profile::user_not_found;
use crate::models::collectibles::entities::CollectibleSlot;
use crate::models::common::response::error_response;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::AvatarLoadout, requests::UpdateAvatarRequest, responses::UserResponse},
};
use crate::services::current_user;

pub async fn update_avatar(
    service: &UserService,
    update: UpdateAvatarRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 以数据库中的装扮为准
    let user = match storage.get_user_by_id(current.id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(user_not_found()),
        Err(e) => return Ok(error_response(&e)),
    };
    let loadout = update.apply_to(&user.avatar);

    let owned = match storage.list_owned_collectible_ids(user.id).await {
        Ok(ids) => ids,
        Err(e) => return Ok(error_response(&e)),
    };
    let slots: HashMap<i64, CollectibleSlot> = match storage.list_collectibles(None).await {
        Ok(items) => items.into_iter().map(|item| (item.id, item.slot)).collect(),
        Err(e) => return Ok(error_response(&e)),
    };

    if let Err((code, msg)) = check_loadout(&loadout, &owned, &slots) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    match storage.update_user_avatar(user.id, &loadout).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Avatar updated",
        ))),
        Ok(None) => Ok(user_not_found()),
        Err(e) => Ok(error_response(&e)),
    }
}

/// 每件装备必须已拥有，且放在自己的部位
fn check_loadout(
    loadout: &AvatarLoadout,
    owned: &[i64],
    slots: &HashMap<i64, CollectibleSlot>,
) -> Result<(), (ErrorCode, String)> {
    for (slot, item_id) in loadout.equipped() {
        if !owned.contains(&item_id) {
            return Err((
                ErrorCode::AvatarItemNotOwned,
                format!("You do not own item {item_id}"),
            ));
        }
        match slots.get(&item_id) {
            Some(item_slot) if *item_slot == slot => {}
            Some(item_slot) => {
                return Err((
                    ErrorCode::AvatarSlotMismatch,
                    format!("Item {item_id} belongs to the {item_slot} slot, not {slot}"),
                ));
            }
            None => {
                return Err((
                    ErrorCode::AvatarItemNotOwned,
                    format!("Item {item_id} does not exist"),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> HashMap<i64, CollectibleSlot> {
        HashMap::from([
            (1, CollectibleSlot::Hat),
            (2, CollectibleSlot::Pet),
            (3, CollectibleSlot::Hat),
        ])
    }

    #[test]
    fn test_owned_items_in_their_slots_pass() {
        let mut loadout = AvatarLoadout::default();
        loadout.set(CollectibleSlot::Hat, Some(1));
        loadout.set(CollectibleSlot::Pet, Some(2));
        assert!(check_loadout(&loadout, &[1, 2], &catalog()).is_ok());
        assert!(check_loadout(&AvatarLoadout::default(), &[], &catalog()).is_ok());
    }

    #[test]
    fn test_unowned_item_is_rejected() {
        let mut loadout = AvatarLoadout::default();
        loadout.set(CollectibleSlot::Hat, Some(3));
        let (code, _) = check_loadout(&loadout, &[1], &catalog()).unwrap_err();
        assert_eq!(code, ErrorCode::AvatarItemNotOwned);
    }

    #[test]
    fn test_item_in_wrong_slot_is_rejected() {
        let mut loadout = AvatarLoadout::default();
        loadout.set(CollectibleSlot::Face, Some(2));
        let (code, msg) = check_loadout(&loadout, &[2], &catalog()).unwrap_err();
        assert_eq!(code, ErrorCode::AvatarSlotMismatch);
        assert!(msg.contains("pet"));
    }
}
