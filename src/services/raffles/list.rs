use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RaffleService, load_raffle, summarize};
use crate::models::ApiResponse;
use crate::models::classes::requests::ClassListQuery;
use crate::models::common::PaginationQuery;
use crate::models::common::response::error_response;
use crate::models::raffles::requests::RaffleListParams;
use crate::models::raffles::responses::RaffleListResponse;
use crate::models::users::entities::UserRole;
use crate::services::classes::access::require_class_member;
use crate::services::current_user;

pub async fn list_raffles(
    service: &RaffleService,
    request: &HttpRequest,
    query: RaffleListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let class_ids = match query.class_id {
        Some(class_id) => {
            if let Err(resp) = require_class_member(&storage, &user, class_id).await {
                return Ok(resp);
            }
            Some(vec![class_id])
        }
        None if user.role == UserRole::Admin => None,
        None => {
            let classes = match storage
                .list_classes_with_pagination(ClassListQuery {
                    page: Some(1),
                    size: Some(PaginationQuery::MAX_SIZE),
                    member_id: Some(user.id),
                    ..Default::default()
                })
                .await
            {
                Ok(classes) => classes,
                Err(e) => return Ok(error_response(&e)),
            };
            Some(classes.items.into_iter().map(|class| class.id).collect())
        }
    };

    let raffles = match storage.list_raffles(class_ids, query.status).await {
        Ok(raffles) => raffles,
        Err(e) => return Ok(error_response(&e)),
    };

    let mut items = Vec::with_capacity(raffles.len());
    for raffle in raffles {
        let entries = match storage.list_raffle_entries(raffle.id).await {
            Ok(entries) => entries,
            Err(e) => return Ok(error_response(&e)),
        };
        items.push(summarize(raffle, &entries, user.id));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RaffleListResponse { items },
        "Raffles retrieved successfully",
    )))
}

pub async fn get_raffle(
    service: &RaffleService,
    request: &HttpRequest,
    raffle_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let raffle = match load_raffle(&storage, raffle_id).await {
        Ok(raffle) => raffle,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_class_member(&storage, &user, raffle.class_id).await {
        return Ok(resp);
    }
    let entries = match storage.list_raffle_entries(raffle.id).await {
        Ok(entries) => entries,
        Err(e) => return Ok(error_response(&e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summarize(raffle, &entries, user.id),
        "Raffle retrieved successfully",
    )))
}
