use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::collectibles::requests::CollectibleListParams;
use crate::services::CollectibleService;
use crate::utils::SafeIdI64;

static COLLECTIBLE_SERVICE: Lazy<CollectibleService> = Lazy::new(CollectibleService::new_lazy);

pub async fn list_catalog(
    req: HttpRequest,
    query: web::Query<CollectibleListParams>,
) -> ActixResult<HttpResponse> {
    COLLECTIBLE_SERVICE
        .list_catalog(&req, query.into_inner())
        .await
}

pub async fn list_mine(req: HttpRequest) -> ActixResult<HttpResponse> {
    COLLECTIBLE_SERVICE.list_mine(&req).await
}

pub async fn purchase(req: HttpRequest, id: SafeIdI64) -> ActixResult<HttpResponse> {
    COLLECTIBLE_SERVICE.purchase(&req, id.0).await
}

pub fn configure_collectibles_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/collectibles")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_catalog))
            .route("/mine", web::get().to(list_mine))
            .route("/{id}/purchase", web::post().to(purchase)),
    );
}
