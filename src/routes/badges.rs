use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::BadgeService;
use crate::utils::SafeUserIdI64;

static BADGE_SERVICE: Lazy<BadgeService> = Lazy::new(BadgeService::new_lazy);

pub async fn list_my_badges(req: HttpRequest) -> ActixResult<HttpResponse> {
    BADGE_SERVICE.list_my_badges(&req).await
}

pub async fn list_user_badges(
    req: HttpRequest,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    BADGE_SERVICE.list_user_badges(&req, user_id.0).await
}

pub fn configure_badges_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/badges")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_my_badges))
            .service(
                web::resource("/users/{user_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route(web::get().to(list_user_badges)),
            ),
    );
}
