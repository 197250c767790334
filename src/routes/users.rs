use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{
    UpdateAvatarRequest, UpdateLanguageRequest, UpdateProfileRequest, UserListParams,
};
use crate::services::UserService;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// HTTP处理程序
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn update_profile(
    req: HttpRequest,
    update_data: web::Json<UpdateProfileRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_profile(update_data.into_inner(), &req)
        .await
}

pub async fn update_language(
    req: HttpRequest,
    update_data: web::Json<UpdateLanguageRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_language(update_data.into_inner(), &req)
        .await
}

pub async fn update_avatar(
    req: HttpRequest,
    update_data: web::Json<UpdateAvatarRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_avatar(update_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::put().to(update_profile))
            .route("/me/language", web::put().to(update_language))
            .route("/me/avatar", web::put().to(update_avatar))
            .service(
                web::resource("")
                    .wrap(middlewares::RequireRole::new(&UserRole::Admin))
                    .route(web::get().to(list_users)),
            ),
    );
}
