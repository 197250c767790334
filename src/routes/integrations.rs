use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::integrations::requests::{ExternalStudentListParams, SyncRunListParams};
use crate::models::users::entities::UserRole;
use crate::services::IntegrationService;

static INTEGRATION_SERVICE: Lazy<IntegrationService> = Lazy::new(IntegrationService::new_lazy);

// 签名校验需要原始请求体
pub async fn handle_webhook(req: HttpRequest, body: web::Bytes) -> ActixResult<HttpResponse> {
    INTEGRATION_SERVICE.handle_webhook(&req, body).await
}

pub async fn list_external_students(
    req: HttpRequest,
    query: web::Query<ExternalStudentListParams>,
) -> ActixResult<HttpResponse> {
    INTEGRATION_SERVICE
        .list_external_students(&req, query.into_inner())
        .await
}

pub async fn list_sync_runs(
    req: HttpRequest,
    query: web::Query<SyncRunListParams>,
) -> ActixResult<HttpResponse> {
    INTEGRATION_SERVICE
        .list_sync_runs(&req, query.into_inner())
        .await
}

pub async fn trigger_sync(req: HttpRequest) -> ActixResult<HttpResponse> {
    INTEGRATION_SERVICE.trigger_sync(&req).await
}

// 配置路由
pub fn configure_integrations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/integrations")
            // 外部系统回调，不走 JWT，靠 HMAC 签名
            .service(
                web::resource("/webhook")
                    .wrap(middlewares::RateLimit::webhook())
                    .route(web::post().to(handle_webhook)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("/students", web::get().to(list_external_students))
                    .route("/sync", web::post().to(trigger_sync))
                    .route("/sync-runs", web::get().to(list_sync_runs)),
            ),
    );
}
