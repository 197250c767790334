use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::tutor::requests::{TranslateRequest, TutorChatRequest};
use crate::services::TutorService;

static TUTOR_SERVICE: Lazy<TutorService> = Lazy::new(TutorService::new_lazy);

pub async fn chat(
    req: HttpRequest,
    body: web::Json<TutorChatRequest>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.chat(&req, body.into_inner()).await
}

pub async fn translate(
    req: HttpRequest,
    body: web::Json<TranslateRequest>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.translate(&req, body.into_inner()).await
}

pub fn configure_tutor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tutor")
            // 先认证，限流按用户计
            .wrap(middlewares::RateLimit::tutor())
            .wrap(middlewares::RequireJWT)
            .route("/chat", web::post().to(chat))
            .route("/translate", web::post().to(translate)),
    );
}
