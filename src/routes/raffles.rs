use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::raffles::requests::{CreateRaffleRequest, EnterRaffleRequest, RaffleListParams};
use crate::models::users::entities::UserRole;
use crate::services::RaffleService;
use crate::utils::SafeIdI64;

// 懒加载的全局 RaffleService 实例
static RAFFLE_SERVICE: Lazy<RaffleService> = Lazy::new(RaffleService::new_lazy);

pub async fn list_raffles(
    req: HttpRequest,
    query: web::Query<RaffleListParams>,
) -> ActixResult<HttpResponse> {
    RAFFLE_SERVICE.list_raffles(&req, query.into_inner()).await
}

pub async fn create_raffle(
    req: HttpRequest,
    body: web::Json<CreateRaffleRequest>,
) -> ActixResult<HttpResponse> {
    RAFFLE_SERVICE.create_raffle(&req, body.into_inner()).await
}

pub async fn get_raffle(req: HttpRequest, id: SafeIdI64) -> ActixResult<HttpResponse> {
    RAFFLE_SERVICE.get_raffle(&req, id.0).await
}

pub async fn enter_raffle(
    req: HttpRequest,
    id: SafeIdI64,
    body: web::Json<EnterRaffleRequest>,
) -> ActixResult<HttpResponse> {
    RAFFLE_SERVICE
        .enter_raffle(&req, id.0, body.into_inner())
        .await
}

pub async fn draw_raffle(req: HttpRequest, id: SafeIdI64) -> ActixResult<HttpResponse> {
    RAFFLE_SERVICE.draw_raffle(&req, id.0).await
}

pub async fn cancel_raffle(req: HttpRequest, id: SafeIdI64) -> ActixResult<HttpResponse> {
    RAFFLE_SERVICE.cancel_raffle(&req, id.0).await
}

// 配置路由
pub fn configure_raffles_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/raffles")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_raffles))
                    .route(
                        web::post()
                            .to(create_raffle)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .route("/{id}", web::get().to(get_raffle))
            .service(
                web::resource("/{id}/entries")
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                    .route(web::post().to(enter_raffle)),
            )
            .service(
                web::resource("/{id}/draw")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route(web::post().to(draw_raffle)),
            )
            .service(
                web::resource("/{id}/cancel")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route(web::post().to(cancel_raffle)),
            ),
    );
}
