use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::PaginationQuery;
use crate::services::ProgressService;

static PROGRESS_SERVICE: Lazy<ProgressService> = Lazy::new(ProgressService::new_lazy);

pub async fn get_my_progress(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.get_my_progress(&req).await
}

pub async fn list_my_ledger(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.list_my_ledger(&req, query.into_inner()).await
}

pub fn configure_progress_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/progress")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(get_my_progress))
            .route("/me/ledger", web::get().to(list_my_ledger)),
    );
}
