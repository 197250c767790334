//! WebSocket 入口
//!
//! 浏览器无法给 WebSocket 握手加 Authorization 头，令牌走查询参数。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, rt, web};
use serde::Deserialize;
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::require_jwt::authenticate_token;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::websocket::WebSocketService;
use crate::storage::Storage;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

fn unauthorized(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<WsQuery>,
    storage: web::Data<Arc<dyn Storage>>,
    cache: web::Data<Arc<dyn ObjectCache>>,
) -> ActixResult<HttpResponse> {
    let Some(token) = query.token.as_deref().filter(|t| !t.is_empty()) else {
        return Ok(unauthorized("Missing token"));
    };

    let user = match authenticate_token(token, storage.get_ref(), cache.get_ref()).await {
        Ok(user) => user,
        Err(msg) => return Ok(unauthorized(&msg)),
    };

    let (response, session, stream) = actix_ws::handle(&req, body)?;
    rt::spawn(WebSocketService::handle_connection(user.id, session, stream));

    Ok(response)
}

pub fn configure_websocket_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/ws", web::get().to(connect));
}
