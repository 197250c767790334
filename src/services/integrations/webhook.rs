use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{info, warn};

use super::IntegrationService;
use crate::config::AppConfig;
use crate::models::common::response::error_response;
use crate::models::integrations::requests::WebhookPayload;
use crate::models::integrations::responses::WebhookResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::signature::{SIGNATURE_HEADER, verify_signature};

pub async fn handle_webhook(
    service: &IntegrationService,
    request: &HttpRequest,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let secret = &AppConfig::get().integration.webhook_secret;
    let header = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    if !verify_signature(secret, &body, header) {
        warn!(
            "Rejected webhook with invalid signature from {:?}",
            request.peer_addr()
        );
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::WebhookSignatureInvalid,
            "Invalid webhook signature",
        )));
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid webhook payload: {e}"),
            )));
        }
    };
    if let Err(msg) = payload.validate() {
        return Ok(
            HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, msg))
        );
    }

    let storage = service.get_storage(request);
    let response = match storage.apply_webhook_payload(&payload).await {
        Ok(Some((processed, linked))) => {
            info!(
                "Webhook {} processed {} students ({} linked)",
                payload.event_id, processed, linked
            );
            WebhookResponse {
                event_id: payload.event_id,
                duplicate: false,
                processed,
                linked,
            }
        }
        Ok(None) => {
            info!("Webhook {} already processed, skipping", payload.event_id);
            WebhookResponse {
                event_id: payload.event_id,
                duplicate: true,
                processed: 0,
                linked: 0,
            }
        }
        Err(e) => return Ok(error_response(&e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Webhook accepted")))
}
