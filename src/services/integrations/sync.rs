use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::IntegrationService;
use super::client::SyncClient;
use crate::config::AppConfig;
use crate::models::common::response::error_response;
use crate::models::integrations::entities::{SyncRun, SyncStatus};
use crate::models::integrations::responses::SyncPushBody;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::storage::Storage;

pub async fn trigger_sync(
    service: &IntegrationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let client = match SyncClient::from_config(&AppConfig::get().integration) {
        Ok(Some(client)) => client,
        Ok(None) => {
            return Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error_empty(
                ErrorCode::IntegrationNotConfigured,
                "Outbound sync is not configured",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    // 上次成功同步开始之后的评分
    let since = match storage.last_successful_sync_started_at().await {
        Ok(since) => since,
        Err(e) => return Ok(error_response(&e)),
    };

    let sync_id = uuid::Uuid::new_v4().to_string();
    if let Err(e) = storage.create_sync_run(&sync_id, Some(user.id)).await {
        return Ok(error_response(&e));
    }

    let records = match storage.collect_sync_records(since).await {
        Ok(records) => records,
        Err(e) => {
            finish(&storage, &sync_id, SyncStatus::Failed, 0, Some(e.message().to_string())).await;
            return Ok(error_response(&e));
        }
    };
    let records_sent = records.len() as i32;

    let body = SyncPushBody {
        sync_id: sync_id.clone(),
        records,
    };
    let (status, err) = match client.push(&body).await {
        Ok(()) => (SyncStatus::Succeeded, None),
        Err(e) => {
            error!("Sync {} failed: {}", sync_id, e.message());
            (SyncStatus::Failed, Some(e.message().to_string()))
        }
    };
    let sent = if status == SyncStatus::Succeeded {
        records_sent
    } else {
        0
    };
    let run = finish(&storage, &sync_id, status, sent, err.clone()).await;

    match (status, run) {
        (SyncStatus::Succeeded, Some(run)) => {
            info!("Sync {} pushed {} records", sync_id, records_sent);
            Ok(HttpResponse::Ok().json(ApiResponse::success(run, "Sync completed successfully")))
        }
        (SyncStatus::Succeeded, None) => Ok(HttpResponse::InternalServerError().json(
            ApiResponse::error_empty(ErrorCode::InternalServerError, "Sync run was lost"),
        )),
        _ => Ok(HttpResponse::BadGateway().json(ApiResponse::error_empty(
            ErrorCode::SyncFailed,
            format!(
                "Sync {} failed: {}",
                sync_id,
                err.unwrap_or_else(|| "unknown error".to_string())
            ),
        ))),
    }
}

async fn finish(
    storage: &Arc<dyn Storage>,
    sync_id: &str,
    status: SyncStatus,
    records_sent: i32,
    error: Option<String>,
) -> Option<SyncRun> {
    match storage
        .finish_sync_run(sync_id, status, records_sent, error)
        .await
    {
        Ok(run) => run,
        Err(e) => {
            warn!("Failed to record end of sync {}: {}", sync_id, e);
            None
        }
    }
}
