use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::warn;

use super::SystemService;
use crate::models::{AppStartTime, ApiResponse, system::responses::HealthResponse};

/// 服务健康状态：数据库不可达时返回 503 和 degraded
pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let storage = service.get_storage(request);

    let database = storage.ping().await;
    if !database {
        warn!("Health check: database is unreachable");
    }

    let now = chrono::Utc::now();
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or(now);

    let response = HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        database,
        system_name: config.app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.app.environment.clone(),
        started_at,
        uptime_seconds: (now - started_at).num_seconds(),
    };

    let body = ApiResponse::success(response, "Service status retrieved");
    if database {
        Ok(HttpResponse::Ok().json(body))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(body))
    }
}
