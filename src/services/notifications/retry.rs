use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::NotificationService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn retry_notification(
    service: &NotificationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.reset_notification(id).await {
        Ok(Some(notification)) => {
            info!("Notification {} queued for retry", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                notification,
                "Notification queued for retry",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "Notification not found",
        ))),
        Err(e) => Ok(e.to_response()),
    }
}
