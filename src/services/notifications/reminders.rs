use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use validator::Validate;

use super::NotificationService;
use crate::models::ApiResponse;
use crate::models::notifications::requests::ReminderRequest;
use crate::utils::validate::field_errors;

pub async fn enqueue_reminders(
    service: &NotificationService,
    body: ReminderRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(errors) = body.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(field_errors(&errors))));
    }

    let storage = service.get_storage(request);

    match storage.enqueue_session_reminders(body.date.trim()).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Session reminders enqueued",
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::test::TestRequest;
    use actix_web::web;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_invalid_date_is_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let req = TestRequest::default()
            .app_data(web::Data::new(storage))
            .to_http_request();
        let service = NotificationService::new_lazy();

        let body = ReminderRequest {
            date: "2024-13-40".into(),
        };
        let resp = service.enqueue_reminders(body, &req).await.unwrap();
        assert_eq!(resp.status(), 400);

        let body = ReminderRequest {
            date: "2024-05-01".into(),
        };
        let resp = service.enqueue_reminders(body, &req).await.unwrap();
        assert_eq!(resp.status(), 200);
    }
}
