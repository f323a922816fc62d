pub mod reminders;
pub mod retry;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::notifications::requests::ReminderRequest;
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 为某日课次生成提醒
    pub async fn enqueue_reminders(
        &self,
        body: ReminderRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        reminders::enqueue_reminders(self, body, request).await
    }

    // 重试发送失败的通知
    pub async fn retry(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        retry::retry_notification(self, id, request).await
    }
}
