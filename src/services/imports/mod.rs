//! CSV 批量导入
//!
//! 上传后立即返回 202 和会话，实际导入在后台任务中进行：
//! 识别编码、解析表头、逐行按自然键写入，进度通过 SSE 推送。

pub mod encoding;
pub mod parser;
pub mod runner;
pub mod session;
pub mod sessions;
pub mod targets;
pub mod templates;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::imports::entities::ImportEntity;
use crate::storage::Storage;

pub struct ImportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ImportService {
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

    // 上传 CSV 并启动导入
    pub async fn upload(
        &self,
        entity: ImportEntity,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        upload::upload_import(self, entity, payload, request).await
    }

    // 查询导入会话
    pub async fn get_session(&self, id: Uuid, request: &HttpRequest) -> ActixResult<HttpResponse> {
        session::get_session(id, request).await
    }

    // 订阅导入进度
    pub async fn stream_events(
        &self,
        id: Uuid,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        session::stream_events(id, request).await
    }

    // 下载导入模板
    pub async fn template(&self, entity: ImportEntity) -> ActixResult<HttpResponse> {
        templates::download_template(entity).await
    }
}
