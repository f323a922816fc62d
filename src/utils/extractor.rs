//! 安全的路径参数提取器
//!
//! 路径参数解析失败时直接返回统一的 JSON 错误响应，而不是 actix 默认的纯文本 404。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::models::imports::entities::ImportEntity;
use crate::models::{ApiResponse, ErrorCode};

fn bad_path(code: ErrorCode, message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message)),
    )
    .into()
}

fn path_param<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.match_info().get(name)
}

/// 路径中的 `{id}`，必须是正整数
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match path_param(req, "id").map(|raw| raw.parse::<i64>()) {
            Some(Ok(id)) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(bad_path(
                ErrorCode::InvalidParameter,
                "Invalid id in path".to_string(),
            )),
        };
        ready(result)
    }
}

/// 路径中的导入会话 `{id}`
#[derive(Debug, Clone, Copy)]
pub struct SafeSessionId(pub Uuid);

impl FromRequest for SafeSessionId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match path_param(req, "id").map(Uuid::parse_str) {
            Some(Ok(id)) => Ok(SafeSessionId(id)),
            _ => Err(bad_path(
                ErrorCode::InvalidParameter,
                "Invalid import session id".to_string(),
            )),
        };
        ready(result)
    }
}

/// 路径中的导入实体 `{entity}`
#[derive(Debug, Clone, Copy)]
pub struct SafeImportEntity(pub ImportEntity);

impl FromRequest for SafeImportEntity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match path_param(req, "entity").map(str::parse::<ImportEntity>) {
            Some(Ok(entity)) => Ok(SafeImportEntity(entity)),
            Some(Err(msg)) => Err(bad_path(ErrorCode::ImportUnsupportedEntity, msg)),
            None => Err(bad_path(
                ErrorCode::ImportUnsupportedEntity,
                "Missing import entity".to_string(),
            )),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive_numbers() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_garbage() {
        for raw in ["abc", "0", "-3"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err());
        }
    }

    #[actix_web::test]
    async fn test_import_entity_and_session_id() {
        let req = TestRequest::default()
            .param("entity", "students")
            .to_http_request();
        assert_eq!(
            SafeImportEntity::extract(&req).await.unwrap().0,
            ImportEntity::Students
        );

        let req = TestRequest::default()
            .param("entity", "courses")
            .to_http_request();
        assert!(SafeImportEntity::extract(&req).await.is_err());

        let req = TestRequest::default()
            .param("id", "not-a-uuid")
            .to_http_request();
        assert!(SafeSessionId::extract(&req).await.is_err());
    }
}
