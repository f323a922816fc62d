//! JSON / Query 参数解析失败时的统一响应

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON payload error on {}: {}", req.path(), err);
    let (response, message) = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => (
            HttpResponse::PayloadTooLarge(),
            "Request body is too large".to_string(),
        ),
        JsonPayloadError::ContentType => (
            HttpResponse::BadRequest(),
            "Content-Type must be application/json".to_string(),
        ),
        other => (HttpResponse::BadRequest(), format!("Invalid JSON body: {other}")),
    };
    respond(err, response, ErrorCode::BadRequest, message)
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Query error on {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    respond(
        err,
        HttpResponse::BadRequest(),
        ErrorCode::InvalidParameter,
        message,
    )
}

fn respond<E>(
    err: E,
    mut builder: actix_web::HttpResponseBuilder,
    code: ErrorCode,
    message: String,
) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    InternalError::from_response(err, builder.json(ApiResponse::error_empty(code, message))).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_json_error_is_bad_request() {
        let req = TestRequest::default().to_http_request();
        let err = json_error_handler(JsonPayloadError::ContentType, &req);
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_json_overflow_is_payload_too_large() {
        let req = TestRequest::default().to_http_request();
        let err = json_error_handler(JsonPayloadError::Overflow { limit: 10 }, &req);
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
