//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。

use std::fmt;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use sea_orm::{DbErr, SqlErr};

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status_code() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tutorhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TutorHubError {
            $($variant(String),)*
        }

        impl TutorHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TutorHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TutorHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status_code(&self) -> StatusCode {
                match self {
                    $(TutorHubError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TutorHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TutorHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TutorHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tutorhub_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E006", "File Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    Conflict("E010", "Conflict", CONFLICT),
    DateParse("E011", "Date Parse Error", BAD_REQUEST),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    ImportFormat("E014", "Import Format Error", BAD_REQUEST),
    Encoding("E015", "Encoding Error", BAD_REQUEST),
    DeleteRestricted("E016", "Delete Restricted", CONFLICT),
    ImportInProgress("E017", "Import In Progress", CONFLICT),
    PayloadTooLarge("E018", "Payload Too Large", PAYLOAD_TOO_LARGE),
}

impl TutorHubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 API 错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            TutorHubError::Validation(_) | TutorHubError::DateParse(_) => {
                ErrorCode::ValidationFailed
            }
            TutorHubError::NotFound(_) => ErrorCode::NotFound,
            TutorHubError::Conflict(_) => ErrorCode::Conflict,
            TutorHubError::DeleteRestricted(_) => ErrorCode::DeleteRestricted,
            TutorHubError::ImportInProgress(_) => ErrorCode::ImportInProgress,
            TutorHubError::PayloadTooLarge(_) => ErrorCode::ImportFileTooLarge,
            TutorHubError::Authentication(_) => ErrorCode::Unauthorized,
            TutorHubError::Authorization(_) => ErrorCode::Forbidden,
            TutorHubError::ImportFormat(_) | TutorHubError::Encoding(_) => {
                ErrorCode::ImportFileInvalid
            }
            TutorHubError::DatabaseOperation(_)
            | TutorHubError::DatabaseConnection(_)
            | TutorHubError::DatabaseConfig(_) => ErrorCode::DatabaseError,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 转换为 JSON 错误响应，5xx 错误记录 error 日志，其余记录 info
    pub fn to_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self.format_simple());
        } else {
            tracing::info!("{}", self.format_simple());
        }

        // 服务端错误不向客户端暴露内部细节
        let message = if status.is_server_error() {
            self.error_type().to_string()
        } else {
            self.message().to_string()
        };

        HttpResponse::build(status).json(ApiResponse::error_empty(self.api_code(), message))
    }

    /// 将数据库错误按约束类型分类：唯一约束冲突 -> Conflict，外键约束 -> Validation
    pub fn from_db(err: DbErr, context: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                TutorHubError::conflict(format!("{context}: duplicate value ({detail})"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                TutorHubError::validation(format!("{context}: referenced row missing ({detail})"))
            }
            _ => TutorHubError::database_operation(format!("{context}: {err}")),
        }
    }
}

impl fmt::Display for TutorHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TutorHubError {}

// 为常见的错误类型实现 From trait
impl From<DbErr> for TutorHubError {
    fn from(err: DbErr) -> Self {
        TutorHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TutorHubError {
    fn from(err: std::io::Error) -> Self {
        TutorHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TutorHubError {
    fn from(err: serde_json::Error) -> Self {
        TutorHubError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for TutorHubError {
    fn from(err: csv::Error) -> Self {
        TutorHubError::ImportFormat(err.to_string())
    }
}

impl From<chrono::ParseError> for TutorHubError {
    fn from(err: chrono::ParseError) -> Self {
        TutorHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TutorHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TutorHubError::cache_connection("test").code(), "E001");
        assert_eq!(TutorHubError::database_config("test").code(), "E003");
        assert_eq!(TutorHubError::validation("test").code(), "E007");
        assert_eq!(TutorHubError::conflict("test").code(), "E010");
        assert_eq!(TutorHubError::encoding("test").code(), "E015");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            TutorHubError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TutorHubError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TutorHubError::conflict("dup").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TutorHubError::authentication("who").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TutorHubError::authorization("no").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TutorHubError::delete_restricted("in use").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TutorHubError::payload_too_large("big").status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            TutorHubError::database_operation("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_message() {
        let err = TutorHubError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
        assert_eq!(err.api_code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_format_simple() {
        let err = TutorHubError::import_format("missing column: name");
        let formatted = err.format_simple();
        assert!(formatted.contains("Import Format Error"));
        assert!(formatted.contains("missing column: name"));
    }

    #[test]
    fn test_server_errors_hide_details() {
        let resp = TutorHubError::database_operation("secret sql").to_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_plain_db_error() {
        let err = TutorHubError::from_db(DbErr::Custom("oops".into()), "create branch");
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("create branch"));
    }
}
