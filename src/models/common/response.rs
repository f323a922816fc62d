use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

/// 字段级校验错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// 统一的API响应结构：成功时携带 data，失败时携带 error（及可选的字段错误列表）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            data: Some(data),
            message: Some(message.into()),
            error: None,
            details: Vec::new(),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            data: None,
            message: Some(message.into()),
            error: None,
            details: Vec::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            data: None,
            message: None,
            error: Some(error.into()),
            details: Vec::new(),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn validation_failed(details: Vec<FieldError>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed as i32,
            data: None,
            message: None,
            error: Some("Validation failed".to_string()),
            details,
            timestamp: chrono::Utc::now(),
        }
    }
}
