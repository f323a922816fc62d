#[macro_use]
mod macros;

pub mod auth;
pub mod booths;
pub mod branches;
pub mod class_sessions;
pub mod class_types;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod evaluations;
pub mod grades;
pub mod imports;
pub mod line_channels;
pub mod notifications;
pub mod students;
pub mod subjects;
pub mod system;
pub mod teachers;
pub mod time_slots;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, FieldError, PaginatedResponse, PaginationInfo, PaginationQuery,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 将 unix 秒转换为 UTC 时间
pub(crate) fn from_timestamp(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// 去除首尾空白，空字符串视为 None
pub(crate) fn normalize_opt(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
