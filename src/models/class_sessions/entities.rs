use serde::{Deserialize, Serialize};
use ts_rs::TS;

string_enum! {
    /// 课次状态
    #[ts(export, export_to = "../frontend/src/types/generated/class_session.ts")]
    pub enum SessionStatus {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

// 课次（排课表中的一格）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_session.ts")]
pub struct ClassSession {
    pub id: i64,
    pub branch_id: i64,
    pub teacher_id: i64,
    pub student_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub class_type_id: Option<i64>,
    pub booth_id: Option<i64>,
    pub evaluation_id: Option<i64>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: SessionStatus,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
