use serde::{Deserialize, Serialize};
use ts_rs::TS;

string_enum! {
    /// 在籍状态
    #[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
    pub enum StudentStatus {
        Enrolled => "enrolled",
        Paused => "paused",
        Withdrawn => "withdrawn",
    }
}

// 学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub user_id: Option<i64>,
    pub branch_id: Option<i64>,
    pub grade_id: Option<i64>,
    pub name: String,
    pub kana_name: Option<String>,
    pub school_name: Option<String>,
    pub email: Option<String>,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub line_id: Option<String>,
    pub status: StudentStatus,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
