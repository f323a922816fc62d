use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 选课（学生在某科目上的长期报名）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub class_type_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub sessions_per_week: i32,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
