use serde::{Deserialize, Serialize};
use ts_rs::TS;

string_enum! {
    /// 学段
    #[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
    pub enum SchoolLevel {
        Elementary => "elementary",
        Middle => "middle",
        High => "high",
        Other => "other",
    }
}

// 年级
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub name: String,
    pub school_level: SchoolLevel,
    pub grade_year: Option<i32>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
