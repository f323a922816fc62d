use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 讲师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub id: i64,
    pub user_id: Option<i64>, // 关联的登录账号
    pub branch_id: Option<i64>,
    pub name: String,
    pub kana_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub line_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
