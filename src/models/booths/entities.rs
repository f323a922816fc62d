use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 自习/授课座位（隔间），同一校区内名称唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/booth.ts")]
pub struct Booth {
    pub id: i64,
    pub branch_id: i64,
    pub name: String,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
