use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 上课时段（HH:MM）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/time_slot.ts")]
pub struct TimeSlot {
    pub id: i64,
    pub branch_id: Option<i64>,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
