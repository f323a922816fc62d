use serde::Serialize;
use ts_rs::TS;

use super::entities::ImportSession;

// 上传受理响应（202）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct ImportAcceptedResponse {
    pub session: ImportSession,
    pub events_url: String,
}
