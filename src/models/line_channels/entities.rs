use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// LINE 公众号通道
///
/// 密钥与 access token 只写不读，对外只暴露是否已配置。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/line_channel.ts")]
pub struct LineChannel {
    pub id: i64,
    pub name: String,
    pub channel_id: String,
    pub branch_id: Option<i64>,
    pub is_active: bool,
    pub description: Option<String>,
    pub has_secret: bool,
    pub has_access_token: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
