use serde::{Deserialize, Serialize};
use ts_rs::TS;

string_enum! {
    /// 通知接收方类型
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum RecipientType {
        Teacher => "teacher",
        Student => "student",
    }
}

string_enum! {
    /// 通知类型
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum NotificationType {
        SessionReminder => "session_reminder",
        Announcement => "announcement",
    }
}

string_enum! {
    /// 发送状态，由外部发送进程推进
    #[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
    pub enum NotificationStatus {
        Pending => "pending",
        Sent => "sent",
        Failed => "failed",
    }
}

// 通知
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub recipient_type: RecipientType,
    pub recipient_id: i64,
    pub line_channel_id: Option<i64>,
    pub notification_type: NotificationType,
    pub message: String,
    pub target_date: Option<String>,
    pub status: NotificationStatus,
    pub processing_attempts: i32,
    pub sent_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 批量生成提醒的结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct ReminderSummary {
    pub date: String,
    pub sessions: u64, // 当天处于 scheduled 状态的课次数
    pub created: u64,
    pub skipped: u64, // 已存在待发送提醒或缺少 LINE 信息
}
