use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use super::entities::{NotificationStatus, NotificationType, RecipientType};
use crate::models::common::query::{deserialize_nullable_i64, deserialize_opt_i64};
use crate::utils::validate::{validate_date, validate_not_blank, validate_optional_date};

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct CreateNotificationRequest {
    pub recipient_type: RecipientType,
    pub recipient_id: i64,
    pub line_channel_id: Option<i64>,
    pub notification_type: Option<NotificationType>, // 缺省为 announcement
    #[validate(length(min = 1, max = 2000), custom(function = "validate_not_blank"))]
    pub message: String,
    #[validate(custom(function = "validate_optional_date"))]
    pub target_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct UpdateNotificationRequest {
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub line_channel_id: Option<Option<i64>>,
    #[validate(length(min = 1, max = 2000), custom(function = "validate_not_blank"))]
    pub message: Option<String>,
    #[validate(custom(function = "validate_optional_date"))]
    pub target_date: Option<String>,
    pub status: Option<NotificationStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationFilter {
    pub status: Option<NotificationStatus>,
    pub recipient_type: Option<RecipientType>,
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub recipient_id: Option<i64>,
    pub target_date: Option<String>,
}

// 生成某日课次提醒
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct ReminderRequest {
    #[validate(custom(function = "validate_date"))]
    pub date: String,
}
