//! 通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub recipient_type: String,
    pub recipient_id: i64,
    pub line_channel_id: Option<i64>,
    pub notification_type: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub target_date: Option<String>,
    pub status: String,
    pub processing_attempts: i32,
    pub sent_at: Option<i64>,
    pub last_error: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::line_channels::Entity",
        from = "Column::LineChannelId",
        to = "super::line_channels::Column::Id"
    )]
    LineChannel,
}

impl Related<super::line_channels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineChannel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification(self) -> crate::models::notifications::entities::Notification {
        use crate::models::from_timestamp;
        use crate::models::notifications::entities::{
            Notification, NotificationStatus, NotificationType, RecipientType,
        };

        Notification {
            id: self.id,
            recipient_type: self
                .recipient_type
                .parse::<RecipientType>()
                .unwrap_or(RecipientType::Student),
            recipient_id: self.recipient_id,
            line_channel_id: self.line_channel_id,
            notification_type: self
                .notification_type
                .parse::<NotificationType>()
                .unwrap_or(NotificationType::Announcement),
            message: self.message,
            target_date: self.target_date,
            status: self
                .status
                .parse::<NotificationStatus>()
                .unwrap_or(NotificationStatus::Pending),
            processing_attempts: self.processing_attempts,
            sent_at: self.sent_at.map(from_timestamp),
            last_error: self.last_error,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
