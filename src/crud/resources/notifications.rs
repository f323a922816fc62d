use sea_orm::{ActiveValue::Set, ColumnTrait, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, merge_opt};
use crate::entity::notifications;
use crate::models::normalize_opt;
use crate::models::notifications::entities::{Notification, NotificationStatus, NotificationType};
use crate::models::notifications::requests::{
    CreateNotificationRequest, NotificationFilter, UpdateNotificationRequest,
};

pub struct NotificationResource;

impl CrudResource for NotificationResource {
    type Entity = notifications::Entity;
    type Model = notifications::Model;
    type ActiveModel = notifications::ActiveModel;
    type Create = CreateNotificationRequest;
    type Update = UpdateNotificationRequest;
    type Filter = NotificationFilter;
    type Output = Notification;

    const TABLE: &'static str = "notifications";
    const PATH: &'static str = "/api/v1/notifications";
    const LABEL: &'static str = "Notification";

    fn id_column() -> notifications::Column {
        notifications::Column::Id
    }

    fn new_model(req: CreateNotificationRequest, now: i64) -> notifications::ActiveModel {
        notifications::ActiveModel {
            recipient_type: Set(req.recipient_type.to_string()),
            recipient_id: Set(req.recipient_id),
            line_channel_id: Set(req.line_channel_id),
            notification_type: Set(req
                .notification_type
                .unwrap_or(NotificationType::Announcement)
                .to_string()),
            message: Set(req.message.trim().to_string()),
            target_date: Set(normalize_opt(req.target_date)),
            status: Set(NotificationStatus::Pending.to_string()),
            processing_attempts: Set(0),
            sent_at: Set(None),
            last_error: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut notifications::Model,
        req: UpdateNotificationRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(line_channel_id) = req.line_channel_id {
            model.line_channel_id = line_channel_id;
        }
        if let Some(message) = req.message {
            model.message = message.trim().to_string();
        }
        merge_opt(&mut model.target_date, req.target_date);
        if let Some(status) = req.status {
            model.status = status.to_string();
        }
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: notifications::Model) -> Notification {
        model.into_notification()
    }

    fn filter(
        select: Select<notifications::Entity>,
        filter: &NotificationFilter,
    ) -> Select<notifications::Entity> {
        use notifications::Column;

        let mut select = select;
        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(recipient_type) = filter.recipient_type {
            select = select.filter(Column::RecipientType.eq(recipient_type.as_str()));
        }
        if let Some(recipient_id) = filter.recipient_id {
            select = select.filter(Column::RecipientId.eq(recipient_id));
        }
        if let Some(date) = filter
            .target_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            select = select.filter(Column::TargetDate.eq(date));
        }
        select
    }

    fn search_columns() -> Vec<notifications::Column> {
        vec![notifications::Column::Message]
    }

    // 最新的在前
    fn order(select: Select<notifications::Entity>) -> Select<notifications::Entity> {
        select
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::ListParams;
    use crate::crud::resources::fixtures;
    use crate::crud::store;
    use crate::models::notifications::entities::RecipientType;

    #[tokio::test]
    async fn test_new_notification_is_pending_announcement() {
        let db = fixtures::db().await;
        let req = CreateNotificationRequest {
            recipient_type: RecipientType::Student,
            recipient_id: 7,
            line_channel_id: None,
            notification_type: None,
            message: "  夏期講習のお知らせ ".into(),
            target_date: Some("".into()),
        };
        let model = store::create::<NotificationResource, _>(&db, req)
            .await
            .unwrap();
        let output = NotificationResource::to_output(model);
        assert_eq!(output.status, NotificationStatus::Pending);
        assert_eq!(output.notification_type, NotificationType::Announcement);
        assert_eq!(output.message, "夏期講習のお知らせ");
        assert_eq!(output.target_date, None);
        assert_eq!(output.processing_attempts, 0);

        let params = ListParams {
            filter: NotificationFilter {
                recipient_type: Some(RecipientType::Teacher),
                ..Default::default()
            },
            ..Default::default()
        };
        let page = store::list::<NotificationResource>(&db, params).await.unwrap();
        assert_eq!(page.pagination.total, 0);
    }
}
