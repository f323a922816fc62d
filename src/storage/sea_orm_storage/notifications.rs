use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::{class_sessions, line_channels, notifications, students, teachers};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    class_sessions::entities::SessionStatus,
    notifications::entities::{
        Notification, NotificationStatus, NotificationType, RecipientType, ReminderSummary,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

/// 提醒文案
fn reminder_message(session: &class_sessions::Model) -> String {
    format!(
        "You have a class scheduled on {} from {} to {}.",
        session.date, session.start_time, session.end_time
    )
}

fn has_line_id(line_id: &Option<String>) -> bool {
    line_id.as_deref().is_some_and(|id| !id.trim().is_empty())
}

/// 校区自己的启用通道优先，其次是未绑定校区的公共通道，均取 id 最小者
async fn pick_channel<C: ConnectionTrait>(db: &C, branch_id: i64) -> Result<Option<i64>> {
    let own = line_channels::Entity::find()
        .filter(line_channels::Column::IsActive.eq(true))
        .filter(line_channels::Column::BranchId.eq(branch_id))
        .order_by_asc(line_channels::Column::Id)
        .one(db)
        .await?;
    if let Some(channel) = own {
        return Ok(Some(channel.id));
    }

    let shared = line_channels::Entity::find()
        .filter(line_channels::Column::IsActive.eq(true))
        .filter(line_channels::Column::BranchId.is_null())
        .order_by_asc(line_channels::Column::Id)
        .one(db)
        .await?;
    Ok(shared.map(|c| c.id))
}

async fn has_pending_reminder<C: ConnectionTrait>(
    db: &C,
    recipient_type: RecipientType,
    recipient_id: i64,
    date: &str,
) -> Result<bool> {
    let count = notifications::Entity::find()
        .filter(notifications::Column::RecipientType.eq(recipient_type.as_str()))
        .filter(notifications::Column::RecipientId.eq(recipient_id))
        .filter(notifications::Column::TargetDate.eq(date))
        .filter(
            notifications::Column::NotificationType.eq(NotificationType::SessionReminder.as_str()),
        )
        .filter(notifications::Column::Status.eq(NotificationStatus::Pending.as_str()))
        .count(db)
        .await?;
    Ok(count > 0)
}

impl SeaOrmStorage {
    /// 为某日所有 scheduled 课次的讲师与学生生成待发送提醒
    ///
    /// 没有 LINE ID、校区无可用通道或当天已有待发送提醒的接收方计入 skipped。
    pub async fn enqueue_session_reminders_impl(&self, date: &str) -> Result<ReminderSummary> {
        let txn = self.db.begin().await?;

        let sessions = class_sessions::Entity::find()
            .filter(class_sessions::Column::Date.eq(date))
            .filter(class_sessions::Column::Status.eq(SessionStatus::Scheduled.as_str()))
            .order_by_asc(class_sessions::Column::StartTime)
            .order_by_asc(class_sessions::Column::Id)
            .all(&txn)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询课次失败: {e}")))?;

        let mut summary = ReminderSummary {
            date: date.to_string(),
            sessions: sessions.len() as u64,
            created: 0,
            skipped: 0,
        };
        let mut channels: HashMap<i64, Option<i64>> = HashMap::new();
        let now = chrono::Utc::now().timestamp();

        for session in &sessions {
            let channel = match channels.get(&session.branch_id) {
                Some(channel) => *channel,
                None => {
                    let channel = pick_channel(&txn, session.branch_id).await?;
                    channels.insert(session.branch_id, channel);
                    channel
                }
            };

            let mut recipients = Vec::with_capacity(2);
            if let Some(teacher) = teachers::Entity::find_by_id(session.teacher_id)
                .one(&txn)
                .await?
            {
                recipients.push((RecipientType::Teacher, teacher.id, teacher.line_id));
            }
            if let Some(student_id) = session.student_id
                && let Some(student) = students::Entity::find_by_id(student_id).one(&txn).await?
            {
                recipients.push((RecipientType::Student, student.id, student.line_id));
            }

            for (recipient_type, recipient_id, line_id) in recipients {
                let Some(channel_id) = channel.filter(|_| has_line_id(&line_id)) else {
                    summary.skipped += 1;
                    continue;
                };
                if has_pending_reminder(&txn, recipient_type, recipient_id, date).await? {
                    summary.skipped += 1;
                    continue;
                }

                notifications::ActiveModel {
                    recipient_type: Set(recipient_type.to_string()),
                    recipient_id: Set(recipient_id),
                    line_channel_id: Set(Some(channel_id)),
                    notification_type: Set(NotificationType::SessionReminder.to_string()),
                    message: Set(reminder_message(session)),
                    target_date: Set(Some(date.to_string())),
                    status: Set(NotificationStatus::Pending.to_string()),
                    processing_attempts: Set(0),
                    sent_at: Set(None),
                    last_error: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| TutorHubError::from_db(e, "创建提醒失败"))?;
                summary.created += 1;
                debug!(
                    "已为 {} #{} 生成课次 #{} 的提醒",
                    recipient_type, recipient_id, session.id
                );
            }
        }

        txn.commit().await?;
        info!(
            "{} 的课次提醒: 课次 {}，新建 {}，跳过 {}",
            date, summary.sessions, summary.created, summary.skipped
        );
        Ok(summary)
    }

    /// 失败的通知重新排队：回到 pending，清空尝试次数与错误信息
    pub async fn reset_notification_impl(&self, id: i64) -> Result<Option<Notification>> {
        let Some(model) = notifications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询通知失败: {e}")))?
        else {
            return Ok(None);
        };

        if model.status != NotificationStatus::Failed.as_str() {
            return Err(TutorHubError::conflict(format!(
                "Only failed notifications can be retried (current status: {})",
                model.status
            )));
        }

        let mut active = model.into_active_model();
        active.status = Set(NotificationStatus::Pending.to_string());
        active.processing_attempts = Set(0);
        active.last_error = Set(None);
        active.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("重置通知失败: {e}")))?;
        Ok(Some(updated.into_notification()))
    }
}
