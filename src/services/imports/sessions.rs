//! 导入会话与每用户导入闸门
//!
//! 会话只保存在进程内存中，重启即丢失。每个会话持有一个广播通道，
//! 状态变化与阶段性进度都会推送给 SSE 订阅者。

use chrono::{Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::Lazy;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::{Result, TutorHubError};
use crate::models::imports::entities::{
    ImportEntity, ImportEvent, ImportSession, ImportStatus, ImportSummary,
};

static IMPORT_SESSIONS: Lazy<ImportSessionManager> = Lazy::new(|| {
    let config = &AppConfig::get().import;
    ImportSessionManager::new(config.event_buffer, config.session_ttl)
});

static IMPORT_GATE: Lazy<ImportGate> = Lazy::new(ImportGate::new);

struct SessionEntry {
    session: ImportSession,
    events: broadcast::Sender<ImportEvent>,
}

/// 会话管理器
pub struct ImportSessionManager {
    sessions: DashMap<Uuid, SessionEntry>,
    event_buffer: usize,
    ttl: Duration,
}

impl ImportSessionManager {
    pub fn new(event_buffer: usize, ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            event_buffer: event_buffer.max(1),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &IMPORT_SESSIONS
    }

    /// 新建 pending 会话，顺带清理过期会话
    pub fn create(&self, user_id: i64, entity: ImportEntity, file_name: &str) -> ImportSession {
        self.purge_expired();

        let now = Utc::now();
        let session = ImportSession {
            id: Uuid::new_v4(),
            user_id,
            entity,
            file_name: file_name.to_string(),
            encoding: None,
            status: ImportStatus::Pending,
            summary: ImportSummary::default(),
            error: None,
            created_at: now,
            updated_at: now,
            finished_at: None,
        };
        let (events, _) = broadcast::channel(self.event_buffer);
        self.sessions.insert(
            session.id,
            SessionEntry {
                session: session.clone(),
                events,
            },
        );
        session
    }

    pub fn find(&self, id: Uuid) -> Option<ImportSession> {
        self.sessions.get(&id).map(|entry| entry.session.clone())
    }

    /// 返回会话快照与事件接收端，二者取自同一时刻
    pub fn subscribe(&self, id: Uuid) -> Option<(ImportSession, broadcast::Receiver<ImportEvent>)> {
        self.sessions
            .get(&id)
            .map(|entry| (entry.session.clone(), entry.events.subscribe()))
    }

    /// 状态迁移，非法迁移返回 Conflict
    pub fn transition(
        &self,
        id: Uuid,
        next: ImportStatus,
        error: Option<String>,
    ) -> Result<ImportSession> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or_else(|| TutorHubError::not_found(format!("Import session {id} not found")))?;

        let current = entry.session.status;
        if !current.can_transition_to(next) {
            return Err(TutorHubError::conflict(format!(
                "Import session cannot move from {current} to {next}"
            )));
        }

        let now = Utc::now();
        entry.session.status = next;
        entry.session.updated_at = now;
        if next.is_finished() {
            entry.session.finished_at = Some(now);
            entry.session.error = error.clone();
        }

        // 没有订阅者时发送失败，忽略即可
        let _ = entry.events.send(ImportEvent::Status {
            session_id: id,
            status: next,
            error,
        });
        debug!("Import session {} -> {}", id, next);
        Ok(entry.session.clone())
    }

    pub fn set_encoding(&self, id: Uuid, encoding: &str) {
        if let Some(mut entry) = self.sessions.get_mut(&id) {
            entry.session.encoding = Some(encoding.to_string());
            entry.session.updated_at = Utc::now();
        }
    }

    /// 保存当前汇总并推送进度事件
    pub fn record_progress(&self, id: Uuid, summary: &ImportSummary) {
        if let Some(mut entry) = self.sessions.get_mut(&id) {
            entry.session.summary = summary.clone();
            entry.session.updated_at = Utc::now();
            let _ = entry.events.send(ImportEvent::Progress {
                session_id: id,
                processed: summary.processed,
                total: summary.total,
                created: summary.created,
                updated: summary.updated,
                skipped: summary.skipped,
                errors: summary.errors.len() as u64,
            });
        }
    }

    /// 清理结束时间早于 TTL 的会话，返回清理数量
    pub fn purge_expired(&self) -> usize {
        let cutoff = Utc::now() - self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| match entry.session.finished_at {
            Some(finished_at) => finished_at > cutoff,
            None => true,
        });
        let purged = before.saturating_sub(self.sessions.len());
        if purged > 0 {
            debug!("Purged {} expired import session(s)", purged);
        }
        purged
    }
}

/// 每个用户同时只能有一个导入在运行
pub struct ImportGate {
    running: DashMap<i64, ()>,
}

impl ImportGate {
    pub fn new() -> Self {
        Self {
            running: DashMap::new(),
        }
    }

    /// 获取全局实例
    pub fn get() -> &'static Self {
        &IMPORT_GATE
    }

    /// 已有导入在运行时返回 None
    pub fn try_acquire(&self, user_id: i64) -> Option<ImportGuard<'_>> {
        match self.running.entry(user_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(ImportGuard {
                    gate: self,
                    user_id,
                })
            }
        }
    }

    pub fn is_held(&self, user_id: i64) -> bool {
        self.running.contains_key(&user_id)
    }
}

impl Default for ImportGate {
    fn default() -> Self {
        Self::new()
    }
}

/// 释放时解除闸门，导入任务无论成功失败都会经过这里
pub struct ImportGuard<'a> {
    gate: &'a ImportGate,
    user_id: i64,
}

impl Drop for ImportGuard<'_> {
    fn drop(&mut self) {
        self.gate.running.remove(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_is_exclusive_per_user() {
        let gate = ImportGate::new();
        let guard = gate.try_acquire(1).unwrap();
        assert!(gate.try_acquire(1).is_none());
        assert!(gate.is_held(1));

        // 其他用户不受影响
        let other = gate.try_acquire(2);
        assert!(other.is_some());

        drop(guard);
        assert!(!gate.is_held(1));
        assert!(gate.try_acquire(1).is_some());
    }

    #[test]
    fn test_transitions_follow_state_machine() {
        let manager = ImportSessionManager::new(8, 3600);
        let session = manager.create(1, ImportEntity::Branches, "branches.csv");
        assert_eq!(session.status, ImportStatus::Pending);

        let err = manager
            .transition(session.id, ImportStatus::Succeeded, None)
            .unwrap_err();
        assert!(matches!(err, TutorHubError::Conflict(_)));

        manager
            .transition(session.id, ImportStatus::Running, None)
            .unwrap();
        let done = manager
            .transition(session.id, ImportStatus::Failed, Some("bad header".into()))
            .unwrap();
        assert_eq!(done.error.as_deref(), Some("bad header"));
        assert!(done.finished_at.is_some());

        assert!(
            manager
                .transition(session.id, ImportStatus::Running, None)
                .is_err()
        );
        assert!(matches!(
            manager.transition(Uuid::new_v4(), ImportStatus::Running, None),
            Err(TutorHubError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let manager = ImportSessionManager::new(8, 3600);
        let session = manager.create(1, ImportEntity::Subjects, "subjects.csv");
        let (snapshot, mut rx) = manager.subscribe(session.id).unwrap();
        assert_eq!(snapshot.status, ImportStatus::Pending);

        manager
            .transition(session.id, ImportStatus::Running, None)
            .unwrap();
        let summary = ImportSummary {
            total: 100,
            processed: 50,
            created: 50,
            ..Default::default()
        };
        manager.record_progress(session.id, &summary);
        manager
            .transition(session.id, ImportStatus::Succeeded, None)
            .unwrap();

        assert!(matches!(
            rx.recv().await.unwrap(),
            ImportEvent::Status {
                status: ImportStatus::Running,
                ..
            }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            ImportEvent::Progress { processed: 50, .. }
        ));
        assert!(rx.recv().await.unwrap().is_terminal());
        assert_eq!(manager.find(session.id).unwrap().summary.processed, 50);
    }

    #[test]
    fn test_purge_only_finished_sessions() {
        let manager = ImportSessionManager::new(8, 0);
        let running = manager.create(1, ImportEntity::Grades, "a.csv");
        let finished = manager.create(2, ImportEntity::Grades, "b.csv");
        manager
            .transition(running.id, ImportStatus::Running, None)
            .unwrap();
        manager
            .transition(finished.id, ImportStatus::Running, None)
            .unwrap();
        manager
            .transition(finished.id, ImportStatus::Succeeded, None)
            .unwrap();

        assert_eq!(manager.purge_expired(), 1);
        assert!(manager.find(running.id).is_some());
        assert!(manager.find(finished.id).is_none());
    }
}
