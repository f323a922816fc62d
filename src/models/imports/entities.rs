use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

string_enum! {
    /// 支持 CSV 导入的实体
    #[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
    pub enum ImportEntity {
        Branches => "branches",
        Subjects => "subjects",
        Grades => "grades",
        ClassTypes => "class_types",
        Evaluations => "evaluations",
        Booths => "booths",
        Teachers => "teachers",
        Students => "students",
    }
}

string_enum! {
    /// 导入会话状态
    #[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
    pub enum ImportStatus {
        Pending => "pending",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
    }
}

impl ImportStatus {
    /// 状态只能沿 pending -> running -> succeeded | failed 前进
    pub fn can_transition_to(&self, next: ImportStatus) -> bool {
        matches!(
            (self, next),
            (ImportStatus::Pending, ImportStatus::Running)
                | (ImportStatus::Running, ImportStatus::Succeeded)
                | (ImportStatus::Running, ImportStatus::Failed)
        )
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ImportStatus::Succeeded | ImportStatus::Failed)
    }
}

// 单行错误，row 为 CSV 物理记录号（表头为第 1 行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct ImportRowError {
    pub row: u64,
    pub field: Option<String>,
    pub message: String,
}

impl ImportRowError {
    pub fn new(row: u64, field: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.map(str::to_string),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct ImportSummary {
    pub total: u64,
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
    pub errors: Vec<ImportRowError>,
}

// 导入会话（仅保存在进程内存中）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct ImportSession {
    pub id: Uuid,
    pub user_id: i64,
    pub entity: ImportEntity,
    pub file_name: String,
    pub encoding: Option<String>,
    pub status: ImportStatus,
    pub summary: ImportSummary,
    pub error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 推送给 SSE 订阅者的进度事件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub enum ImportEvent {
    Status {
        session_id: Uuid,
        status: ImportStatus,
        error: Option<String>,
    },
    Progress {
        session_id: Uuid,
        processed: u64,
        total: u64,
        created: u64,
        updated: u64,
        skipped: u64,
        errors: u64,
    },
}

impl ImportEvent {
    /// 终态事件之后不会再有新的事件
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportEvent::Status { status, .. } if status.is_finished())
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImportEvent::Status { .. } => "status",
            ImportEvent::Progress { .. } => "progress",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use ImportStatus::*;
        assert!(Pending.can_transition_to(Running));
        assert!(Running.can_transition_to(Succeeded));
        assert!(Running.can_transition_to(Failed));
        assert!(!Pending.can_transition_to(Succeeded));
        assert!(!Succeeded.can_transition_to(Running));
        assert!(!Failed.can_transition_to(Failed));
        assert!(!Running.can_transition_to(Pending));
    }

    #[test]
    fn test_event_serialization() {
        let event = ImportEvent::Status {
            session_id: Uuid::nil(),
            status: ImportStatus::Failed,
            error: Some("bad header".into()),
        };
        assert!(event.is_terminal());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "status");
        assert_eq!(json["status"], "failed");
    }
}
