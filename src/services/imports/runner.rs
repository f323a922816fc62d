//! 后台导入任务

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};
use uuid::Uuid;

use super::encoding::decode_upload;
use super::parser::{ColumnSpec, CsvRecord, parse_csv};
use super::sessions::ImportSessionManager;
use super::targets::{ImportTarget, import_records};
use crate::crud::resources::{
    BoothResource, BranchResource, ClassTypeResource, EvaluationResource, GradeResource,
    StudentResource, SubjectResource, TeacherResource,
};
use crate::errors::{Result, TutorHubError};
use crate::models::imports::entities::{ImportEntity, ImportStatus, ImportSummary};
use crate::storage::Storage;

/// 每处理多少行推送一次进度
pub const PROGRESS_EVERY: u64 = 50;

/// 实体对应的导入列
pub fn columns_for(entity: ImportEntity) -> &'static [ColumnSpec] {
    match entity {
        ImportEntity::Branches => BranchResource::COLUMNS,
        ImportEntity::Subjects => SubjectResource::COLUMNS,
        ImportEntity::Grades => GradeResource::COLUMNS,
        ImportEntity::ClassTypes => ClassTypeResource::COLUMNS,
        ImportEntity::Evaluations => EvaluationResource::COLUMNS,
        ImportEntity::Booths => BoothResource::COLUMNS,
        ImportEntity::Teachers => TeacherResource::COLUMNS,
        ImportEntity::Students => StudentResource::COLUMNS,
    }
}

/// 需要导入的文件内容
pub struct ImportJob {
    pub session_id: Uuid,
    pub entity: ImportEntity,
    pub bytes: Vec<u8>,
    pub max_rows: usize,
}

/// 执行一次导入并把会话推进到终态
pub async fn run_import(storage: Arc<dyn Storage>, sessions: &ImportSessionManager, job: ImportJob) {
    let session_id = job.session_id;
    if let Err(e) = sessions.transition(session_id, ImportStatus::Running, None) {
        warn!("Import session {} could not start: {}", session_id, e);
        return;
    }

    let result = execute(storage.connection(), sessions, &job).await;

    let finished = match result {
        Ok(summary) => {
            sessions.record_progress(session_id, &summary);
            info!(
                "Import {} ({}) finished: {} created, {} updated, {} skipped, {} error(s)",
                session_id,
                job.entity,
                summary.created,
                summary.updated,
                summary.skipped,
                summary.errors.len()
            );
            sessions.transition(session_id, ImportStatus::Succeeded, None)
        }
        Err(e) => {
            warn!("Import {} ({}) failed: {}", session_id, job.entity, e);
            sessions.transition(
                session_id,
                ImportStatus::Failed,
                Some(e.message().to_string()),
            )
        }
    };

    if let Err(e) = finished {
        warn!("Import session {} could not finish: {}", session_id, e);
    }
}

async fn execute(
    db: &DatabaseConnection,
    sessions: &ImportSessionManager,
    job: &ImportJob,
) -> Result<ImportSummary> {
    let decoded = decode_upload(&job.bytes)?;
    sessions.set_encoding(job.session_id, decoded.encoding);

    let records = parse_csv(&decoded.text, columns_for(job.entity))?;
    if records.is_empty() {
        return Err(TutorHubError::import_format("CSV file has no data rows"));
    }
    if records.len() > job.max_rows {
        return Err(TutorHubError::import_format(format!(
            "CSV file has {} data rows, the limit is {}",
            records.len(),
            job.max_rows
        )));
    }

    let summary = match job.entity {
        ImportEntity::Branches => process::<BranchResource>(db, sessions, job, records).await,
        ImportEntity::Subjects => process::<SubjectResource>(db, sessions, job, records).await,
        ImportEntity::Grades => process::<GradeResource>(db, sessions, job, records).await,
        ImportEntity::ClassTypes => process::<ClassTypeResource>(db, sessions, job, records).await,
        ImportEntity::Evaluations => {
            process::<EvaluationResource>(db, sessions, job, records).await
        }
        ImportEntity::Booths => process::<BoothResource>(db, sessions, job, records).await,
        ImportEntity::Teachers => process::<TeacherResource>(db, sessions, job, records).await,
        ImportEntity::Students => process::<StudentResource>(db, sessions, job, records).await,
    };
    Ok(summary)
}

async fn process<T: ImportTarget>(
    db: &DatabaseConnection,
    sessions: &ImportSessionManager,
    job: &ImportJob,
    records: Vec<CsvRecord>,
) -> ImportSummary {
    import_records::<T>(db, records, PROGRESS_EVERY, |summary| {
        sessions.record_progress(job.session_id, summary)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::imports::entities::ImportEvent;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn storage() -> Arc<dyn Storage> {
        Arc::new(SeaOrmStorage::new_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn test_successful_import_reaches_succeeded() {
        let storage = storage().await;
        let sessions = ImportSessionManager::new(16, 3600);
        let session = sessions.create(1, ImportEntity::Subjects, "subjects.csv");
        let (_, mut rx) = sessions.subscribe(session.id).unwrap();

        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("科目名,備考\n数学,\n英語,週2回\n数学,\n".as_bytes());
        let job = ImportJob {
            session_id: session.id,
            entity: ImportEntity::Subjects,
            bytes,
            max_rows: 100,
        };
        run_import(storage, &sessions, job).await;

        let done = sessions.find(session.id).unwrap();
        assert_eq!(done.status, ImportStatus::Succeeded);
        assert_eq!(done.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(done.summary.total, 3);
        assert_eq!(done.summary.created, 2);
        assert_eq!(done.summary.skipped, 1);

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert!(matches!(
            last,
            Some(ImportEvent::Status {
                status: ImportStatus::Succeeded,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_missing_column_and_row_limit_fail_session() {
        let storage = storage().await;
        let sessions = ImportSessionManager::new(16, 3600);

        let session = sessions.create(1, ImportEntity::Evaluations, "e.csv");
        let job = ImportJob {
            session_id: session.id,
            entity: ImportEntity::Evaluations,
            bytes: b"name\nA\n".to_vec(),
            max_rows: 100,
        };
        run_import(storage.clone(), &sessions, job).await;
        let failed = sessions.find(session.id).unwrap();
        assert_eq!(failed.status, ImportStatus::Failed);
        assert!(failed.error.unwrap().contains("score"));

        let session = sessions.create(1, ImportEntity::Subjects, "s.csv");
        let job = ImportJob {
            session_id: session.id,
            entity: ImportEntity::Subjects,
            bytes: b"name\na\nb\nc\n".to_vec(),
            max_rows: 2,
        };
        run_import(storage, &sessions, job).await;
        let failed = sessions.find(session.id).unwrap();
        assert_eq!(failed.status, ImportStatus::Failed);
        assert!(failed.finished_at.is_some());
    }

    #[test]
    fn test_every_entity_has_required_name_column() {
        for entity in ImportEntity::ALL {
            let columns = columns_for(*entity);
            assert!(
                columns.iter().any(|c| c.key == "name" && c.required),
                "{entity} has no required name column"
            );
        }
    }
}
