use sea_orm::{ActiveValue::Set, ColumnTrait, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, merge_opt};
use crate::entity::class_sessions;
use crate::models::class_sessions::entities::{ClassSession, SessionStatus};
use crate::models::class_sessions::requests::{
    ClassSessionFilter, CreateClassSessionRequest, UpdateClassSessionRequest,
};
use crate::models::normalize_opt;
use crate::models::users::entities::UserRole;
use crate::utils::validate::check_time_order;

pub struct ClassSessionResource;

impl CrudResource for ClassSessionResource {
    type Entity = class_sessions::Entity;
    type Model = class_sessions::Model;
    type ActiveModel = class_sessions::ActiveModel;
    type Create = CreateClassSessionRequest;
    type Update = UpdateClassSessionRequest;
    type Filter = ClassSessionFilter;
    type Output = ClassSession;

    const TABLE: &'static str = "class_sessions";
    const PATH: &'static str = "/api/v1/class-sessions";
    const LABEL: &'static str = "Class session";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::teacher_roles()
    }

    fn id_column() -> class_sessions::Column {
        class_sessions::Column::Id
    }

    fn new_model(req: CreateClassSessionRequest, now: i64) -> class_sessions::ActiveModel {
        class_sessions::ActiveModel {
            branch_id: Set(req.branch_id),
            teacher_id: Set(req.teacher_id),
            student_id: Set(req.student_id),
            subject_id: Set(req.subject_id),
            class_type_id: Set(req.class_type_id),
            booth_id: Set(req.booth_id),
            evaluation_id: Set(req.evaluation_id),
            date: Set(req.date.trim().to_string()),
            start_time: Set(req.start_time.trim().to_string()),
            end_time: Set(req.end_time.trim().to_string()),
            status: Set(req.status.unwrap_or(SessionStatus::Scheduled).to_string()),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut class_sessions::Model,
        req: UpdateClassSessionRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(start) = req.start_time {
            model.start_time = start.trim().to_string();
        }
        if let Some(end) = req.end_time {
            model.end_time = end.trim().to_string();
        }
        check_time_order(&model.start_time, &model.end_time)?;

        if let Some(branch_id) = req.branch_id {
            model.branch_id = branch_id;
        }
        if let Some(teacher_id) = req.teacher_id {
            model.teacher_id = teacher_id;
        }
        if let Some(student_id) = req.student_id {
            model.student_id = student_id;
        }
        if let Some(subject_id) = req.subject_id {
            model.subject_id = subject_id;
        }
        if let Some(class_type_id) = req.class_type_id {
            model.class_type_id = class_type_id;
        }
        if let Some(booth_id) = req.booth_id {
            model.booth_id = booth_id;
        }
        if let Some(evaluation_id) = req.evaluation_id {
            model.evaluation_id = evaluation_id;
        }
        if let Some(date) = req.date {
            model.date = date.trim().to_string();
        }
        if let Some(status) = req.status {
            model.status = status.to_string();
        }
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: class_sessions::Model) -> ClassSession {
        model.into_class_session()
    }

    fn filter(
        select: Select<class_sessions::Entity>,
        filter: &ClassSessionFilter,
    ) -> Select<class_sessions::Entity> {
        use class_sessions::Column;

        let mut select = select;
        if let Some(branch_id) = filter.branch_id {
            select = select.filter(Column::BranchId.eq(branch_id));
        }
        if let Some(teacher_id) = filter.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(student_id) = filter.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(booth_id) = filter.booth_id {
            select = select.filter(Column::BoothId.eq(booth_id));
        }
        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(date) = non_blank(&filter.date) {
            select = select.filter(Column::Date.eq(date));
        }
        if let Some(from) = non_blank(&filter.date_from) {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = non_blank(&filter.date_to) {
            select = select.filter(Column::Date.lte(to));
        }
        select
    }

    fn search_columns() -> Vec<class_sessions::Column> {
        vec![class_sessions::Column::Notes]
    }

    fn order(select: Select<class_sessions::Entity>) -> Select<class_sessions::Entity> {
        select
            .order_by_desc(class_sessions::Column::Date)
            .order_by_asc(class_sessions::Column::StartTime)
            .order_by_asc(class_sessions::Column::Id)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::ListParams;
    use crate::crud::resources::fixtures;
    use crate::crud::store::{self, UpdateOutcome};

    #[tokio::test]
    async fn test_null_unassigns_optional_references() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        let teacher = fixtures::teacher(&db, Some(branch.id), "佐藤", None).await;
        let student = fixtures::student(&db, Some(branch.id), "田中", None).await;
        let booth = fixtures::booth(&db, branch.id, "A-1").await;
        let session = fixtures::session(
            &db,
            branch.id,
            teacher.id,
            Some(student.id),
            "2024-05-01",
            "16:00",
            "17:00",
        )
        .await;

        let req = UpdateClassSessionRequest {
            booth_id: Some(Some(booth.id)),
            ..Default::default()
        };
        store::update::<ClassSessionResource, _>(&db, session.id, req)
            .await
            .unwrap();

        // 仅清空教室，学生保持不变
        let req: UpdateClassSessionRequest =
            serde_json::from_str(r#"{"booth_id": null}"#).unwrap();
        match store::update::<ClassSessionResource, _>(&db, session.id, req)
            .await
            .unwrap()
        {
            UpdateOutcome::Updated(model) => {
                assert_eq!(model.booth_id, None);
                assert_eq!(model.student_id, Some(student.id));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let req: UpdateClassSessionRequest =
            serde_json::from_str(r#"{"student_id": null}"#).unwrap();
        let outcome = store::update::<ClassSessionResource, _>(&db, session.id, req)
            .await
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::Updated(m) if m.student_id.is_none()));
    }

    #[tokio::test]
    async fn test_date_range_filter_and_order() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        let teacher = fixtures::teacher(&db, Some(branch.id), "佐藤", None).await;
        for (date, start, end) in [
            ("2024-05-01", "18:00", "19:00"),
            ("2024-05-01", "16:00", "17:00"),
            ("2024-05-03", "16:00", "17:00"),
            ("2024-05-10", "16:00", "17:00"),
        ] {
            fixtures::session(&db, branch.id, teacher.id, None, date, start, end).await;
        }

        let params = ListParams {
            filter: ClassSessionFilter {
                date_from: Some("2024-05-01".into()),
                date_to: Some("2024-05-03".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let page = store::list::<ClassSessionResource>(&db, params).await.unwrap();
        let slots: Vec<_> = page
            .items
            .iter()
            .map(|s| (s.date.as_str(), s.start_time.as_str()))
            .collect();
        assert_eq!(
            slots,
            vec![
                ("2024-05-03", "16:00"),
                ("2024-05-01", "16:00"),
                ("2024-05-01", "18:00"),
            ]
        );
        assert_eq!(page.items[0].status, SessionStatus::Scheduled);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some(" 2024-05-01 ".into())), Some("2024-05-01"));
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&None), None);
    }
}
