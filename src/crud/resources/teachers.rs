use sea_orm::{ActiveValue::Set, ColumnTrait, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{class_sessions, courses, teachers};
use crate::models::normalize_opt;
use crate::models::teachers::entities::Teacher;
use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherFilter, UpdateTeacherRequest,
};
use crate::models::users::entities::UserRole;

pub struct TeacherResource;

/// 邮箱统一小写保存，空串视为未填写
pub(crate) fn normalize_email(email: Option<String>) -> Option<String> {
    normalize_opt(email).map(|e| e.to_lowercase())
}

impl CrudResource for TeacherResource {
    type Entity = teachers::Entity;
    type Model = teachers::Model;
    type ActiveModel = teachers::ActiveModel;
    type Create = CreateTeacherRequest;
    type Update = UpdateTeacherRequest;
    type Filter = TeacherFilter;
    type Output = Teacher;

    const TABLE: &'static str = "teachers";
    const PATH: &'static str = "/api/v1/teachers";
    const LABEL: &'static str = "Teacher";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::teacher_roles()
    }

    fn id_column() -> teachers::Column {
        teachers::Column::Id
    }

    fn dependents() -> Vec<Dependent> {
        vec![
            Dependent::restrict::<class_sessions::Entity>(class_sessions::Column::TeacherId),
            Dependent::restrict::<courses::Entity>(courses::Column::TeacherId),
        ]
    }

    fn new_model(req: CreateTeacherRequest, now: i64) -> teachers::ActiveModel {
        teachers::ActiveModel {
            user_id: Set(req.user_id),
            branch_id: Set(req.branch_id),
            name: Set(req.name.trim().to_string()),
            kana_name: Set(normalize_opt(req.kana_name)),
            email: Set(normalize_email(req.email)),
            phone: Set(normalize_opt(req.phone)),
            line_id: Set(normalize_opt(req.line_id)),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut teachers::Model,
        req: UpdateTeacherRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(user_id) = req.user_id {
            model.user_id = user_id;
        }
        if let Some(branch_id) = req.branch_id {
            model.branch_id = branch_id;
        }
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        merge_opt(&mut model.kana_name, req.kana_name);
        if req.email.is_some() {
            model.email = normalize_email(req.email);
        }
        merge_opt(&mut model.phone, req.phone);
        merge_opt(&mut model.line_id, req.line_id);
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: teachers::Model) -> Teacher {
        model.into_teacher()
    }

    fn filter(select: Select<teachers::Entity>, filter: &TeacherFilter) -> Select<teachers::Entity> {
        let mut select = select;
        if let Some(branch_id) = filter.branch_id {
            select = select.filter(teachers::Column::BranchId.eq(branch_id));
        }
        if let Some(user_id) = filter.user_id {
            select = select.filter(teachers::Column::UserId.eq(user_id));
        }
        select
    }

    fn search_columns() -> Vec<teachers::Column> {
        vec![
            teachers::Column::Name,
            teachers::Column::KanaName,
            teachers::Column::Email,
        ]
    }

    fn order(select: Select<teachers::Entity>) -> Select<teachers::Entity> {
        select
            .order_by_asc(teachers::Column::KanaName)
            .order_by_asc(teachers::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::{BranchResource, fixtures};
    use crate::crud::store::{self, RemoveOutcome, UpdateOutcome};

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(Some(" Sato@Example.COM ".into())).as_deref(),
            Some("sato@example.com")
        );
        assert_eq!(normalize_email(Some("".into())), None);
    }

    #[tokio::test]
    async fn test_blank_optional_fields_are_cleared() {
        let db = fixtures::db().await;
        let teacher = fixtures::teacher(&db, None, "佐藤", Some("U123")).await;
        assert_eq!(teacher.line_id.as_deref(), Some("U123"));

        let req = UpdateTeacherRequest {
            line_id: Some(String::new()),
            ..Default::default()
        };
        match store::update::<TeacherResource, _>(&db, teacher.id, req)
            .await
            .unwrap()
        {
            UpdateOutcome::Updated(model) => {
                assert_eq!(model.line_id, None);
                assert_eq!(model.name, "佐藤");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_null_branch_unassigns_teacher() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        let teacher = fixtures::teacher(&db, Some(branch.id), "佐藤", None).await;

        let req: UpdateTeacherRequest =
            serde_json::from_str(r#"{"branch_id": null, "phone": ""}"#).unwrap();
        assert!(validator::Validate::validate(&req).is_ok());
        match store::update::<TeacherResource, _>(&db, teacher.id, req)
            .await
            .unwrap()
        {
            UpdateOutcome::Updated(model) => {
                assert_eq!(model.branch_id, None);
                assert_eq!(model.phone, None);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let outcome = store::remove::<BranchResource>(&db, branch.id).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed);
    }

    #[tokio::test]
    async fn test_remove_restricted_by_sessions() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        let teacher = fixtures::teacher(&db, Some(branch.id), "佐藤", None).await;
        fixtures::session(&db, branch.id, teacher.id, None, "2024-05-01", "16:00", "17:00").await;

        let outcome = store::remove::<TeacherResource>(&db, teacher.id).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Restricted(vec!["class_sessions"]));
    }
}
