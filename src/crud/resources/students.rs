use sea_orm::{ActiveValue::Set, ColumnTrait, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use super::normalize_email;
use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{class_sessions, courses, students};
use crate::models::normalize_opt;
use crate::models::students::entities::{Student, StudentStatus};
use crate::models::students::requests::{
    CreateStudentRequest, StudentFilter, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;

pub struct StudentResource;

impl CrudResource for StudentResource {
    type Entity = students::Entity;
    type Model = students::Model;
    type ActiveModel = students::ActiveModel;
    type Create = CreateStudentRequest;
    type Update = UpdateStudentRequest;
    type Filter = StudentFilter;
    type Output = Student;

    const TABLE: &'static str = "students";
    const PATH: &'static str = "/api/v1/students";
    const LABEL: &'static str = "Student";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::teacher_roles()
    }

    fn id_column() -> students::Column {
        students::Column::Id
    }

    // 选课记录随学生删除，已排的课次必须先处理
    fn dependents() -> Vec<Dependent> {
        vec![
            Dependent::restrict::<class_sessions::Entity>(class_sessions::Column::StudentId),
            Dependent::cascade::<courses::Entity>(courses::Column::StudentId),
        ]
    }

    fn new_model(req: CreateStudentRequest, now: i64) -> students::ActiveModel {
        students::ActiveModel {
            user_id: Set(req.user_id),
            branch_id: Set(req.branch_id),
            grade_id: Set(req.grade_id),
            name: Set(req.name.trim().to_string()),
            kana_name: Set(normalize_opt(req.kana_name)),
            school_name: Set(normalize_opt(req.school_name)),
            email: Set(normalize_email(req.email)),
            parent_email: Set(normalize_email(req.parent_email)),
            parent_phone: Set(normalize_opt(req.parent_phone)),
            line_id: Set(normalize_opt(req.line_id)),
            status: Set(req.status.unwrap_or(StudentStatus::Enrolled).to_string()),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut students::Model,
        req: UpdateStudentRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(user_id) = req.user_id {
            model.user_id = user_id;
        }
        if let Some(branch_id) = req.branch_id {
            model.branch_id = branch_id;
        }
        if let Some(grade_id) = req.grade_id {
            model.grade_id = grade_id;
        }
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        merge_opt(&mut model.kana_name, req.kana_name);
        merge_opt(&mut model.school_name, req.school_name);
        if req.email.is_some() {
            model.email = normalize_email(req.email);
        }
        if req.parent_email.is_some() {
            model.parent_email = normalize_email(req.parent_email);
        }
        merge_opt(&mut model.parent_phone, req.parent_phone);
        merge_opt(&mut model.line_id, req.line_id);
        if let Some(status) = req.status {
            model.status = status.to_string();
        }
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: students::Model) -> Student {
        model.into_student()
    }

    fn filter(select: Select<students::Entity>, filter: &StudentFilter) -> Select<students::Entity> {
        let mut select = select;
        if let Some(branch_id) = filter.branch_id {
            select = select.filter(students::Column::BranchId.eq(branch_id));
        }
        if let Some(grade_id) = filter.grade_id {
            select = select.filter(students::Column::GradeId.eq(grade_id));
        }
        if let Some(status) = filter.status {
            select = select.filter(students::Column::Status.eq(status.as_str()));
        }
        select
    }

    fn search_columns() -> Vec<students::Column> {
        vec![
            students::Column::Name,
            students::Column::KanaName,
            students::Column::SchoolName,
            students::Column::Email,
        ]
    }

    fn order(select: Select<students::Entity>) -> Select<students::Entity> {
        select
            .order_by_asc(students::Column::KanaName)
            .order_by_asc(students::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::ListParams;
    use crate::crud::resources::fixtures;
    use crate::crud::store::{self, RemoveOutcome};
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_default_status_and_filter() {
        let db = fixtures::db().await;
        let student = fixtures::student(&db, None, "田中", None).await;
        assert_eq!(student.status, "enrolled");

        let req = UpdateStudentRequest {
            status: Some(StudentStatus::Paused),
            ..Default::default()
        };
        store::update::<StudentResource, _>(&db, student.id, req)
            .await
            .unwrap();
        fixtures::student(&db, None, "鈴木", None).await;

        let params = ListParams {
            filter: StudentFilter {
                status: Some(StudentStatus::Enrolled),
                ..Default::default()
            },
            ..Default::default()
        };
        let page = store::list::<StudentResource>(&db, params).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "鈴木");
    }

    #[tokio::test]
    async fn test_remove_cascades_courses() {
        let db = fixtures::db().await;
        let student = fixtures::student(&db, None, "田中", None).await;
        let math = fixtures::subject(&db, "数学").await;
        fixtures::course(&db, student.id, math.id, None, "2024-04-01", None).await;

        let outcome = store::remove::<StudentResource>(&db, student.id).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(courses::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remove_restricted_by_sessions_keeps_courses() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        let teacher = fixtures::teacher(&db, Some(branch.id), "佐藤", None).await;
        let student = fixtures::student(&db, Some(branch.id), "田中", None).await;
        let math = fixtures::subject(&db, "数学").await;
        fixtures::course(&db, student.id, math.id, None, "2024-04-01", None).await;
        fixtures::session(
            &db,
            branch.id,
            teacher.id,
            Some(student.id),
            "2024-05-01",
            "16:00",
            "17:00",
        )
        .await;

        let outcome = store::remove::<StudentResource>(&db, student.id).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Restricted(vec!["class_sessions"]));
        assert_eq!(courses::Entity::find().count(&db).await.unwrap(), 1);
    }
}
