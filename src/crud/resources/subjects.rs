use sea_orm::{ActiveValue::Set, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{class_sessions, courses, subjects};
use crate::models::normalize_opt;
use crate::models::subjects::entities::Subject;
use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectFilter, UpdateSubjectRequest,
};
use crate::models::users::entities::UserRole;

pub struct SubjectResource;

impl CrudResource for SubjectResource {
    type Entity = subjects::Entity;
    type Model = subjects::Model;
    type ActiveModel = subjects::ActiveModel;
    type Create = CreateSubjectRequest;
    type Update = UpdateSubjectRequest;
    type Filter = SubjectFilter;
    type Output = Subject;

    const TABLE: &'static str = "subjects";
    const PATH: &'static str = "/api/v1/subjects";
    const LABEL: &'static str = "Subject";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::all_roles()
    }

    fn id_column() -> subjects::Column {
        subjects::Column::Id
    }

    fn dependents() -> Vec<Dependent> {
        vec![
            Dependent::restrict::<courses::Entity>(courses::Column::SubjectId),
            Dependent::restrict::<class_sessions::Entity>(class_sessions::Column::SubjectId),
        ]
    }

    fn new_model(req: CreateSubjectRequest, now: i64) -> subjects::ActiveModel {
        subjects::ActiveModel {
            name: Set(req.name.trim().to_string()),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut subjects::Model,
        req: UpdateSubjectRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: subjects::Model) -> Subject {
        model.into_subject()
    }

    fn search_columns() -> Vec<subjects::Column> {
        vec![subjects::Column::Name]
    }

    fn order(select: Select<subjects::Entity>) -> Select<subjects::Entity> {
        select.order_by_asc(subjects::Column::Name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::resources::fixtures;
    use crate::crud::store::{self, RemoveOutcome};

    #[tokio::test]
    async fn test_remove_restricted_by_courses_and_sessions() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        let teacher = fixtures::teacher(&db, Some(branch.id), "佐藤", None).await;
        let student = fixtures::student(&db, Some(branch.id), "田中", None).await;
        let math = fixtures::subject(&db, "数学").await;
        fixtures::course(&db, student.id, math.id, Some(teacher.id), "2024-04-01", None).await;

        let outcome = store::remove::<SubjectResource>(&db, math.id).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Restricted(vec!["courses"]));

        let english = fixtures::subject(&db, "英語").await;
        let outcome = store::remove::<SubjectResource>(&db, english.id)
            .await
            .unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed);
    }
}
