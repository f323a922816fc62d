use sea_orm::{ActiveValue::Set, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{class_sessions, evaluations};
use crate::models::evaluations::entities::Evaluation;
use crate::models::evaluations::requests::{
    CreateEvaluationRequest, EvaluationFilter, UpdateEvaluationRequest,
};
use crate::models::normalize_opt;
use crate::models::users::entities::UserRole;

pub struct EvaluationResource;

impl CrudResource for EvaluationResource {
    type Entity = evaluations::Entity;
    type Model = evaluations::Model;
    type ActiveModel = evaluations::ActiveModel;
    type Create = CreateEvaluationRequest;
    type Update = UpdateEvaluationRequest;
    type Filter = EvaluationFilter;
    type Output = Evaluation;

    const TABLE: &'static str = "evaluations";
    const PATH: &'static str = "/api/v1/evaluations";
    const LABEL: &'static str = "Evaluation";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::teacher_roles()
    }

    fn id_column() -> evaluations::Column {
        evaluations::Column::Id
    }

    fn dependents() -> Vec<Dependent> {
        vec![Dependent::restrict::<class_sessions::Entity>(
            class_sessions::Column::EvaluationId,
        )]
    }

    fn new_model(req: CreateEvaluationRequest, now: i64) -> evaluations::ActiveModel {
        evaluations::ActiveModel {
            name: Set(req.name.trim().to_string()),
            score: Set(req.score),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut evaluations::Model,
        req: UpdateEvaluationRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        if let Some(score) = req.score {
            model.score = score;
        }
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: evaluations::Model) -> Evaluation {
        model.into_evaluation()
    }

    fn search_columns() -> Vec<evaluations::Column> {
        vec![evaluations::Column::Name]
    }

    // 高分在前
    fn order(select: Select<evaluations::Entity>) -> Select<evaluations::Entity> {
        select
            .order_by_desc(evaluations::Column::Score)
            .order_by_asc(evaluations::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::ListParams;
    use crate::crud::resources::fixtures;
    use crate::crud::store;

    #[tokio::test]
    async fn test_ordered_by_score() {
        let db = fixtures::db().await;
        for (name, score) in [("普通", 60), ("優秀", 90), ("要努力", 30)] {
            let req = CreateEvaluationRequest {
                name: name.into(),
                score,
                notes: None,
            };
            store::create::<EvaluationResource, _>(&db, req).await.unwrap();
        }

        let page = store::list::<EvaluationResource>(&db, ListParams::default())
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["優秀", "普通", "要努力"]);
    }
}
