use sea_orm::{ActiveValue::Set, ColumnTrait, QueryFilter, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{booths, class_sessions};
use crate::models::booths::entities::Booth;
use crate::models::booths::requests::{BoothFilter, CreateBoothRequest, UpdateBoothRequest};
use crate::models::normalize_opt;
use crate::models::users::entities::UserRole;

pub struct BoothResource;

impl CrudResource for BoothResource {
    type Entity = booths::Entity;
    type Model = booths::Model;
    type ActiveModel = booths::ActiveModel;
    type Create = CreateBoothRequest;
    type Update = UpdateBoothRequest;
    type Filter = BoothFilter;
    type Output = Booth;

    const TABLE: &'static str = "booths";
    const PATH: &'static str = "/api/v1/booths";
    const LABEL: &'static str = "Booth";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::teacher_roles()
    }

    fn id_column() -> booths::Column {
        booths::Column::Id
    }

    fn dependents() -> Vec<Dependent> {
        vec![Dependent::restrict::<class_sessions::Entity>(
            class_sessions::Column::BoothId,
        )]
    }

    fn new_model(req: CreateBoothRequest, now: i64) -> booths::ActiveModel {
        booths::ActiveModel {
            branch_id: Set(req.branch_id),
            name: Set(req.name.trim().to_string()),
            is_active: Set(req.is_active.unwrap_or(true)),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut booths::Model,
        req: UpdateBoothRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(branch_id) = req.branch_id {
            model.branch_id = branch_id;
        }
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        if let Some(is_active) = req.is_active {
            model.is_active = is_active;
        }
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: booths::Model) -> Booth {
        model.into_booth()
    }

    fn filter(select: Select<booths::Entity>, filter: &BoothFilter) -> Select<booths::Entity> {
        let mut select = select;
        if let Some(branch_id) = filter.branch_id {
            select = select.filter(booths::Column::BranchId.eq(branch_id));
        }
        if let Some(is_active) = filter.is_active {
            select = select.filter(booths::Column::IsActive.eq(is_active));
        }
        select
    }

    fn search_columns() -> Vec<booths::Column> {
        vec![booths::Column::Name]
    }

    fn order(select: Select<booths::Entity>) -> Select<booths::Entity> {
        select
            .order_by_asc(booths::Column::BranchId)
            .order_by_asc(booths::Column::Name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::ListParams;
    use crate::crud::resources::fixtures;
    use crate::crud::store::{self, UpdateOutcome};
    use crate::errors::TutorHubError;

    #[tokio::test]
    async fn test_name_unique_per_branch() {
        let db = fixtures::db().await;
        let shibuya = fixtures::branch(&db, "渋谷校").await;
        let shinjuku = fixtures::branch(&db, "新宿校").await;
        fixtures::booth(&db, shibuya.id, "A-1").await;
        fixtures::booth(&db, shinjuku.id, "A-1").await;

        let req = CreateBoothRequest {
            branch_id: shibuya.id,
            name: "A-1".into(),
            is_active: None,
            notes: None,
        };
        let err = store::create::<BoothResource, _>(&db, req).await.unwrap_err();
        assert!(matches!(err, TutorHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_branch_is_validation_error() {
        let db = fixtures::db().await;
        let req = CreateBoothRequest {
            branch_id: 42,
            name: "A-1".into(),
            is_active: None,
            notes: None,
        };
        let err = store::create::<BoothResource, _>(&db, req).await.unwrap_err();
        assert!(matches!(err, TutorHubError::Validation(_)));
    }

    #[tokio::test]
    async fn test_filter_inactive_booths() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        let booth = fixtures::booth(&db, branch.id, "A-1").await;
        fixtures::booth(&db, branch.id, "A-2").await;
        assert!(booth.is_active);

        let req = UpdateBoothRequest {
            is_active: Some(false),
            ..Default::default()
        };
        let outcome = store::update::<BoothResource, _>(&db, booth.id, req)
            .await
            .unwrap();
        assert!(matches!(outcome, UpdateOutcome::Updated(ref m) if !m.is_active));

        let params = ListParams {
            filter: BoothFilter {
                branch_id: Some(branch.id),
                is_active: Some(true),
            },
            ..Default::default()
        };
        let page = store::list::<BoothResource>(&db, params).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "A-2");
    }
}
