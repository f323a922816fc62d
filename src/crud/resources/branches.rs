use sea_orm::{ActiveValue::Set, QueryOrder, Select};
use validator::ValidationError;

use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{booths, branches, class_sessions, line_channels, students, teachers, time_slots};
use crate::models::branches::entities::Branch;
use crate::models::branches::requests::{BranchFilter, CreateBranchRequest, UpdateBranchRequest};
use crate::models::normalize_opt;
use crate::models::users::entities::UserRole;

pub struct BranchResource;

impl CrudResource for BranchResource {
    type Entity = branches::Entity;
    type Model = branches::Model;
    type ActiveModel = branches::ActiveModel;
    type Create = CreateBranchRequest;
    type Update = UpdateBranchRequest;
    type Filter = BranchFilter;
    type Output = Branch;

    const TABLE: &'static str = "branches";
    const PATH: &'static str = "/api/v1/branches";
    const LABEL: &'static str = "Branch";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::all_roles()
    }

    fn id_column() -> branches::Column {
        branches::Column::Id
    }

    // 校区下的教室与时间段随校区一起删除，其余引用必须先处理
    fn dependents() -> Vec<Dependent> {
        vec![
            Dependent::restrict::<teachers::Entity>(teachers::Column::BranchId),
            Dependent::restrict::<students::Entity>(students::Column::BranchId),
            Dependent::restrict::<class_sessions::Entity>(class_sessions::Column::BranchId),
            Dependent::restrict::<line_channels::Entity>(line_channels::Column::BranchId),
            Dependent::cascade::<booths::Entity>(booths::Column::BranchId),
            Dependent::cascade::<time_slots::Entity>(time_slots::Column::BranchId),
        ]
    }

    fn new_model(req: CreateBranchRequest, now: i64) -> branches::ActiveModel {
        branches::ActiveModel {
            name: Set(req.name.trim().to_string()),
            address: Set(normalize_opt(req.address)),
            phone: Set(normalize_opt(req.phone)),
            notes: Set(normalize_opt(req.notes)),
            display_order: Set(req.display_order.unwrap_or(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut branches::Model,
        req: UpdateBranchRequest,
        now: i64,
    ) -> Result<(), ValidationError> {
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        merge_opt(&mut model.address, req.address);
        merge_opt(&mut model.phone, req.phone);
        merge_opt(&mut model.notes, req.notes);
        if let Some(order) = req.display_order {
            model.display_order = order;
        }
        model.updated_at = now;
        Ok(())
    }

    fn to_output(model: branches::Model) -> Branch {
        model.into_branch()
    }

    fn search_columns() -> Vec<branches::Column> {
        vec![branches::Column::Name, branches::Column::Address]
    }

    fn order(select: Select<branches::Entity>) -> Select<branches::Entity> {
        select
            .order_by_asc(branches::Column::DisplayOrder)
            .order_by_asc(branches::Column::Id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::ListParams;
    use crate::crud::resources::fixtures;
    use crate::crud::store::{self, RemoveOutcome, UpdateOutcome};
    use crate::errors::TutorHubError;
    use crate::models::branches::requests::CreateBranchRequest;
    use sea_orm::{EntityTrait, PaginatorTrait};

    #[tokio::test]
    async fn test_create_and_search_branches() {
        let db = fixtures::db().await;
        fixtures::branch(&db, "渋谷校").await;
        fixtures::branch(&db, "新宿校").await;
        fixtures::branch(&db, "100%校").await;

        let params = ListParams {
            search: Some("渋谷".into()),
            ..Default::default()
        };
        let page = store::list::<BranchResource>(&db, params).await.unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].name, "渋谷校");

        // LIKE 通配符按字面匹配
        let params = ListParams {
            search: Some("%".into()),
            ..Default::default()
        };
        let page = store::list::<BranchResource>(&db, params).await.unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].name, "100%校");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let db = fixtures::db().await;
        fixtures::branch(&db, "渋谷校").await;

        let req = CreateBranchRequest {
            name: "渋谷校".into(),
            address: None,
            phone: None,
            notes: None,
            display_order: None,
        };
        let err = store::create::<BranchResource, _>(&db, req)
            .await
            .unwrap_err();
        assert!(matches!(err, TutorHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_applies_present_fields_only() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;

        let req = UpdateBranchRequest {
            address: Some("東京都渋谷区".into()),
            display_order: Some(3),
            ..Default::default()
        };
        let updated = match store::update::<BranchResource, _>(&db, branch.id, req)
            .await
            .unwrap()
        {
            UpdateOutcome::Updated(model) => model,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(updated.name, "渋谷校");
        assert_eq!(updated.address.as_deref(), Some("東京都渋谷区"));
        assert_eq!(updated.display_order, 3);

        let missing = store::update::<BranchResource, _>(&db, 999, Default::default())
            .await
            .unwrap();
        assert!(matches!(missing, UpdateOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_remove_is_restricted_by_teachers() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        fixtures::teacher(&db, Some(branch.id), "佐藤", None).await;

        let outcome = store::remove::<BranchResource>(&db, branch.id).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Restricted(vec!["teachers"]));
        assert!(store::find::<BranchResource, _>(&db, branch.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_remove_cascades_booths() {
        let db = fixtures::db().await;
        let branch = fixtures::branch(&db, "渋谷校").await;
        fixtures::booth(&db, branch.id, "A-1").await;
        fixtures::booth(&db, branch.id, "A-2").await;

        let outcome = store::remove::<BranchResource>(&db, branch.id).await.unwrap();
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(booths::Entity::find().count(&db).await.unwrap(), 0);

        let again = store::remove::<BranchResource>(&db, branch.id).await.unwrap();
        assert_eq!(again, RemoveOutcome::NotFound);
    }
}
