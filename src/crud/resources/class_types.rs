use std::collections::HashSet;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select,
};
use validator::ValidationError;

use crate::crud::{CrudResource, Dependent, merge_opt};
use crate::entity::{class_sessions, class_types, courses};
use crate::errors::{Result, TutorHubError};
use crate::models::class_types::entities::ClassType;
use crate::models::class_types::requests::{
    ClassTypeFilter, CreateClassTypeRequest, UpdateClassTypeRequest,
};
use crate::models::normalize_opt;
use crate::models::users::entities::UserRole;
use crate::utils::validate::invalid;

pub struct ClassTypeResource;

#[async_trait]
impl CrudResource for ClassTypeResource {
    type Entity = class_types::Entity;
    type Model = class_types::Model;
    type ActiveModel = class_types::ActiveModel;
    type Create = CreateClassTypeRequest;
    type Update = UpdateClassTypeRequest;
    type Filter = ClassTypeFilter;
    type Output = ClassType;

    const TABLE: &'static str = "class_types";
    const PATH: &'static str = "/api/v1/class-types";
    const LABEL: &'static str = "Class type";

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::all_roles()
    }

    fn id_column() -> class_types::Column {
        class_types::Column::Id
    }

    // 有子分类时不能删除父分类
    fn dependents() -> Vec<Dependent> {
        vec![
            Dependent::restrict::<courses::Entity>(courses::Column::ClassTypeId),
            Dependent::restrict::<class_sessions::Entity>(class_sessions::Column::ClassTypeId),
            Dependent::restrict::<class_types::Entity>(class_types::Column::ParentId),
        ]
    }

    fn new_model(req: CreateClassTypeRequest, now: i64) -> class_types::ActiveModel {
        class_types::ActiveModel {
            name: Set(req.name.trim().to_string()),
            parent_id: Set(req.parent_id),
            color: Set(normalize_opt(req.color)),
            notes: Set(normalize_opt(req.notes)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    fn apply_update(
        model: &mut class_types::Model,
        req: UpdateClassTypeRequest,
        now: i64,
    ) -> std::result::Result<(), ValidationError> {
        if let Some(name) = req.name {
            model.name = name.trim().to_string();
        }
        if let Some(parent_id) = req.parent_id {
            model.parent_id = parent_id;
        }
        merge_opt(&mut model.color, req.color);
        merge_opt(&mut model.notes, req.notes);
        model.updated_at = now;
        Ok(())
    }

    // 沿父链向上查找，回到自身即成环
    async fn verify_update<C: ConnectionTrait>(
        db: &C,
        model: &class_types::Model,
    ) -> Result<Option<ValidationError>> {
        let mut seen = HashSet::from([model.id]);
        let mut next = model.parent_id;
        while let Some(id) = next {
            if !seen.insert(id) {
                return Ok(Some(invalid(
                    "parent_id",
                    "A class type cannot be its own ancestor",
                )));
            }
            next = class_types::Entity::find_by_id(id)
                .one(db)
                .await
                .map_err(|e| {
                    TutorHubError::database_operation(format!("查询上级授业类型失败: {e}"))
                })?
                .and_then(|parent| parent.parent_id);
        }
        Ok(None)
    }

    fn to_output(model: class_types::Model) -> ClassType {
        model.into_class_type()
    }

    fn filter(
        select: Select<class_types::Entity>,
        filter: &ClassTypeFilter,
    ) -> Select<class_types::Entity> {
        let mut select = select;
        if let Some(parent_id) = filter.parent_id {
            select = select.filter(class_types::Column::ParentId.eq(parent_id));
        }
        if filter.root_only == Some(true) {
            select = select.filter(class_types::Column::ParentId.is_null());
        }
        select
    }

    fn search_columns() -> Vec<class_types::Column> {
        vec![class_types::Column::Name]
    }

    fn order(select: Select<class_types::Entity>) -> Select<class_types::Entity> {
        select
            .order_by_asc(class_types::Column::Name)
            .order_by_asc(class_types::Column::Id)
    }
}
