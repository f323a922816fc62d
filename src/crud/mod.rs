//! 通用 CRUD 工厂
//!
//! 每个资源实现一次 [`CrudResource`]，即可通过 [`configure_crud`] 得到
//! 列表、详情、创建、更新、删除五个接口。删除时按 [`Dependent`] 声明的
//! 策略处理引用该行的数据：`Restrict` 拒绝删除，`Cascade` 先删除引用行。

pub mod handlers;
pub mod resources;
pub mod store;

pub use handlers::{configure_crud, configure_crud_with};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction,
    DbErr, EntityTrait,
    FromQueryResult, IdenStatic, IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::models::PaginationQuery;
use crate::models::users::entities::UserRole;

/// 删除策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// 存在引用行时拒绝删除
    Restrict,
    /// 先删除引用行
    Cascade,
}

/// 引用当前资源的 (表, 外键列) 及其删除策略
pub struct Dependent {
    pub model: &'static str,
    pub field: &'static str,
    pub policy: DeletePolicy,
    rows: Box<dyn DependentRows>,
}

impl Dependent {
    pub fn restrict<E: EntityTrait + 'static>(column: E::Column) -> Self
    where
        E::Model: Sync,
    {
        Self::new::<E>(column, DeletePolicy::Restrict)
    }

    pub fn cascade<E: EntityTrait + 'static>(column: E::Column) -> Self
    where
        E::Model: Sync,
    {
        Self::new::<E>(column, DeletePolicy::Cascade)
    }

    fn new<E: EntityTrait + 'static>(column: E::Column, policy: DeletePolicy) -> Self
    where
        E::Model: Sync,
    {
        Self {
            model: IdenStatic::as_str(&E::default()),
            field: IdenStatic::as_str(&column),
            policy,
            rows: Box::new(ColumnRows::<E> { column }),
        }
    }

    /// 统计引用 `id` 的行数
    pub async fn count(&self, txn: &DatabaseTransaction, id: i64) -> Result<u64, DbErr> {
        self.rows.count(txn, id).await
    }

    /// 删除引用 `id` 的行，返回删除行数
    pub async fn purge(&self, txn: &DatabaseTransaction, id: i64) -> Result<u64, DbErr> {
        self.rows.purge(txn, id).await
    }
}

impl std::fmt::Debug for Dependent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependent")
            .field("model", &self.model)
            .field("field", &self.field)
            .field("policy", &self.policy)
            .finish()
    }
}

#[async_trait]
trait DependentRows: Send + Sync {
    async fn count(&self, txn: &DatabaseTransaction, id: i64) -> Result<u64, DbErr>;
    async fn purge(&self, txn: &DatabaseTransaction, id: i64) -> Result<u64, DbErr>;
}

struct ColumnRows<E: EntityTrait> {
    column: E::Column,
}

#[async_trait]
impl<E: EntityTrait + 'static> DependentRows for ColumnRows<E>
where
    E::Model: Sync,
{
    async fn count(&self, txn: &DatabaseTransaction, id: i64) -> Result<u64, DbErr> {
        E::find().filter(self.column.eq(id)).count(txn).await
    }

    async fn purge(&self, txn: &DatabaseTransaction, id: i64) -> Result<u64, DbErr> {
        let result = E::delete_many()
            .filter(self.column.eq(id))
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}

/// 列表查询参数：分页 + 搜索 + 资源自定义筛选
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams<F> {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(flatten)]
    pub filter: F,
}

impl<F: Default> Default for ListParams<F> {
    fn default() -> Self {
        Self {
            pagination: PaginationQuery::default(),
            search: None,
            filter: F::default(),
        }
    }
}

type ColumnOf<R> = <<R as CrudResource>::Entity as EntityTrait>::Column;

/// 可由 CRUD 工厂管理的资源
#[async_trait]
pub trait CrudResource: Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model, ActiveModel = Self::ActiveModel> + 'static;
    type Model: ModelTrait<Entity = Self::Entity>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModel>
        + Clone
        + Send
        + Sync
        + 'static;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + Send
        + Sync
        + 'static;
    type Create: Validate + DeserializeOwned + Send + 'static;
    type Update: Validate + DeserializeOwned + Send + 'static;
    type Filter: Default + DeserializeOwned + Send + 'static;
    type Output: Serialize + TS + Send + 'static;

    /// 数据表名
    const TABLE: &'static str;
    /// 主键列名
    const PRIMARY_KEY: &'static str = "id";
    /// 路由前缀，如 `/api/v1/branches`
    const PATH: &'static str;
    /// 响应消息中的资源名
    const LABEL: &'static str;

    fn read_roles() -> &'static [&'static UserRole] {
        UserRole::staff_roles()
    }

    fn write_roles() -> &'static [&'static UserRole] {
        UserRole::staff_roles()
    }

    fn id_column() -> ColumnOf<Self>;

    fn dependents() -> Vec<Dependent> {
        Vec::new()
    }

    /// 由创建请求构造待插入的行
    fn new_model(req: Self::Create, now: i64) -> Self::ActiveModel;

    /// 将更新请求合并到已有行；合并后的跨字段校验失败时返回字段错误
    fn apply_update(
        model: &mut Self::Model,
        req: Self::Update,
        now: i64,
    ) -> Result<(), ValidationError>;

    /// 合并后写回前需要查库的校验，返回 Some 时拒绝本次更新
    async fn verify_update<C: ConnectionTrait>(
        _db: &C,
        _model: &Self::Model,
    ) -> crate::errors::Result<Option<ValidationError>> {
        Ok(None)
    }

    fn to_output(model: Self::Model) -> Self::Output;

    fn filter(select: Select<Self::Entity>, _filter: &Self::Filter) -> Select<Self::Entity> {
        select
    }

    fn search_columns() -> Vec<ColumnOf<Self>> {
        Vec::new()
    }

    fn order(select: Select<Self::Entity>) -> Select<Self::Entity> {
        select.order_by_asc(Self::id_column())
    }
}

/// 可选字符串字段：请求中出现即覆盖，空白串清空
pub(crate) fn merge_opt(target: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *target = crate::models::normalize_opt(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{booths, teachers};
    use actix_web::web::Query;

    #[test]
    fn test_dependent_names_come_from_schema() {
        let dep = Dependent::restrict::<teachers::Entity>(teachers::Column::BranchId);
        assert_eq!(dep.model, "teachers");
        assert_eq!(dep.field, "branch_id");
        assert_eq!(dep.policy, DeletePolicy::Restrict);

        let dep = Dependent::cascade::<booths::Entity>(booths::Column::BranchId);
        assert_eq!(dep.model, "booths");
        assert_eq!(dep.policy, DeletePolicy::Cascade);
    }

    #[test]
    fn test_list_params_from_query_string() {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct Filter {
            #[serde(deserialize_with = "crate::models::common::query::deserialize_opt_i64")]
            branch_id: Option<i64>,
        }

        let params =
            Query::<ListParams<Filter>>::from_query("page=2&size=5&search=%E6%B8%8B&branch_id=3")
                .unwrap()
                .into_inner();
        assert_eq!(params.pagination.normalized(), (2, 5));
        assert_eq!(params.search.as_deref(), Some("渋"));
        assert_eq!(params.filter.branch_id, Some(3));

        let params = Query::<ListParams<Filter>>::from_query("")
            .unwrap()
            .into_inner();
        assert_eq!(params.pagination.normalized(), (1, 20));
        assert_eq!(params.filter.branch_id, None);
    }

    #[test]
    fn test_merge_opt() {
        let mut value = Some("old".to_string());
        merge_opt(&mut value, None);
        assert_eq!(value.as_deref(), Some("old"));
        merge_opt(&mut value, Some(" new ".into()));
        assert_eq!(value.as_deref(), Some("new"));
        merge_opt(&mut value, Some("  ".into()));
        assert_eq!(value, None);
    }
}
