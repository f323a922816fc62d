//! CRUD 工厂的数据访问
//!
//! 处理函数和 CSV 导入共用这里的实现，写入路径对连接类型泛型，
//! 因此既可以直接使用连接，也可以放在事务里执行。

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, TransactionTrait,
};
use tracing::{debug, info};
use validator::ValidationError;

use super::{CrudResource, DeletePolicy, ListParams};
use crate::errors::{Result, TutorHubError};
use crate::models::{PaginatedResponse, PaginationInfo};
use crate::utils::search_condition;

/// 更新结果
#[derive(Debug)]
pub enum UpdateOutcome<M> {
    Updated(M),
    NotFound,
    /// 与已有数据合并后未通过跨字段校验
    Invalid(ValidationError),
}

/// 删除结果
#[derive(Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
    /// 被这些表引用，拒绝删除
    Restricted(Vec<&'static str>),
}

/// 分页列出资源
pub async fn list<R: CrudResource>(
    db: &DatabaseConnection,
    params: ListParams<R::Filter>,
) -> Result<PaginatedResponse<R::Output>> {
    let (page, size) = params.pagination.normalized();

    let mut select = R::filter(R::Entity::find(), &params.filter);

    if let Some(term) = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
    {
        let columns = R::search_columns();
        if !columns.is_empty() {
            select = select.filter(search_condition(&columns, term));
        }
    }

    let paginator = R::order(select).paginate(db, size);
    let total = paginator.num_items().await.map_err(|e| {
        TutorHubError::database_operation(format!("查询{}总数失败: {e}", R::TABLE))
    })?;
    let models = paginator.fetch_page(page - 1).await.map_err(|e| {
        TutorHubError::database_operation(format!("查询{}列表失败: {e}", R::TABLE))
    })?;

    Ok(PaginatedResponse {
        items: models.into_iter().map(R::to_output).collect(),
        pagination: PaginationInfo {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total.div_ceil(size) as i64,
        },
    })
}

/// 按主键查询
pub async fn find<R: CrudResource, C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<R::Model>> {
    R::Entity::find()
        .filter(R::id_column().eq(id))
        .one(db)
        .await
        .map_err(|e| TutorHubError::database_operation(format!("查询{}失败: {e}", R::TABLE)))
}

/// 插入新行（请求需已通过校验）
pub async fn create<R: CrudResource, C: ConnectionTrait>(
    db: &C,
    req: R::Create,
) -> Result<R::Model> {
    let now = chrono::Utc::now().timestamp();
    let model = R::new_model(req, now)
        .insert(db)
        .await
        .map_err(|e| TutorHubError::from_db(e, &format!("创建{}失败", R::TABLE)))?;

    debug!("Created {} row", R::TABLE);
    Ok(model)
}

/// 按主键更新
pub async fn update<R: CrudResource, C: ConnectionTrait>(
    db: &C,
    id: i64,
    req: R::Update,
) -> Result<UpdateOutcome<R::Model>> {
    match find::<R, C>(db, id).await? {
        Some(model) => update_model::<R, C>(db, model, req).await,
        None => Ok(UpdateOutcome::NotFound),
    }
}

/// 将更新请求合并到已读取的行并写回
pub async fn update_model<R: CrudResource, C: ConnectionTrait>(
    db: &C,
    mut model: R::Model,
    req: R::Update,
) -> Result<UpdateOutcome<R::Model>> {
    let now = chrono::Utc::now().timestamp();
    if let Err(err) = R::apply_update(&mut model, req, now) {
        return Ok(UpdateOutcome::Invalid(err));
    }
    if let Some(err) = R::verify_update(db, &model).await? {
        return Ok(UpdateOutcome::Invalid(err));
    }

    let updated = model
        .into_active_model()
        .reset_all()
        .update(db)
        .await
        .map_err(|e| TutorHubError::from_db(e, &format!("更新{}失败", R::TABLE)))?;

    Ok(UpdateOutcome::Updated(updated))
}

/// 在一个事务中删除：先检查 Restrict 引用，再清理 Cascade 引用，最后删除本行
pub async fn remove<R: CrudResource>(db: &DatabaseConnection, id: i64) -> Result<RemoveOutcome> {
    let context = format!("删除{}失败", R::TABLE);
    let txn = db
        .begin()
        .await
        .map_err(|e| TutorHubError::from_db(e, &context))?;

    if find::<R, _>(&txn, id).await?.is_none() {
        return Ok(RemoveOutcome::NotFound);
    }

    let dependents = R::dependents();

    let mut blocking: Vec<&'static str> = Vec::new();
    for dependent in dependents
        .iter()
        .filter(|d| d.policy == DeletePolicy::Restrict)
    {
        let count = dependent
            .count(&txn, id)
            .await
            .map_err(|e| TutorHubError::from_db(e, &context))?;
        if count > 0 && !blocking.contains(&dependent.model) {
            blocking.push(dependent.model);
        }
    }
    if !blocking.is_empty() {
        txn.rollback()
            .await
            .map_err(|e| TutorHubError::from_db(e, &context))?;
        return Ok(RemoveOutcome::Restricted(blocking));
    }

    for dependent in dependents
        .iter()
        .filter(|d| d.policy == DeletePolicy::Cascade)
    {
        let purged = dependent
            .purge(&txn, id)
            .await
            .map_err(|e| TutorHubError::from_db(e, &context))?;
        if purged > 0 {
            debug!(
                "Cascade removed {} {} row(s) via {}",
                purged, dependent.model, dependent.field
            );
        }
    }

    R::Entity::delete_many()
        .filter(R::id_column().eq(id))
        .exec(&txn)
        .await
        .map_err(|e| TutorHubError::from_db(e, &context))?;

    txn.commit()
        .await
        .map_err(|e| TutorHubError::from_db(e, &context))?;

    info!("Deleted {} {}={}", R::TABLE, R::PRIMARY_KEY, id);
    Ok(RemoveOutcome::Removed)
}
