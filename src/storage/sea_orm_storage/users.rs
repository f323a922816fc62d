use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, TutorHubError};
use crate::models::{
    PaginationInfo, normalize_opt,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::search_condition;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username.trim().to_string()),
            email: Set(req.email.trim().to_lowercase()),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(normalize_opt(req.display_name)),
            branch_id: Set(req.branch_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TutorHubError::from_db(e, "创建用户失败"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier.to_lowercase())),
            )
            .one(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(search_condition(
                &[Column::Username, Column::Email, Column::DisplayName],
                search.trim(),
            ));
        }

        // 角色筛选
        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        // 校区筛选
        if let Some(branch_id) = query.branch_id {
            select = select.filter(Column::BranchId.eq(branch_id));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                TutorHubError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息（密码需已哈希）
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email.trim().to_lowercase());
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if update.display_name.is_some() {
            model.display_name = Set(normalize_opt(update.display_name));
        }

        if let Some(branch_id) = update.branch_id {
            model.branch_id = Set(Some(branch_id));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| TutorHubError::from_db(e, "更新用户失败"))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| TutorHubError::from_db(e, "删除用户失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn new_user(username: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.into(),
            email: email.into(),
            password: "hashed".into(),
            role: UserRole::Staff,
            display_name: Some("  ".into()),
            branch_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage
            .create_user_impl(new_user("suzuki", "Suzuki@Example.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "suzuki@example.com");
        assert_eq!(user.display_name, None);
        assert_eq!(user.status, UserStatus::Active);

        let found = storage
            .get_user_by_username_or_email_impl("SUZUKI@example.com")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_user_impl(new_user("kato", "kato@example.com"))
            .await
            .unwrap();
        let err = storage
            .create_user_impl(new_user("kato", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E010");
    }

    #[tokio::test]
    async fn test_list_filters_and_update() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = storage
            .create_user_impl(new_user("ito", "ito@example.com"))
            .await
            .unwrap();
        storage
            .create_user_impl(new_user("mori", "mori@example.com"))
            .await
            .unwrap();

        let updated = storage
            .update_user_impl(
                a.id,
                UpdateUserRequest {
                    role: Some(UserRole::Teacher),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Teacher);

        let page = storage
            .list_users_with_pagination_impl(UserListQuery {
                role: Some(UserRole::Teacher),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].username, "ito");

        let page = storage
            .list_users_with_pagination_impl(UserListQuery {
                search: Some("mor".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);

        assert!(storage.update_user_impl(999, UpdateUserRequest::default()).await.unwrap().is_none());
        assert!(storage.delete_user_impl(a.id).await.unwrap());
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }
}
