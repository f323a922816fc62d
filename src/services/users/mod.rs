//! 账号管理（仅管理员）
//!
//! 账号可以挂靠某个校区，职员看板据此限定范围；讲师和学生档案通过 `user_id` 反向关联。

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::models::{ApiResponse, FieldError};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_users(
        &self,
        query: UserListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}

/// 挂靠的校区必须存在；不存在时返回 400 响应
async fn check_branch(
    storage: &dyn Storage,
    branch_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(id) = branch_id else {
        return Ok(());
    };
    match storage.get_branch_by_id(id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::BadRequest().json(ApiResponse::validation_failed(vec![
            FieldError::new("branch_id", format!("Branch {id} does not exist")),
        ]))),
        Err(e) => Err(e.to_response()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::users::entities::{User, UserRole, UserStatus};
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::HttpMessage;
    use actix_web::test::TestRequest;
    use actix_web::web;

    /// 以指定账号身份发起的请求
    pub(crate) fn request_as(storage: Arc<dyn Storage>, user_id: i64) -> HttpRequest {
        let req = TestRequest::default()
            .app_data(web::Data::new(storage))
            .to_http_request();
        let now = chrono::Utc::now();
        req.extensions_mut().insert(User {
            id: user_id,
            username: "admin".into(),
            email: "admin@localhost".into(),
            password_hash: String::new(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            display_name: None,
            branch_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        });
        req
    }

    pub(crate) async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    pub(crate) async fn memory_storage() -> Arc<dyn Storage> {
        Arc::new(SeaOrmStorage::new_in_memory().await.unwrap())
    }

    #[actix_web::test]
    async fn test_check_branch_rejects_unknown_branch() {
        let storage = memory_storage().await;
        assert!(check_branch(storage.as_ref(), None).await.is_ok());

        let resp = check_branch(storage.as_ref(), Some(42)).await.unwrap_err();
        assert_eq!(resp.status(), 400);
        let json = body_json(resp).await;
        assert_eq!(json["details"][0]["field"], "branch_id");
    }
}
