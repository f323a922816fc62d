use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;
use validator::Validate;

use super::{UserService, check_branch};
use crate::models::{
    ApiResponse,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::utils::password::hash_password;
use crate::utils::validate::field_errors;

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(errors) = user_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(field_errors(&errors))));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = check_branch(storage.as_ref(), user_data.branch_id).await {
        return Ok(resp);
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(e.to_response()),
    };

    // 用户名或邮箱重复由唯一约束转成 409
    match storage.create_user(user_data).await {
        Ok(user) => {
            info!(
                "User {} created (role {}, branch {:?})",
                user.username, user.role, user.branch_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "User created successfully",
            )))
        }
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::users::tests::{body_json, memory_storage, request_as};

    fn staff(username: &str, branch_id: Option<i64>) -> CreateUserRequest {
        CreateUserRequest {
            username: username.into(),
            email: format!("{username}@example.com"),
            password: "lesson2024".into(),
            role: UserRole::Staff,
            display_name: None,
            branch_id,
        }
    }

    #[actix_web::test]
    async fn test_create_hashes_password_and_rejects_duplicates() {
        let storage = memory_storage().await;
        let req = request_as(storage.clone(), 1);
        let service = UserService::new_lazy();

        let resp = service.create_user(staff("kato", None), &req).await.unwrap();
        assert_eq!(resp.status(), 201);
        let json = body_json(resp).await;
        assert_eq!(json["data"]["user"]["username"], "kato");
        assert!(json["data"]["user"].get("password_hash").is_none());

        let stored = storage.get_user_by_username("kato").await.unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2"));

        let resp = service.create_user(staff("kato", None), &req).await.unwrap();
        assert_eq!(resp.status(), 409);
    }

    #[actix_web::test]
    async fn test_create_with_unknown_branch_is_rejected() {
        let storage = memory_storage().await;
        let req = request_as(storage.clone(), 1);

        let resp = UserService::new_lazy()
            .create_user(staff("mori", Some(99)), &req)
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        assert_eq!(storage.count_users().await.unwrap(), 0);
    }
}
