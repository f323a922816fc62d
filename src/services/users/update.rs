use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use validator::Validate;

use super::{UserService, check_branch};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::utils::password::hash_password;
use crate::utils::validate::field_errors;

/// 管理员不能把自己降级或停用，否则会失去管理入口
fn locks_out_self(update: &UpdateUserRequest) -> bool {
    update.role.is_some_and(|role| role != UserRole::Admin)
        || update.status.is_some_and(|status| status != UserStatus::Active)
}

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(errors) = update_data.validate() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::validation_failed(field_errors(&errors))));
    }

    if RequireJWT::extract_user_id(request) == Some(user_id) && locks_out_self(&update_data) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Cannot change the role or status of your own account",
        )));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = check_branch(storage.as_ref(), update_data.branch_id).await {
        return Ok(resp);
    }

    if let Some(password) = update_data.password.take() {
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(e.to_response()),
        }
    }

    // 已缓存的登录信息在缓存过期后才会反映新的角色与状态
    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "User updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::users::tests::{memory_storage, request_as};

    #[test]
    fn test_locks_out_self() {
        assert!(!locks_out_self(&UpdateUserRequest::default()));
        assert!(!locks_out_self(&UpdateUserRequest {
            role: Some(UserRole::Admin),
            ..Default::default()
        }));
        assert!(locks_out_self(&UpdateUserRequest {
            role: Some(UserRole::Staff),
            ..Default::default()
        }));
        assert!(locks_out_self(&UpdateUserRequest {
            status: Some(UserStatus::Suspended),
            ..Default::default()
        }));
    }

    #[actix_web::test]
    async fn test_update_self_role_conflicts_and_missing_user_is_404() {
        let storage = memory_storage().await;
        let req = request_as(storage, 1);
        let service = UserService::new_lazy();

        let demote = UpdateUserRequest {
            role: Some(UserRole::Teacher),
            ..Default::default()
        };
        let resp = service.update_user(1, demote, &req).await.unwrap();
        assert_eq!(resp.status(), 409);

        let rename = UpdateUserRequest {
            display_name: Some("Someone".into()),
            ..Default::default()
        };
        let resp = service.update_user(77, rename, &req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }
}
