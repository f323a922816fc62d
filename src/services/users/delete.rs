use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

/// 删除账号后，关联的讲师或学生档案保留，只是解除关联
pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::CannotDeleteSelf,
            "Cannot delete the account you are logged in with",
        )));
    }

    match service.get_storage(request).delete_user(user_id).await {
        Ok(true) => {
            info!("User {} deleted", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(e.to_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::users::tests::{body_json, memory_storage, request_as};

    #[actix_web::test]
    async fn test_cannot_delete_self() {
        let req = request_as(memory_storage().await, 3);
        let resp = UserService::new_lazy().delete_user(3, &req).await.unwrap();
        assert_eq!(resp.status(), 409);
        let json = body_json(resp).await;
        assert_eq!(json["code"], ErrorCode::CannotDeleteSelf as i32);
    }

    #[actix_web::test]
    async fn test_delete_missing_user_is_404() {
        let req = request_as(memory_storage().await, 1);
        let resp = UserService::new_lazy().delete_user(8, &req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }
}
