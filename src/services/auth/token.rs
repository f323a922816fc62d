use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::users::entities::{UserRole, UserStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt;

use super::AuthService;

fn login_expired() -> HttpResponse {
    // 清除无效的 refresh token cookie
    let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();
    HttpResponse::Unauthorized()
        .cookie(empty_cookie)
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

/// 用 cookie 中的 refresh token 换取新的 access token
///
/// 角色以数据库中的当前值为准，停用的账号无法续期。
pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match jwt::JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(login_expired());
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(login_expired());
    };

    let storage = service.get_storage(request);
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(login_expired()),
        Err(e) => return Ok(e.to_response()),
    };

    match jwt::JwtUtils::generate_access_token(user.id, user.role.as_str()) {
        Ok(access_token) => {
            let response = RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            )
        }
    }
}

/// 返回当前账号，讲师和学生账号附带关联档案的 id
pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let storage = service.get_storage(request);
    let linked = match user.role {
        UserRole::Teacher => storage
            .get_teacher_by_user_id(user.id)
            .await
            .map(|t| (t.map(|t| t.id), None)),
        UserRole::Student => storage
            .get_student_by_user_id(user.id)
            .await
            .map(|s| (None, s.map(|s| s.id))),
        _ => Ok((None, None)),
    };
    let (teacher_id, student_id) = match linked {
        Ok(ids) => ids,
        Err(e) => return Ok(e.to_response()),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse {
            user,
            teacher_id,
            student_id,
        },
        "User information retrieved successfully",
    )))
}
