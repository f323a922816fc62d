use super::entities::{UserRole, UserStatus};
use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_opt_i64;
use crate::utils::validate::{validate_password_strength, validate_username};
use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub branch_id: Option<i64>,
    pub search: Option<String>,
}

// 用户创建请求
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    pub role: UserRole,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    pub branch_id: Option<i64>,
}

// 用户更新请求
#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    pub branch_id: Option<i64>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub branch_id: Option<i64>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role: UserRole::Staff,
            display_name: None,
            branch_id: None,
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(create("sato_k", "sato@example.com", "lesson2024").validate().is_ok());
    }

    #[test]
    fn test_invalid_create_request_fields() {
        let errors = create("x", "not-an-email", "short")
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_update_request_optional_fields() {
        assert!(UpdateUserRequest::default().validate().is_ok());
        let update = UpdateUserRequest {
            password: Some("weak".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
