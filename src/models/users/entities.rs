use serde::{Deserialize, Serialize};
use ts_rs::TS;

string_enum! {
    /// 用户角色
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserRole {
        Admin => "admin",     // 管理员
        Staff => "staff",     // 教务人员
        Teacher => "teacher", // 讲师
        Student => "student", // 学生
    }
}

impl UserRole {
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Staff]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Staff, &Self::Teacher]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Staff, &Self::Teacher, &Self::Student]
    }
}

string_enum! {
    /// 用户状态
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub branch_id: Option<i64>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.role.as_str(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("staff".parse::<UserRole>(), Ok(UserRole::Staff));
        assert!("user".parse::<UserRole>().is_err());
        let role: UserRole = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(role, UserRole::Teacher);
    }

    #[test]
    fn test_role_groups() {
        assert!(UserRole::staff_roles().contains(&&UserRole::Staff));
        assert!(!UserRole::staff_roles().contains(&&UserRole::Teacher));
        assert_eq!(UserRole::all_roles().len(), UserRole::ALL.len());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let now = chrono::Utc::now();
        let user = User {
            id: 1,
            username: "admin".into(),
            email: "admin@localhost".into(),
            password_hash: "secret-hash".into(),
            role: UserRole::Admin,
            status: UserStatus::Active,
            display_name: None,
            branch_id: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
