use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

// 用户登录请求（来自HTTP请求）
#[derive(Debug, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    /// 密码
    #[validate(length(min = 1, max = 128))]
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}
