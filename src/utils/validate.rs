use std::borrow::Cow;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

use crate::models::FieldError;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+()\- ]+$").expect("Invalid phone regex"));

static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid color regex"));

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

pub(crate) fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    // 用户名长度校验：3 <= x <= 32
    let len = username.chars().count();
    if !(3..=32).contains(&len) {
        return Err(invalid(
            "username",
            "Username length must be between 3 and 32 characters",
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(invalid(
            "username",
            "Username must contain only letters, numbers, dots, underscores or hyphens",
        ));
    }
    Ok(())
}

/// 必填文本去除首尾空白后不能为空
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "This field must not be blank"));
    }
    Ok(())
}

// 以下格式校验只用于可选字段，空白值表示清空，交给 normalize_opt 处理

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() {
        return Ok(());
    }
    if !PHONE_RE.is_match(phone.trim()) {
        return Err(invalid(
            "phone",
            "Phone number may contain only digits, spaces, +, - and parentheses",
        ));
    }
    Ok(())
}

pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    if color.trim().is_empty() {
        return Ok(());
    }
    if !COLOR_RE.is_match(color.trim()) {
        return Err(invalid("color", "Color must be in #RRGGBB format"));
    }
    Ok(())
}

pub fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() || email.validate_email() {
        Ok(())
    } else {
        Err(invalid("email", "Invalid email address"))
    }
}

pub fn validate_optional_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_date(value)
}

pub fn validate_hhmm(value: &str) -> Result<(), ValidationError> {
    parse_hhmm(value)
        .map(|_| ())
        .ok_or_else(|| invalid("time", "Time must be in HH:MM format"))
}

pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| invalid("date", "Date must be in YYYY-MM-DD format"))
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("password");
        err.message = Some(Cow::Owned(result.error_message()));
        Err(err)
    }
}

pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if value.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).ok()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// 跨字段校验：开始时间必须早于结束时间
///
/// 错误码即为出错的字段名，`field_errors` 会据此归属到字段。
pub fn check_time_order(start: &str, end: &str) -> Result<(), ValidationError> {
    match (parse_hhmm(start), parse_hhmm(end)) {
        (Some(s), Some(e)) if s >= e => Err(invalid(
            "end_time",
            "End time must be later than start time",
        )),
        _ => Ok(()),
    }
}

/// 跨字段校验：结束日期不得早于开始日期
pub fn check_date_order(start: &str, end: &str) -> Result<(), ValidationError> {
    match (parse_date(start), parse_date(end)) {
        (Some(s), Some(e)) if e < s => Err(invalid(
            "end_date",
            "End date must not be earlier than start date",
        )),
        _ => Ok(()),
    }
}

fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    let param = |name: &str| err.params.get(name).map(|v| v.to_string());
    match &*err.code {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Length must be between {min} and {max}"),
            (Some(min), None) => format!("Length must be at least {min}"),
            (None, Some(max)) => format!("Length must be at most {max}"),
            _ => "Invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Value must be between {min} and {max}"),
            (Some(min), None) => format!("Value must be at least {min}"),
            (None, Some(max)) => format!("Value must be at most {max}"),
            _ => "Value out of range".to_string(),
        },
        "email" => "Invalid email address".to_string(),
        "required" => "This field is required".to_string(),
        other => format!("Invalid value ({other})"),
    }
}

/// 合并后校验得到的单个错误，错误码即字段名
pub fn field_error(err: &ValidationError) -> FieldError {
    FieldError::new(err.code.to_string(), describe(err))
}

/// 将 validator 的错误集合展开为按字段排序的错误列表
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut result: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                // 结构体级校验统一挂在 __all__ 下
                let field = if field == "__all__" {
                    err.code.to_string()
                } else {
                    field.to_string()
                };
                FieldError::new(field, describe(err))
            })
        })
        .collect();
    result.sort_by(|a, b| a.field.cmp(&b.field));
    result
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：字母 + 数字
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if password.chars().count() > 128 {
        errors.push("Password must be at most 128 characters long");
    }

    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = ["password1", "12345678a", "qwerty123", "admin123", "abcd1234"];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}
