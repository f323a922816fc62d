use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use crate::models::common::query::{deserialize_nullable_i64, deserialize_opt_i64};
use crate::utils::validate::{validate_not_blank, validate_optional_email, validate_phone};

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct CreateTeacherRequest {
    pub user_id: Option<i64>,
    pub branch_id: Option<i64>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 100))]
    pub kana_name: Option<String>,
    #[validate(length(max = 255), custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    #[validate(length(max = 32), custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 64))]
    pub line_id: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub user_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub branch_id: Option<Option<i64>>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub kana_name: Option<String>,
    #[validate(length(max = 255), custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    #[validate(length(max = 32), custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 64))]
    pub line_id: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateTeacherRequest> for UpdateTeacherRequest {
    fn from(req: CreateTeacherRequest) -> Self {
        Self {
            user_id: req.user_id.map(Some),
            branch_id: req.branch_id.map(Some),
            name: Some(req.name),
            kana_name: req.kana_name,
            email: req.email,
            phone: req.phone,
            line_id: req.line_id,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeacherFilter {
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub branch_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub user_id: Option<i64>,
}
