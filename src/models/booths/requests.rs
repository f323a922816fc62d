use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use crate::models::common::query::{deserialize_opt_bool, deserialize_opt_i64};
use crate::utils::validate::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/booth.ts")]
pub struct CreateBoothRequest {
    pub branch_id: i64,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub name: String,
    pub is_active: Option<bool>, // 缺省为 true
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/booth.ts")]
pub struct UpdateBoothRequest {
    pub branch_id: Option<i64>,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateBoothRequest> for UpdateBoothRequest {
    fn from(req: CreateBoothRequest) -> Self {
        Self {
            branch_id: Some(req.branch_id),
            name: Some(req.name),
            is_active: req.is_active,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BoothFilter {
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub branch_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_bool")]
    pub is_active: Option<bool>,
}
