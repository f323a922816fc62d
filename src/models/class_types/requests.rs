use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use crate::models::common::query::{
    deserialize_nullable_i64, deserialize_opt_bool, deserialize_opt_i64,
};
use crate::utils::validate::{validate_color, validate_not_blank};

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_type.ts")]
pub struct CreateClassTypeRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    pub parent_id: Option<i64>,
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class_type.ts")]
pub struct UpdateClassTypeRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub parent_id: Option<Option<i64>>,
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateClassTypeRequest> for UpdateClassTypeRequest {
    fn from(req: CreateClassTypeRequest) -> Self {
        Self {
            name: Some(req.name),
            parent_id: req.parent_id.map(Some),
            color: req.color,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassTypeFilter {
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub parent_id: Option<i64>,
    /// 仅返回顶级分类
    #[serde(deserialize_with = "deserialize_opt_bool")]
    pub root_only: Option<bool>,
}
