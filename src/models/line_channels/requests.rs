use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use crate::models::common::query::{
    deserialize_nullable_i64, deserialize_opt_bool, deserialize_opt_i64,
};
use crate::utils::validate::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/line_channel.ts")]
pub struct CreateLineChannelRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = 64), custom(function = "validate_not_blank"))]
    pub channel_id: String,
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub channel_secret: String,
    #[validate(length(min = 1, max = 1024), custom(function = "validate_not_blank"))]
    pub channel_access_token: String,
    pub branch_id: Option<i64>,
    pub is_active: Option<bool>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/line_channel.ts")]
pub struct UpdateLineChannelRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64), custom(function = "validate_not_blank"))]
    pub channel_id: Option<String>,
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub channel_secret: Option<String>,
    #[validate(length(min = 1, max = 1024), custom(function = "validate_not_blank"))]
    pub channel_access_token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub branch_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LineChannelFilter {
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub branch_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_bool")]
    pub is_active: Option<bool>,
}
