use serde::Deserialize;
use ts_rs::TS;
use validator::{Validate, ValidationError};

use super::entities::SessionStatus;
use crate::models::common::query::{deserialize_nullable_i64, deserialize_opt_i64};
use crate::utils::validate::{check_time_order, validate_date, validate_hhmm};

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[validate(schema(function = "check_create_session"))]
#[ts(export, export_to = "../frontend/src/types/generated/class_session.ts")]
pub struct CreateClassSessionRequest {
    pub branch_id: i64,
    pub teacher_id: i64,
    pub student_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub class_type_id: Option<i64>,
    pub booth_id: Option<i64>,
    pub evaluation_id: Option<i64>,
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(custom(function = "validate_hhmm"))]
    pub start_time: String,
    #[validate(custom(function = "validate_hhmm"))]
    pub end_time: String,
    pub status: Option<SessionStatus>, // 缺省为 scheduled
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

fn check_create_session(req: &CreateClassSessionRequest) -> Result<(), ValidationError> {
    check_time_order(&req.start_time, &req.end_time)
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[validate(schema(function = "check_update_session"))]
#[ts(export, export_to = "../frontend/src/types/generated/class_session.ts")]
pub struct UpdateClassSessionRequest {
    pub branch_id: Option<i64>,
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub student_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub subject_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub class_type_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub booth_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub evaluation_id: Option<Option<i64>>,
    #[validate(custom(function = "validate_date"))]
    pub date: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub start_time: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub end_time: Option<String>,
    pub status: Option<SessionStatus>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

fn check_update_session(req: &UpdateClassSessionRequest) -> Result<(), ValidationError> {
    match (&req.start_time, &req.end_time) {
        (Some(start), Some(end)) => check_time_order(start, end),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassSessionFilter {
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub branch_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub teacher_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub student_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub booth_id: Option<i64>,
    pub status: Option<SessionStatus>,
    pub date: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}
