use serde::Deserialize;
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::models::common::query::{deserialize_nullable_i64, deserialize_opt_i64};
use crate::utils::validate::{check_date_order, validate_date, validate_optional_date};

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[validate(schema(function = "check_create_course"))]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub class_type_id: Option<i64>,
    pub teacher_id: Option<i64>,
    #[validate(custom(function = "validate_date"))]
    pub start_date: String,
    #[validate(custom(function = "validate_optional_date"))]
    pub end_date: Option<String>,
    #[validate(range(min = 1, max = 14))]
    pub sessions_per_week: Option<i32>, // 缺省为 1
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

fn check_create_course(req: &CreateCourseRequest) -> Result<(), ValidationError> {
    match &req.end_date {
        Some(end) => check_date_order(&req.start_date, end),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[validate(schema(function = "check_update_course"))]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub student_id: Option<i64>,
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub class_type_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub teacher_id: Option<Option<i64>>,
    #[validate(custom(function = "validate_date"))]
    pub start_date: Option<String>,
    #[validate(custom(function = "validate_optional_date"))]
    pub end_date: Option<String>,
    #[validate(range(min = 1, max = 14))]
    pub sessions_per_week: Option<i32>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

fn check_update_course(req: &UpdateCourseRequest) -> Result<(), ValidationError> {
    match (&req.start_date, &req.end_date) {
        (Some(start), Some(end)) => check_date_order(start, end),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CourseFilter {
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub student_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub teacher_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub subject_id: Option<i64>,
    /// 指定日期仍在有效期内的选课（YYYY-MM-DD）
    pub active_on: Option<String>,
}
