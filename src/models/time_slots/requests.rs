use serde::Deserialize;
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::models::common::query::{deserialize_nullable_i64, deserialize_opt_i64};
use crate::utils::validate::{check_time_order, validate_hhmm, validate_not_blank};

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[validate(schema(function = "check_create_slot"))]
#[ts(export, export_to = "../frontend/src/types/generated/time_slot.ts")]
pub struct CreateTimeSlotRequest {
    pub branch_id: Option<i64>,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_hhmm"))]
    pub start_time: String,
    #[validate(custom(function = "validate_hhmm"))]
    pub end_time: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

fn check_create_slot(req: &CreateTimeSlotRequest) -> Result<(), ValidationError> {
    check_time_order(&req.start_time, &req.end_time)
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[validate(schema(function = "check_update_slot"))]
#[ts(export, export_to = "../frontend/src/types/generated/time_slot.ts")]
pub struct UpdateTimeSlotRequest {
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub branch_id: Option<Option<i64>>,
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub start_time: Option<String>,
    #[validate(custom(function = "validate_hhmm"))]
    pub end_time: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

// 只提供其中一端时，与数据库中的另一端比较在合并后进行
fn check_update_slot(req: &UpdateTimeSlotRequest) -> Result<(), ValidationError> {
    match (&req.start_time, &req.end_time) {
        (Some(start), Some(end)) => check_time_order(start, end),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimeSlotFilter {
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub branch_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str) -> CreateTimeSlotRequest {
        CreateTimeSlotRequest {
            branch_id: None,
            name: "1限".into(),
            start_time: start.into(),
            end_time: end.into(),
            notes: None,
        }
    }

    #[test]
    fn test_slot_ordering() {
        assert!(slot("16:00", "17:20").validate().is_ok());
        let errors = slot("17:20", "16:00").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("__all__"));
    }

    #[test]
    fn test_partial_update_skips_ordering() {
        let update = UpdateTimeSlotRequest {
            end_time: Some("08:00".into()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }
}
