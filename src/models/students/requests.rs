use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use super::entities::StudentStatus;
use crate::models::common::query::{deserialize_nullable_i64, deserialize_opt_i64};
use crate::utils::validate::{validate_not_blank, validate_optional_email, validate_phone};

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub user_id: Option<i64>,
    pub branch_id: Option<i64>,
    pub grade_id: Option<i64>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 100))]
    pub kana_name: Option<String>,
    #[validate(length(max = 100))]
    pub school_name: Option<String>,
    #[validate(length(max = 255), custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    #[validate(length(max = 255), custom(function = "validate_optional_email"))]
    pub parent_email: Option<String>,
    #[validate(length(max = 32), custom(function = "validate_phone"))]
    pub parent_phone: Option<String>,
    #[validate(length(max = 64))]
    pub line_id: Option<String>,
    pub status: Option<StudentStatus>, // 缺省为 enrolled
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub user_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub branch_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "deserialize_nullable_i64")]
    #[ts(optional)]
    pub grade_id: Option<Option<i64>>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub kana_name: Option<String>,
    #[validate(length(max = 100))]
    pub school_name: Option<String>,
    #[validate(length(max = 255), custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    #[validate(length(max = 255), custom(function = "validate_optional_email"))]
    pub parent_email: Option<String>,
    #[validate(length(max = 32), custom(function = "validate_phone"))]
    pub parent_phone: Option<String>,
    #[validate(length(max = 64))]
    pub line_id: Option<String>,
    pub status: Option<StudentStatus>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateStudentRequest> for UpdateStudentRequest {
    fn from(req: CreateStudentRequest) -> Self {
        Self {
            user_id: req.user_id.map(Some),
            branch_id: req.branch_id.map(Some),
            grade_id: req.grade_id.map(Some),
            name: Some(req.name),
            kana_name: req.kana_name,
            school_name: req.school_name,
            email: req.email,
            parent_email: req.parent_email,
            parent_phone: req.parent_phone,
            line_id: req.line_id,
            status: req.status,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentFilter {
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub branch_id: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_i64")]
    pub grade_id: Option<i64>,
    pub status: Option<StudentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_emails_validated() {
        let update = UpdateStudentRequest {
            parent_email: Some("parent-at-example".into()),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("parent_email"));
    }

    #[test]
    fn test_filter_from_query_strings() {
        let filter: StudentFilter =
            serde_json::from_str(r#"{"branch_id": "3", "status": "paused"}"#).unwrap();
        assert_eq!(filter.branch_id, Some(3));
        assert_eq!(filter.status, Some(StudentStatus::Paused));
        assert_eq!(filter.grade_id, None);
    }
}
