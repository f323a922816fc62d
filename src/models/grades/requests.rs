use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use super::entities::SchoolLevel;
use crate::utils::validate::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRequest {
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub name: String,
    pub school_level: Option<SchoolLevel>, // 缺省为 other
    #[validate(range(min = 1, max = 12))]
    pub grade_year: Option<i32>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub school_level: Option<SchoolLevel>,
    #[validate(range(min = 1, max = 12))]
    pub grade_year: Option<i32>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateGradeRequest> for UpdateGradeRequest {
    fn from(req: CreateGradeRequest) -> Self {
        Self {
            name: Some(req.name),
            school_level: req.school_level,
            grade_year: req.grade_year,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GradeFilter {
    pub school_level: Option<SchoolLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_year_range() {
        let req = CreateGradeRequest {
            name: "中学1年".into(),
            school_level: Some(SchoolLevel::Middle),
            grade_year: Some(13),
            notes: None,
        };
        assert!(req.validate().unwrap_err().field_errors().contains_key("grade_year"));
    }
}
