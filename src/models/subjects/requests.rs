use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use crate::utils::validate::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct UpdateSubjectRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateSubjectRequest> for UpdateSubjectRequest {
    fn from(req: CreateSubjectRequest) -> Self {
        Self {
            name: Some(req.name),
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectFilter {}
