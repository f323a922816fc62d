use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use crate::utils::validate::validate_not_blank;

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CreateEvaluationRequest {
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(range(min = 0, max = 100))]
    pub score: i32,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct UpdateEvaluationRequest {
    #[validate(length(min = 1, max = 50), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i32>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

impl From<CreateEvaluationRequest> for UpdateEvaluationRequest {
    fn from(req: CreateEvaluationRequest) -> Self {
        Self {
            name: Some(req.name),
            score: Some(req.score),
            notes: req.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationFilter {}
