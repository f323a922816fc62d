use serde::Deserialize;
use ts_rs::TS;
use validator::Validate;

use crate::utils::validate::{validate_not_blank, validate_phone};

#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/branch.ts")]
pub struct CreateBranchRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 32), custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(range(min = 0, max = 9999))]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/branch.ts")]
pub struct UpdateBranchRequest {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 32), custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate(range(min = 0, max = 9999))]
    pub display_order: Option<i32>,
}

impl From<CreateBranchRequest> for UpdateBranchRequest {
    fn from(req: CreateBranchRequest) -> Self {
        Self {
            name: Some(req.name),
            address: req.address,
            phone: req.phone,
            notes: req.notes,
            display_order: req.display_order,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchFilter {}
