pub mod error_code;
pub mod pagination;
pub mod query;
pub mod response;

pub use error_code::ErrorCode;
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::{ApiResponse, FieldError};
