/// API 业务错误码
///
/// 成功为 0；1xxx 请求错误，2xxx 认证授权，3xxx 资源，4xxx 冲突，5xxx 导入，9xxx 服务端。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    ValidationFailed = 1001,
    InvalidParameter = 1002,
    PayloadTooLarge = 1003,

    Unauthorized = 2000,
    AuthFailed = 2001,
    Forbidden = 2003,
    RateLimitExceeded = 2029,

    NotFound = 3000,
    UserNotFound = 3001,
    LinkedRecordNotFound = 3002,

    Conflict = 4000,
    DeleteRestricted = 4001,
    CannotDeleteSelf = 4002,

    ImportInProgress = 5000,
    ImportFileInvalid = 5001,
    ImportFileTooLarge = 5002,
    ImportSessionNotFound = 5003,
    ImportUnsupportedEntity = 5004,

    InternalServerError = 9000,
    DatabaseError = 9001,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::ValidationFailed as i32, 1001);
        assert_eq!(ErrorCode::DeleteRestricted as i32, 4001);
        assert_eq!(ErrorCode::ImportInProgress as i32, 5000);
    }
}
