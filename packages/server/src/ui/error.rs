//! HTTP error responses.
//!
//! Every failure is rendered as `{ "code": "...", "message": "..." }` with the
//! matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    domain::{AuthError, ValueObjectError},
    usecase::CoordinatorError,
};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.body.code
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(error: CoordinatorError) -> Self {
        let status = match &error {
            CoordinatorError::RoomNotFound(_) | CoordinatorError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            CoordinatorError::Forbidden(_) => StatusCode::FORBIDDEN,
            CoordinatorError::InvalidContent(_) => StatusCode::BAD_REQUEST,
            CoordinatorError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CoordinatorError::RoomFull { .. } => StatusCode::CONFLICT,
            CoordinatorError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %error, "Request failed");
        }
        Self::new(status, error.code(), error.to_string())
    }
}

/// Rejected path, query and body values share the realtime error code.
impl From<ValueObjectError> for ApiError {
    fn from(error: ValueObjectError) -> Self {
        Self::from(CoordinatorError::from(error))
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Signing(message) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_SIGNING_FAILED",
                message,
            ),
            other => Self::unauthorized(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoomId;

    #[test]
    fn test_coordinator_error_status_codes() {
        // テスト項目: Coordinator のエラーが HTTP ステータスに対応付けられる
        let cases = [
            (CoordinatorError::RoomNotFound("r".into()), StatusCode::NOT_FOUND),
            (CoordinatorError::Forbidden("f".into()), StatusCode::FORBIDDEN),
            (
                CoordinatorError::InvalidContent(ValueObjectError::MessageContentEmpty),
                StatusCode::BAD_REQUEST,
            ),
            (CoordinatorError::Unauthorized("u".into()), StatusCode::UNAUTHORIZED),
            (CoordinatorError::RoomFull { capacity: 100 }, StatusCode::CONFLICT),
        ];

        for (error, expected) in cases {
            let code = error.code();
            let api = ApiError::from(error);
            assert_eq!(api.status(), expected);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn test_invalid_argument_code_matches_realtime_error() {
        // テスト項目: 不正な部屋 ID は HTTP でも WebSocket と同じエラーコードになる
        // given (前提条件):
        let error = RoomId::new("not-a-room".to_string()).unwrap_err();

        // when (操作):
        let realtime_code = CoordinatorError::from(error.clone()).code();
        let api = ApiError::from(error);

        // then (期待する結果):
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.code(), realtime_code);
        assert_eq!(api.code(), "INVALID_CONTENT");
    }

    #[test]
    fn test_auth_error_is_unauthorized() {
        // テスト項目: トークンの検証失敗は 401
        let api = ApiError::from(AuthError::InvalidToken("expired".into()));
        assert_eq!(api.status(), StatusCode::UNAUTHORIZED);
    }
}
