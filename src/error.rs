//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `AccountError`: 계정 저장소의 도메인 에러 (중복 아이디, 잘못된 로그인)
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//!
//! 타이머 에러(`TimerError`)는 `services::timer`에 있고, `#[from]`으로 합쳐집니다.

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

use crate::services::timer::TimerError;

// #[derive(..., Error)]: thiserror가 std::error::Error와 Display를 구현합니다.
// #[error("...")]에 적은 문자열이 .to_string()의 결과가 됩니다.
// Copy: 필드 없는 variant뿐이라 move 대신 값 그대로 복사됩니다.

/// 계정 저장소 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccountError {
    /// 이미 같은 이름의 사용자가 있음 (HTTP 409)
    #[error("Username already exists")]
    DuplicateUsername,

    /// 아이디 또는 비밀번호가 틀림 (HTTP 401)
    /// 어느 쪽이 틀렸는지는 알려주지 않습니다.
    #[error("Invalid username or password")]
    InvalidCredentials,
}

// enum(열거형): 여러 가지 가능한 값 중 하나를 나타내는 타입.
// match 문으로 모든 경우를 빠짐없이 처리해야 합니다 (exhaustive matching).
// 새 variant를 추가하면 아래 into_response의 match가 컴파일 에러로 알려줍니다.

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수의 에러에 `?`를 쓰면 자동으로 이 variant가 됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 없음 (HTTP 403): 친구가 아닌 사용자와의 대화방 접근 등
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 타이머 상태 기계가 거부한 명령
    #[error(transparent)]
    Timer(#[from] TimerError),

    /// 계정 저장소가 거부한 요청
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        // match self: 모든 variant를 (상태 코드, 에러 코드, 메시지) 튜플로 바꿉니다.
        // `ref msg`는 self를 옮기지 않고 안의 String을 빌려옵니다.
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone())
            }
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),

            // 타이머 에러: 잘못된 값은 400, 현재 상태와 맞지 않는 명령은 409
            AppError::Timer(e) => {
                let (status, code) = match e {
                    TimerError::InvalidDuration => (StatusCode::BAD_REQUEST, "invalid_duration"),
                    TimerError::AlreadyRunning => (StatusCode::CONFLICT, "already_running"),
                    TimerError::NotRunning => (StatusCode::CONFLICT, "not_running"),
                    TimerError::ConfigureWhileRunning => {
                        (StatusCode::CONFLICT, "configure_while_running")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Account(e) => {
                let (status, code) = match e {
                    AccountError::DuplicateUsername => (StatusCode::CONFLICT, "duplicate_username"),
                    AccountError::InvalidCredentials => {
                        (StatusCode::UNAUTHORIZED, "invalid_credentials")
                    }
                };
                (status, code, e.to_string())
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
