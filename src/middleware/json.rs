//! # JSON 요청 본문 추출기
//!
//! `axum::Json`과 똑같이 본문을 역직렬화하지만, 실패하면 axum 기본 응답
//! (422 + 일반 텍스트) 대신 `AppError::BadRequest`로 바꿔 다른 에러와 같은
//! `{ "error": { "code", "message" } }` 형태로 응답합니다.

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::error::AppError;

// #[derive(FromRequest)]: axum "macros" 기능이 제공하는 derive 매크로
// - via(axum::Json): 실제 추출은 axum::Json<T>에 맡기고 결과만 감쌉니다.
// - rejection(AppError): 실패 값을 `From<JsonRejection> for AppError`로 변환합니다.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // body_text(): "Failed to deserialize the JSON body ..." 같은 사람이 읽을 설명
        AppError::BadRequest(rejection.body_text())
    }
}
