//! # 미들웨어 모듈
//!
//! 핸들러 인자로 쓰이는 추출기(Extractor)들입니다.
//! - `auth`: JWT 발급/검증과 `AuthUser` 추출기
//! - `json`: 실패를 `AppError`로 돌려주는 `AppJson` 본문 추출기

pub mod auth;
pub mod json;
