//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `user`: 사용자, 로그인 세션, 인증 요청/응답
//! - `friend`: 친구 추가 요청
//! - `message`: 채팅 메시지
//! - `timer`: 타이머 API 요청/응답
//!
//! `pub use X::*;`로 재공개하여 `crate::models::User`처럼 짧게 쓸 수 있습니다.

pub mod friend;
pub mod message;
pub mod timer;
pub mod user;

pub use friend::*;
pub use message::*;
pub use timer::*;
pub use user::*;
