//! # 서비스(비즈니스 로직) 모듈
//!
//! HTTP나 DB와 무관한 도메인 로직을 모아둔 모듈입니다.
//! - `timer`: 뽀모도로 타이머 상태 기계
//! - `clock`: 현재 시각을 주입하기 위한 시계 트레이트
//! - `sessions`: 사용자 세션별 타이머 레지스트리
//! - `ticker`: 모든 타이머를 주기적으로 확인하는 백그라운드 태스크
//! - `chat`: 채팅 채널 이름과 메시지 본문 규칙

pub mod chat;
pub mod clock;
pub mod sessions;
pub mod ticker;
pub mod timer;
