//! # 뽀모도로 채팅 서버 라이브러리
//!
//! 집중/휴식 타이머와 친구 채팅을 제공하는 HTTP JSON 백엔드입니다.
//! 실행 파일(main.rs)과 통합 테스트(tests/)가 이 라이브러리를 함께 씁니다.
//!
//! 모듈 구성:
//! - `config`: 환경변수 설정
//! - `db`: 계정/친구/메시지 저장소 (SQLite)
//! - `error`: 에러 타입과 HTTP 응답 변환
//! - `middleware`: JWT 인증
//! - `models`: 요청/응답/행(row) 구조체
//! - `routes`: HTTP 핸들러와 라우터
//! - `services`: 타이머 상태 기계, 세션 레지스트리, 틱 태스크, 채팅 규칙

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
