//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 공유 상태(`AppState`), 라우터 조립 함수입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 토큰 갱신, 로그아웃
//! - `users`: 다른 사용자 목록
//! - `friends`: 친구 추가/목록
//! - `timer`: 뽀모도로 타이머 조작과 SSE 스트림
//! - `chat`: 채널별 메시지 읽기/쓰기
//! - `health`: 서버 상태 확인

pub mod auth;
pub mod chat;
pub mod friends;
pub mod health;
pub mod timer;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post, put}, // HTTP 메서드별 라우팅 함수
    Router,                    // URL 경로와 핸들러를 연결하는 라우터
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer}, // CORS: 다른 출처의 프론트엔드 요청 허용
    trace::TraceLayer,      // 요청/응답마다 tracing 로그
};

use crate::services::{clock::Clock, sessions::SessionRegistry, timer::TimerConfig};

// #[derive(Clone)]: axum은 요청마다 상태를 clone해서 핸들러에 넘깁니다.
// 그래서 State로 쓰는 타입은 반드시 Clone이어야 합니다.
// Arc<dyn Clock>: 트레이트 객체. 실제 구현(SystemClock / ManualClock)은 실행 시점에 정해집니다.

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 필드가 전부 `Arc`이거나 내부적으로 Arc인 타입이라 clone 비용이 작습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (계정/친구/메시지 저장소)
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 사용자 세션별 타이머
    pub sessions: Arc<SessionRegistry>,
    /// 타이머에 넘겨줄 현재 시각
    pub clock: Arc<dyn Clock>,
    /// 새 세션 타이머의 기본 길이
    pub timer_defaults: TimerConfig,
    /// SSE 스트림 전송 주기
    pub tick_interval: Duration,
}

/// `/api/v1` 아래의 모든 라우트를 조립합니다.
///
/// main.rs와 통합 테스트가 같은 라우터를 씁니다.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let timer_routes = Router::new()
        .route("/timer", get(timer::get_timer))
        .route("/timer/start", post(timer::start_timer))
        .route("/timer/pause", post(timer::pause_timer))
        .route("/timer/reset", post(timer::reset_timer))
        .route("/timer/settings", put(timer::update_settings))
        .route("/timer/stream", get(timer::stream_timer));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(timer_routes)
        .route("/users", get(users::list_users))
        .route("/friends", get(friends::list_friends).post(friends::add_friend))
        // axum 0.8 경로 파라미터 문법: {name}
        .route(
            "/chat/{channel}/messages",
            get(chat::list_messages).post(chat::send_message),
        )
        .route("/health", get(health::health_check))
        .with_state(state);

    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
