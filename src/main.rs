//! # 뽀모도로 채팅 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 연결 풀 생성 + 마이그레이션
//! 4. 세션 레지스트리와 타이머 틱 태스크 시작
//! 5. API 라우터 설정 (+ 프론트엔드 정적 파일)
//! 6. HTTP 서버 시작

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use pomodoro_chat::{
    config::Config,
    db,
    routes::{self, AppState},
    services::{clock::SystemClock, sessions::SessionRegistry, ticker},
};
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 이 크레이트와 HTTP 계층을 debug 레벨로 출력
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pomodoro_chat=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting Pomodoro Chat server on {}:{}", config.host, config.port);
    tracing::info!(
        focus_seconds = config.timer.focus_seconds(),
        break_seconds = config.timer.break_seconds(),
        "Default timer durations"
    );

    if config.database_url.contains(":memory:") {
        tracing::warn!("Using in-memory database; accounts and messages are lost on restart");
    }
    let pool = db::connect(&config.database_url).await?;

    let sessions = Arc::new(SessionRegistry::new());
    let clock = Arc::new(SystemClock);

    // 클라이언트가 폴링하지 않아도 타이머 완료가 제때 일어나도록 서버가 틱을 돌립니다.
    // 같은 루프가 만료된 세션도 정리합니다.
    // SqlitePool은 내부적으로 Arc라서 clone()은 연결을 새로 만들지 않고 참조만 늘립니다.
    let _ticker = ticker::spawn(
        sessions.clone(),
        pool.clone(),
        clock.clone(),
        config.tick_interval,
    );

    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        sessions,
        clock,
        timer_defaults: config.timer,
        tick_interval: config.tick_interval,
    };

    let api = routes::router(state);

    // 빌드된 프론트엔드가 있으면 같은 서버에서 서빙합니다 (SPA: 없는 경로는 index.html).
    let frontend_dist = Path::new(&config.frontend_dist);
    let app = if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", config.frontend_dist);
        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));
        api.fallback_service(serve_dir)
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");
        api
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
