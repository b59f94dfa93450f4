//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 저장소 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `users`: 계정과 로그인 세션
//! - `friends`: 친구 관계
//! - `messages`: 채널별 메시지 로그
//!
//! 기본 주소 `sqlite::memory:`는 프로세스가 끝나면 모든 데이터가 사라집니다.
//! 파일 주소(예: `sqlite:data/pomodoro.db`)를 주면 코드 변경 없이 영속화됩니다.

pub mod friends;
pub mod messages;
pub mod users;

pub use friends::*;
pub use messages::*;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// 연결 풀을 만들고 마이그레이션을 실행합니다.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    // 인메모리 DB는 연결마다 별개의 DB가 되므로 연결 하나를 끝까지 붙잡아 둡니다.
    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
