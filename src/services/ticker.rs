//! # 타이머 틱(tick) 백그라운드 태스크
//!
//! 클라이언트가 화면을 다시 그리지 않아도 타이머 완료가 제때 일어나도록,
//! 서버가 일정 간격으로 모든 세션의 타이머를 확인합니다.
//! 완료 알림은 각 세션의 알림 큐에 쌓였다가 다음 조회 때 전달됩니다.
//!
//! 같은 루프에서 만료된 세션도 정리합니다. 로그아웃 없이 떠난 클라이언트의
//! 타이머와 `user_sessions` 행이 계속 쌓이지 않게 합니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::db::users as db_users;
use crate::error::AppError;
use crate::services::clock::Clock;
use crate::services::sessions::SessionRegistry;

/// 만료된 세션을 레지스트리와 DB에서 지웁니다. 반환값은 지운 세션 수입니다.
pub async fn sweep(
    registry: &SessionRegistry,
    pool: &SqlitePool,
    now: Instant,
) -> Result<usize, AppError> {
    // 레지스트리 잠금은 expire() 안에서 풀리므로 아래 .await 동안 잡고 있지 않음
    let expired = registry.expire(now)?;
    for session_id in &expired {
        db_users::delete_session(pool, session_id).await?;
        tracing::info!(session_id = %session_id, "expired session removed");
    }
    Ok(expired.len())
}

/// 틱 태스크를 띄웁니다. 반환된 핸들을 `abort()`하면 멈춥니다.
pub fn spawn(
    registry: Arc<SessionRegistry>,
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // 서버가 잠시 멈췄다 깨어나도 밀린 틱을 몰아서 돌리지 않음
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let now = clock.now();

            match registry.tick_all(now) {
                Ok(completed) => {
                    for (session_id, user_id, completion) in completed {
                        tracing::info!(
                            session_id = %session_id,
                            user_id = %user_id,
                            finished = ?completion.finished,
                            next = ?completion.next,
                            "timer session complete"
                        );
                    }
                }
                Err(e) => tracing::error!("Timer tick failed: {}", e),
            }

            if let Err(e) = sweep(&registry, &pool, now).await {
                tracing::error!("Session sweep failed: {}", e);
            }
        }
    })
}
