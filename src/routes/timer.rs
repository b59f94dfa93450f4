//! # 타이머 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/timer | `get_timer` | 현재 상태 + 완료 알림 |
//! | POST | /api/v1/timer/start | `start_timer` | 시작 (실행 중이면 409) |
//! | POST | /api/v1/timer/pause | `pause_timer` | 일시정지 (멈춰 있으면 409) |
//! | POST | /api/v1/timer/reset | `reset_timer` | 정지 + 현재 모드 길이 복원 |
//! | PUT | /api/v1/timer/settings | `update_settings` | 집중/휴식 길이 변경 (실행 중이면 409) |
//! | GET | /api/v1/timer/stream | `stream_timer` | SSE로 틱마다 상태 전송 |
//!
//! 모든 응답은 `TimerView`(`timer` 스냅샷 + `notifications`)입니다.
//! 조회할 때마다 먼저 완료 여부를 확인하므로, 시간이 다 된 타이머는
//! 다음 조회에서 이미 다음 모드로 넘어가 있습니다.

use std::convert::Infallible;
use std::time::Instant;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use tokio_stream::{wrappers::IntervalStream, Stream, StreamExt};

use crate::{
    error::AppError,
    middleware::{auth::AuthUser, json::AppJson},
    models::{TimerView, UpdateTimerSettingsRequest},
    routes::AppState,
    services::timer::{TimerError, TimerSession},
};

/// 명령을 적용하고 최신 스냅샷과 쌓인 알림을 돌려줍니다.
fn apply<F>(state: &AppState, session_id: &str, command: F) -> Result<TimerView, AppError>
where
    F: FnOnce(&mut TimerSession, Instant) -> Result<(), TimerError>,
{
    let now = state.clock.now();
    let timer = state.sessions.with_timer(session_id, now, |timer| {
        command(timer, now)?;
        Ok(timer.snapshot(now))
    })?;
    let notifications = state.sessions.drain_notifications(session_id)?;

    for completion in &notifications {
        tracing::debug!(session_id, note = completion.message, "delivering completion");
    }

    Ok(TimerView {
        timer,
        notifications,
    })
}

pub async fn get_timer(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<TimerView>, AppError> {
    Ok(Json(apply(&state, &auth_user.session_id, |_, _| Ok(()))?))
}

pub async fn start_timer(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<TimerView>, AppError> {
    let view = apply(&state, &auth_user.session_id, |timer, now| timer.start(now))?;
    tracing::debug!(session_id = %auth_user.session_id, mode = ?view.timer.mode, "timer started");
    Ok(Json(view))
}

pub async fn pause_timer(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<TimerView>, AppError> {
    let view = apply(&state, &auth_user.session_id, |timer, now| {
        timer.pause(now).map(|_| ())
    })?;
    tracing::debug!(
        session_id = %auth_user.session_id,
        remaining = view.timer.remaining_seconds,
        "timer paused"
    );
    Ok(Json(view))
}

pub async fn reset_timer(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<TimerView>, AppError> {
    let view = apply(&state, &auth_user.session_id, |timer, _| {
        timer.reset();
        Ok(())
    })?;
    Ok(Json(view))
}

/// `PUT /timer/settings` + `{ "focus_seconds": 1500, "break_seconds": 300 }`
///
/// 실행 중이면 409로 거부되고 진행 중인 카운트다운은 그대로입니다.
/// 먼저 일시정지한 뒤 바꿔야 합니다. 0, 음수, 소수는 400 `invalid_duration`이고
/// 이때는 두 값 모두 바뀌지 않습니다.
pub async fn update_settings(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(req): AppJson<UpdateTimerSettingsRequest>,
) -> Result<Json<TimerView>, AppError> {
    let (focus_seconds, break_seconds) = req.durations()?;
    let view = apply(&state, &auth_user.session_id, |timer, _| {
        timer.configure(focus_seconds, break_seconds).map(|_| ())
    })?;
    tracing::info!(
        session_id = %auth_user.session_id,
        focus_seconds = view.timer.focus_seconds,
        break_seconds = view.timer.break_seconds,
        "timer settings updated"
    );
    Ok(Json(view))
}

/// `GET /timer/stream`: Server-Sent Events 카운트다운
///
/// 틱 주기마다 `event: timer` + `TimerView` JSON을 보냅니다.
/// 로그아웃 등으로 세션이 사라지면 스트림이 끝납니다.
pub async fn stream_timer(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // 세션이 살아 있는지는 AuthUser 추출 단계에서 이미 확인됨
    let session_id = auth_user.session_id;
    let interval = tokio::time::interval(state.tick_interval);

    let stream = IntervalStream::new(interval).map_while(move |_| {
        let view = match apply(&state, &session_id, |_, _| Ok(())) {
            Ok(view) => view,
            Err(e) => {
                tracing::debug!(session_id = %session_id, "timer stream closed: {}", e);
                return None;
            }
        };
        let event = Event::default()
            .event("timer")
            .json_data(&view)
            .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()));
        Some(Ok(event))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
