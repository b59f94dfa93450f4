//! 타이머 API 통합 테스트
//!
//! `ManualClock`으로 시간을 직접 넘기며 시작/일시정지/리셋/완료 흐름을 확인합니다.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{error_code, spawn_app, spawn_app_with, EventStream};
use pomodoro_chat::services::timer::TimerConfig;
use serde_json::json;

#[tokio::test]
async fn new_session_starts_idle_in_focus() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    let (status, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(status, StatusCode::OK);

    let timer = &body["timer"];
    assert_eq!(timer["mode"], "focus");
    assert_eq!(timer["mode_label"], "Focus Time");
    assert_eq!(timer["running"], false);
    assert_eq!(timer["remaining_seconds"], 1500);
    assert_eq!(timer["display"], "25:00");
    assert_eq!(body["notifications"], json!([]));
}

#[tokio::test]
async fn start_counts_down_and_pause_freezes() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    let (status, body) = app.post("/api/v1/timer/start", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["running"], true);

    app.advance(2);
    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["remaining_seconds"], 1498);
    assert_eq!(body["timer"]["display"], "24:58");

    let (status, body) = app.post("/api/v1/timer/pause", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["remaining_seconds"], 1498);

    // 멈춘 동안에는 시간이 줄지 않음
    app.advance(300);
    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["remaining_seconds"], 1498);

    // 재개하면 멈춘 지점부터 이어서
    app.post("/api/v1/timer/start", &token, json!({})).await;
    app.advance(8);
    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["remaining_seconds"], 1490);
}

#[tokio::test]
async fn double_start_and_idle_pause_conflict() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    let (status, body) = app.post("/api/v1/timer/pause", &token, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "not_running");

    app.post("/api/v1/timer/start", &token, json!({})).await;
    app.advance(10);

    let (status, body) = app.post("/api/v1/timer/start", &token, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "already_running");

    // 거부된 시작이 경과 시간을 지우지 않음
    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["remaining_seconds"], 1490);
    assert_eq!(body["timer"]["running"], true);
}

#[tokio::test]
async fn reset_restores_full_duration() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    app.post("/api/v1/timer/start", &token, json!({})).await;
    app.advance(600);

    let (status, body) = app.post("/api/v1/timer/reset", &token, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["mode"], "focus");
    assert_eq!(body["timer"]["remaining_seconds"], 1500);
}

#[tokio::test]
async fn completion_flips_mode_and_notifies_once() {
    let app = spawn_app_with(TimerConfig::new(60, 30).unwrap()).await;
    let token = app.register("alice").await;

    app.post("/api/v1/timer/start", &token, json!({})).await;
    app.advance(61);

    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["mode"], "break");
    assert_eq!(body["timer"]["mode_label"], "Break Time");
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["remaining_seconds"], 30);

    let notes = body["notifications"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["finished"], "focus");
    assert_eq!(notes[0]["next"], "break");
    assert!(!notes[0]["message"].as_str().unwrap().is_empty());

    // 같은 알림은 다시 오지 않음
    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["notifications"], json!([]));

    // 휴식이 끝나면 다시 집중
    app.post("/api/v1/timer/start", &token, json!({})).await;
    app.advance(30);
    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["mode"], "focus");
    assert_eq!(body["timer"]["remaining_seconds"], 60);
    assert_eq!(body["notifications"][0]["finished"], "break");
}

#[tokio::test]
async fn overdue_timer_completes_only_once() {
    let app = spawn_app_with(TimerConfig::new(60, 30).unwrap()).await;
    let token = app.register("alice").await;

    app.post("/api/v1/timer/start", &token, json!({})).await;
    // 집중+휴식 길이를 훨씬 넘겨도 한 번만 넘어가고 대기 상태
    app.advance(1000);

    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["mode"], "break");
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["notifications"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn settings_update_while_idle() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/timer/settings",
            Some(&token),
            Some(json!({ "focus_seconds": 3000, "break_seconds": 300 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["focus_seconds"], 3000);
    assert_eq!(body["timer"]["break_seconds"], 300);
    assert_eq!(body["timer"]["remaining_seconds"], 3000);
    assert_eq!(body["timer"]["display"], "50:00");

    // 한쪽만 바꾸면 다른 쪽은 그대로
    let (_, body) = app
        .request(
            Method::PUT,
            "/api/v1/timer/settings",
            Some(&token),
            Some(json!({ "break_seconds": 120 })),
        )
        .await;
    assert_eq!(body["timer"]["focus_seconds"], 3000);
    assert_eq!(body["timer"]["break_seconds"], 120);
}

#[tokio::test]
async fn settings_rejected_while_running_or_zero() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/timer/settings",
            Some(&token),
            Some(json!({ "focus_seconds": 1200, "break_seconds": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_duration");

    // 일부만 적용되지 않음
    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["focus_seconds"], 1500);

    app.post("/api/v1/timer/start", &token, json!({})).await;
    app.advance(5);
    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/timer/settings",
            Some(&token),
            Some(json!({ "focus_seconds": 60 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "configure_while_running");

    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["remaining_seconds"], 1495);
    assert_eq!(body["timer"]["running"], true);
}

#[tokio::test]
async fn settings_reject_negative_and_fractional_durations() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    for body in [
        json!({ "focus_seconds": -5 }),
        json!({ "break_seconds": 1.5 }),
        json!({ "focus_seconds": 900, "break_seconds": -1 }),
    ] {
        let (status, response) = app
            .request(Method::PUT, "/api/v1/timer/settings", Some(&token), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error_code(&response), "invalid_duration", "{body}");
    }

    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["timer"]["focus_seconds"], 1500);
    assert_eq!(body["timer"]["break_seconds"], 600);
}

#[tokio::test]
async fn malformed_settings_body_is_json_bad_request() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    let (status, body) = app
        .request(
            Method::PUT,
            "/api/v1/timer/settings",
            Some(&token),
            Some(json!({ "focus_seconds": "twenty" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "bad_request");
}

#[tokio::test]
async fn stream_requires_live_session() {
    let app = spawn_app().await;
    let token = app.register("alice").await;
    app.post("/api/v1/auth/logout", &token, json!({})).await;

    let (status, body) = app.get("/api/v1/timer/stream", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "session_ended");
}

#[tokio::test]
async fn stream_pushes_snapshots_and_completion() {
    let app = spawn_app_with(TimerConfig::new(60, 30).unwrap()).await;
    let token = app.register("alice").await;
    app.post("/api/v1/timer/start", &token, json!({})).await;

    let response = app.open_stream(&token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let mut events = EventStream::new(response);
    let first = events.next_timer_event().await.unwrap();
    assert_eq!(first["timer"]["mode"], "focus");
    assert_eq!(first["timer"]["running"], true);
    assert_eq!(first["timer"]["remaining_seconds"], 60);
    assert_eq!(first["notifications"], json!([]));

    app.advance(61);

    // 시계를 넘긴 뒤 다음 틱에서 완료 알림이 실려 옴
    let mut completed = None;
    for _ in 0..20 {
        let view = events.next_timer_event().await.unwrap();
        if !view["notifications"].as_array().unwrap().is_empty() {
            completed = Some(view);
            break;
        }
    }
    let completed = completed.expect("completion was not pushed");
    assert_eq!(completed["notifications"][0]["finished"], "focus");
    assert_eq!(completed["notifications"][0]["next"], "break");
    assert_eq!(completed["timer"]["mode"], "break");
    assert_eq!(completed["timer"]["running"], false);
    assert_eq!(completed["timer"]["remaining_seconds"], 30);

    // 알림은 한 번만 실림
    let next = events.next_timer_event().await.unwrap();
    assert_eq!(next["notifications"], json!([]));
    assert_eq!(next["timer"]["mode"], "break");

    // 일반 조회 쪽에서도 이미 전달된 알림은 다시 오지 않음
    let (_, body) = app.get("/api/v1/timer", &token).await;
    assert_eq!(body["notifications"], json!([]));
}

#[tokio::test]
async fn stream_ends_after_logout() {
    let app = spawn_app().await;
    let token = app.register("alice").await;

    let mut events = EventStream::new(app.open_stream(&token).await);
    assert!(events.next_timer_event().await.is_some());

    app.post("/api/v1/auth/logout", &token, json!({})).await;

    let mut ended = false;
    for _ in 0..3 {
        if events.next_timer_event().await.is_none() {
            ended = true;
            break;
        }
    }
    assert!(ended, "stream kept sending after logout");
}
