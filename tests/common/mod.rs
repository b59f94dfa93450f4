//! 통합 테스트 공용 헬퍼
//!
//! 인메모리 SQLite와 수동 시계(`ManualClock`)로 main.rs와 같은 라우터를 조립합니다.
//! 시간은 `clock.advance()`를 부를 때만 흐릅니다.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use pomodoro_chat::db;
use pomodoro_chat::routes::{self, AppState};
use pomodoro_chat::services::clock::ManualClock;
use pomodoro_chat::services::sessions::SessionRegistry;
use pomodoro_chat::services::timer::TimerConfig;

pub const PASSWORD: &str = "hunter22";

pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub sessions: Arc<SessionRegistry>,
}

/// 집중 1500초 / 휴식 600초 기본값으로 앱을 만듭니다.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(TimerConfig::new(1500, 600).unwrap()).await
}

pub async fn spawn_app_with(timer_defaults: TimerConfig) -> TestApp {
    let pool = db::connect("sqlite::memory:").await.unwrap();
    let clock = Arc::new(ManualClock::new());
    let sessions = Arc::new(SessionRegistry::new());

    let state = AppState {
        pool,
        jwt_secret: "integration-test-secret".to_string(),
        sessions: sessions.clone(),
        clock: clock.clone(),
        timer_defaults,
        tick_interval: Duration::from_millis(50),
    };

    TestApp {
        router: routes::router(state),
        clock,
        sessions,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    /// 회원가입하고 액세스 토큰을 돌려줍니다.
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": PASSWORD,
                    "confirm_password": PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register {username}: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// `GET /timer/stream`을 열고 응답을 그대로 돌려줍니다.
    pub async fn open_stream(&self, token: &str) -> Response {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/v1/timer/stream")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub fn advance(&self, seconds: u64) {
        self.clock.advance(Duration::from_secs(seconds));
    }
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

/// SSE 응답 본문을 이벤트 단위로 읽습니다.
pub struct EventStream {
    body: Body,
    buffer: String,
}

impl EventStream {
    pub fn new(response: Response) -> Self {
        Self {
            body: response.into_body(),
            buffer: String::new(),
        }
    }

    /// 다음 `event: timer`의 data JSON. 스트림이 끝나면 `None`.
    ///
    /// keep-alive 주석 같은 다른 이벤트는 건너뜁니다.
    pub async fn next_timer_event(&mut self) -> Option<Value> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let raw: String = self.buffer.drain(..end + 2).collect();
                let mut name = None;
                let mut data = String::new();
                for line in raw.lines() {
                    if let Some(value) = line.strip_prefix("event:") {
                        name = Some(value.trim().to_string());
                    } else if let Some(value) = line.strip_prefix("data:") {
                        data.push_str(value.trim_start());
                    }
                }
                if name.as_deref() == Some("timer") {
                    return Some(serde_json::from_str(&data).unwrap());
                }
                continue;
            }

            let frame = tokio::time::timeout(Duration::from_secs(5), self.body.frame())
                .await
                .expect("no SSE frame within 5s")?
                .unwrap();
            if let Ok(bytes) = frame.into_data() {
                self.buffer.push_str(std::str::from_utf8(&bytes).unwrap());
            }
        }
    }
}
