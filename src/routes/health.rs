//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "active_sessions": 3 }`
//!
//! 로드밸런서나 컨테이너 헬스체크용입니다. 인증이 필요 없습니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{error::AppError, routes::AppState};

/// `GET /health`: 서버 상태와 현재 살아 있는 타이머 세션 수
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(json!({
        "status": "ok",
        // 만료 시각이 지난 세션은 아직 정리 전이어도 세지 않음
        "active_sessions": state.sessions.live_count(state.clock.now())?,
    })))
}
