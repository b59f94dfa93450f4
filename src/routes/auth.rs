//! # 인증 라우트 핸들러
//!
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | POST | /api/v1/auth/register | 회원가입 후 바로 로그인 |
//! | POST | /api/v1/auth/login | 로그인 (새 세션 + 새 타이머) |
//! | POST | /api/v1/auth/refresh | 리프레시 토큰 교체 (세션·타이머 유지) |
//! | POST | /api/v1/auth/logout | 세션 종료 (타이머 폐기) |
//! | GET | /api/v1/auth/me | 내 정보 |

use crate::{
    db::users as db_users,
    error::{AccountError, AppError},
    middleware::{
        auth::{
            create_access_token, create_refresh_token, hash_token, verify_token, AuthUser,
            TokenKind, REFRESH_TOKEN_DAYS,
        },
        json::AppJson,
    },
    models::user::*,
    routes::AppState,
    services::chat::GENERAL_CHANNEL,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_USERNAME_CHARS: usize = 32;

const EXPIRES_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    let username = req.username.trim();
    if username.is_empty() || req.email.trim().is_empty() {
        return Err(AppError::BadRequest("Please fill in all fields".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(AppError::BadRequest(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_CHARS
        )));
    }
    // ':'가 들어가면 1:1 채널 키(dm:a:b)가 겹칠 수 있음
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(AppError::BadRequest(
            "Username may only contain letters, digits, '_', '-' and '.'".to_string(),
        ));
    }
    if username.eq_ignore_ascii_case(GENERAL_CHANNEL) {
        return Err(AppError::BadRequest(format!(
            "'{}' is reserved",
            GENERAL_CHANNEL
        )));
    }
    if !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if let Some(confirm) = &req.confirm_password {
        if confirm != &req.password {
            return Err(AppError::BadRequest("Passwords do not match".to_string()));
        }
    }
    if req.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

fn refresh_expires_at() -> String {
    (Utc::now() + Duration::days(REFRESH_TOKEN_DAYS))
        .format(EXPIRES_AT_FORMAT)
        .to_string()
}

fn issue_tokens(user_id: &str, session_id: &str, secret: &str) -> Result<(String, String), AppError> {
    let access_token = create_access_token(user_id, session_id, secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(user_id, session_id, secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    Ok((access_token, refresh_token))
}

/// 새 로그인 세션을 열고 그 세션의 타이머를 만듭니다.
async fn open_session(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let session_id = uuid::Uuid::now_v7().to_string();
    let (access_token, refresh_token) = issue_tokens(&user.id, &session_id, &state.jwt_secret)?;

    db_users::create_session(
        &state.pool,
        &session_id,
        &user.id,
        &hash_token(&refresh_token),
        &refresh_expires_at(),
    )
    .await?;
    state
        .sessions
        .open(&session_id, &user.id, state.timer_defaults, state.clock.now())?;

    tracing::info!(user_id = %user.id, session_id = %session_id, "session started");

    Ok(AuthResponse {
        user: user.into(),
        session_id,
        access_token,
        refresh_token,
    })
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    validate_registration(&req)?;
    let username = req.username.trim();

    if db_users::find_by_username(&state.pool, username).await?.is_some() {
        return Err(AccountError::DuplicateUsername.into());
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(
        &state.pool,
        &user_id,
        username,
        req.email.trim(),
        &password_hash,
    )
    .await?;

    Ok(Json(open_session(&state, user).await?))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = db_users::find_by_username(&state.pool, req.username.trim())
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidCredentials)?;

    Ok(Json(open_session(&state, user).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    verify_token(&req.refresh_token, TokenKind::Refresh, &state.jwt_secret)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    let token_hash = hash_token(&req.refresh_token);
    let session = db_users::find_session_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    let expires = chrono::NaiveDateTime::parse_from_str(&session.expires_at, EXPIRES_AT_FORMAT)
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    if expires.and_utc() < Utc::now() {
        db_users::delete_session(&state.pool, &session.id).await?;
        state.sessions.close(&session.id)?;
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &session.user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    let (access_token, refresh_token) = issue_tokens(&user.id, &session.id, &state.jwt_secret)?;
    db_users::rotate_session_token(
        &state.pool,
        &session.id,
        &hash_token(&refresh_token),
        &refresh_expires_at(),
    )
    .await?;

    // 살아 있는 타이머는 만료 시각만 연장되고, 서버 재시작 등으로 타이머가 없으면 새로 만듦
    if state.sessions.ensure_open(
        &session.id,
        &user.id,
        state.timer_defaults,
        state.clock.now(),
    )? {
        tracing::info!(session_id = %session.id, "timer recreated for refreshed session");
    }

    Ok(Json(AuthResponse {
        user: user.into(),
        session_id: session.id,
        access_token,
        refresh_token,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_session(&state.pool, &auth_user.session_id).await?;
    state.sessions.close(&auth_user.session_id)?;

    tracing::info!(user_id = %auth_user.user_id, session_id = %auth_user.session_id, "session ended");

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}
