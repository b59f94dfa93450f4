//! # 사용자 세션별 타이머 레지스트리
//!
//! 로그인할 때 세션 하나가 열리고, 그 세션만의 `TimerSession`이 만들어집니다.
//! 로그아웃하면 세션과 타이머가 함께 사라집니다.
//!
//! ## 세션 흐름
//! ```text
//! login/register → open()     : Idle-Focus 타이머 생성
//! 매 요청/틱      → with_timer(): 완료 확인(tick) 후 명령 실행
//! 화면 갱신       → drain_notifications(): 아직 전달 안 된 완료 알림
//! logout          → close()    : 타이머 폐기
//! 만료            → expire()   : 리프레시 토큰 수명이 지나도록 갱신이 없으면 폐기
//! ```
//!
//! 다른 세션의 타이머는 세션 ID 없이는 닿을 수 없습니다.
//! 잠금 구간에서는 `.await`하지 않으므로 `std::sync::Mutex`를 씁니다.

use std::collections::{HashMap, VecDeque}; // VecDeque: 앞에서 꺼내고 뒤에 넣는 큐
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::middleware::auth::REFRESH_TOKEN_DAYS;
use crate::services::timer::{Completion, TimerConfig, TimerError, TimerSession};

/// 세션 하나의 상태
#[derive(Debug)]
struct SessionEntry {
    user_id: String,
    timer: TimerSession,
    /// 아직 화면에 전달되지 않은 완료 알림 (오래된 것이 앞)
    notifications: VecDeque<Completion>,
    /// 이 시각이 지나면 세션이 끝난 것으로 봅니다. 토큰 갱신 때 연장됩니다.
    expires_at: Instant,
}

impl SessionEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }

    fn tick(&mut self, now: Instant) -> Option<Completion> {
        let completion = self.timer.tick(now)?;
        self.notifications.push_back(completion.clone());
        Some(completion)
    }
}

/// 모든 활성 세션의 타이머를 보관합니다.
///
/// AppState 안에 `Arc<SessionRegistry>`로 들어가 핸들러와 틱 태스크가 공유합니다.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    /// 마지막 로그인/갱신 이후 세션이 유지되는 시간 (리프레시 토큰 수명과 같음)
    ttl: Duration,
}

/// 리프레시 토큰 수명 (7일)
pub const DEFAULT_SESSION_TTL: Duration =
    Duration::from_secs(REFRESH_TOKEN_DAYS as u64 * 24 * 60 * 60);

// Default: ttl은 DEFAULT_SESSION_TTL (derive하면 0초가 됨)
impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SessionEntry>>, AppError> {
        self.sessions
            .lock()
            .map_err(|e| AppError::Internal(format!("Session registry poisoned: {}", e)))
    }

    /// 새 세션을 열고 Idle-Focus 타이머를 만듭니다.
    pub fn open(
        &self,
        session_id: &str,
        user_id: &str,
        config: TimerConfig,
        now: Instant,
    ) -> Result<(), AppError> {
        let entry = SessionEntry {
            user_id: user_id.to_string(),
            timer: TimerSession::new(config),
            notifications: VecDeque::new(),
            expires_at: now + self.ttl,
        };
        self.lock()?.insert(session_id.to_string(), entry);
        tracing::debug!(session_id, user_id, "timer session opened");
        Ok(())
    }

    /// 토큰 갱신 시 호출합니다.
    ///
    /// 살아 있는 세션이면 만료 시각만 연장하고 `false`를,
    /// 없거나 이미 만료된 세션이면 새 타이머로 다시 열고 `true`를 반환합니다.
    pub fn ensure_open(
        &self,
        session_id: &str,
        user_id: &str,
        config: TimerConfig,
        now: Instant,
    ) -> Result<bool, AppError> {
        {
            let mut sessions = self.lock()?;
            if let Some(entry) = sessions.get_mut(session_id) {
                if entry.is_live(now) {
                    entry.expires_at = now + self.ttl;
                    return Ok(false);
                }
            }
        }
        self.open(session_id, user_id, config, now)?;
        Ok(true)
    }

    /// 세션을 닫고 타이머를 버립니다.
    pub fn close(&self, session_id: &str) -> Result<bool, AppError> {
        let removed = self.lock()?.remove(session_id).is_some();
        if removed {
            tracing::debug!(session_id, "timer session closed");
        }
        Ok(removed)
    }

    /// 세션이 있고 아직 만료되지 않았는지
    pub fn is_live(&self, session_id: &str, now: Instant) -> Result<bool, AppError> {
        Ok(self
            .lock()?
            .get(session_id)
            .is_some_and(|entry| entry.is_live(now)))
    }

    /// 보관 중인 세션 수 (만료됐지만 아직 `expire()`되지 않은 세션 포함)
    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.len())
    }

    /// `now` 기준으로 살아 있는 세션 수
    pub fn live_count(&self, now: Instant) -> Result<usize, AppError> {
        Ok(self
            .lock()?
            .values()
            .filter(|entry| entry.is_live(now))
            .count())
    }

    /// 만료된 세션을 모두 제거하고 그 세션 ID를 돌려줍니다.
    pub fn expire(&self, now: Instant) -> Result<Vec<String>, AppError> {
        let mut sessions = self.lock()?;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, entry)| !entry.is_live(now))
            .map(|(session_id, _)| session_id.clone())
            .collect();
        for session_id in &expired {
            sessions.remove(session_id);
            tracing::debug!(session_id = %session_id, "timer session expired");
        }
        Ok(expired)
    }

    /// 세션의 타이머에 대해 `f`를 실행합니다.
    ///
    /// 먼저 `tick(now)`으로 완료 여부를 확인한 뒤 `f`를 부릅니다.
    /// 따라서 `f`는 항상 최신 상태의 타이머를 봅니다.
    pub fn with_timer<T, F>(&self, session_id: &str, now: Instant, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut TimerSession) -> Result<T, TimerError>,
    {
        let mut sessions = self.lock()?;
        let entry = sessions
            .get_mut(session_id)
            .filter(|entry| entry.is_live(now))
            .ok_or_else(|| AppError::Unauthorized("Session has ended".to_string()))?;

        entry.tick(now);
        Ok(f(&mut entry.timer)?)
    }

    /// 쌓인 완료 알림을 꺼냅니다. 각 알림은 한 번만 전달됩니다.
    pub fn drain_notifications(&self, session_id: &str) -> Result<Vec<Completion>, AppError> {
        let mut sessions = self.lock()?;
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::Unauthorized("Session has ended".to_string()))?;
        Ok(entry.notifications.drain(..).collect())
    }

    /// 모든 세션의 타이머를 한 번씩 확인합니다.
    ///
    /// 이번에 완료된 `(세션 ID, 사용자 ID, 완료 알림)` 목록을 돌려줍니다.
    pub fn tick_all(&self, now: Instant) -> Result<Vec<(String, String, Completion)>, AppError> {
        let mut sessions = self.lock()?;
        let completed = sessions
            .iter_mut()
            .filter(|(_, entry)| entry.is_live(now))
            .filter_map(|(session_id, entry)| {
                entry
                    .tick(now)
                    .map(|completion| (session_id.clone(), entry.user_id.clone(), completion))
            })
            .collect();
        Ok(completed)
    }
}
