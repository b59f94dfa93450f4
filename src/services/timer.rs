//! # 뽀모도로 타이머 상태 기계
//!
//! 집중(Focus)과 휴식(Break) 두 모드를 번갈아 도는 카운트다운 타이머입니다.
//!
//! ## 상태
//! ```text
//!            start                 tick (남은 시간 0)
//! Idle-Focus ─────▶ Running-Focus ──────────────▶ Idle-Break
//!     ▲   ◀───────── pause/reset                      │
//!     │                                               │ start
//!     │        tick (남은 시간 0)                      ▼
//!     └──────────────────────────────────────── Running-Break
//! ```
//!
//! 타이머는 스스로 시간을 세지 않습니다. 모든 연산이 호출자로부터 `now`를 받아
//! `(mode, 남은 시간, started_at, now)`만으로 남은 시간을 계산합니다.
//! 덕분에 테스트에서는 가짜 시계로 시간을 마음대로 흘려보낼 수 있습니다.

use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;

/// 기본 집중 시간 (25분)
pub const DEFAULT_FOCUS_SECONDS: u64 = 25 * 60;
/// 기본 휴식 시간 (10분)
pub const DEFAULT_BREAK_SECONDS: u64 = 10 * 60;

/// 타이머 연산 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    /// 0초 길이는 설정할 수 없습니다. 이전 값이 유지됩니다.
    #[error("Duration must be a positive number of seconds")]
    InvalidDuration,

    /// 이미 실행 중인 타이머를 다시 시작하려 함
    #[error("Timer is already running")]
    AlreadyRunning,

    /// 멈춰 있는 타이머를 일시정지하려 함
    #[error("Timer is not running")]
    NotRunning,

    /// 실행 중에는 시간 설정을 바꿀 수 없습니다.
    #[error("Pause the timer before changing its durations")]
    ConfigureWhileRunning,
}

/// 타이머 모드
///
/// JSON에서는 `"focus"`, `"break"` 소문자 문자열로 표현됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    /// 완료 후 넘어갈 다음 모드
    pub fn next(self) -> Self {
        match self {
            Mode::Focus => Mode::Break,
            Mode::Break => Mode::Focus,
        }
    }

    /// 화면에 표시할 모드 이름
    pub fn label(self) -> &'static str {
        match self {
            Mode::Focus => "Focus Time",
            Mode::Break => "Break Time",
        }
    }

    fn completion_message(self) -> &'static str {
        match self {
            Mode::Focus => "Focus session complete! Time for a break!",
            Mode::Break => "Break complete! Ready to focus again!",
        }
    }
}

/// 모드별로 설정된 기본 길이
///
/// 두 값 모두 0보다 커야 하며, 생성자에서 검증합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    focus: Duration,
    brk: Duration,
}

impl TimerConfig {
    /// 초 단위 길이로 설정을 만듭니다. 어느 하나라도 0이면 `InvalidDuration`.
    pub fn new(focus_seconds: u64, break_seconds: u64) -> Result<Self, TimerError> {
        Ok(Self {
            focus: positive(focus_seconds)?,
            brk: positive(break_seconds)?,
        })
    }

    pub fn duration(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Focus => self.focus,
            Mode::Break => self.brk,
        }
    }

    pub fn focus_seconds(&self) -> u64 {
        self.focus.as_secs()
    }

    pub fn break_seconds(&self) -> u64 {
        self.brk.as_secs()
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus: Duration::from_secs(DEFAULT_FOCUS_SECONDS),
            brk: Duration::from_secs(DEFAULT_BREAK_SECONDS),
        }
    }
}

fn positive(seconds: u64) -> Result<Duration, TimerError> {
    if seconds == 0 {
        return Err(TimerError::InvalidDuration);
    }
    Ok(Duration::from_secs(seconds))
}

/// 한 모드가 끝났을 때 발생하는 "세션 완료" 알림
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    /// 방금 끝난 모드
    pub finished: Mode,
    /// 이어서 대기 상태가 된 모드
    pub next: Mode,
    pub message: &'static str,
}

/// 화면 표시용 타이머 스냅샷
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub mode_label: &'static str,
    pub running: bool,
    /// 남은 시간 (초, 소수점 이하 버림)
    ///
    /// 버림이라 실행 중인 타이머가 마지막 1초 미만 동안 `0`을 보일 수 있습니다.
    /// 완료 여부는 이 값이 아니라 `running`과 `notifications`로 판단해야 합니다.
    pub remaining_seconds: u64,
    /// "MM:SS" 형식 표시 문자열
    pub display: String,
    pub focus_seconds: u64,
    pub break_seconds: u64,
}

/// 사용자 세션 하나에 속한 뽀모도로 타이머
///
/// `started_at`이 `Some`일 때만 실행 중입니다. 실행 여부를 별도 bool로 두지 않아
/// "실행 중 ⇔ 시작 시각 있음" 불변식이 타입 수준에서 유지됩니다.
#[derive(Debug, Clone)]
pub struct TimerSession {
    config: TimerConfig,
    mode: Mode,
    /// 멈춰 있을 때 모드별 남은 시간
    focus_remaining: Duration,
    break_remaining: Duration,
    started_at: Option<Instant>,
}

impl TimerSession {
    /// Idle-Focus 상태로 새 타이머를 만듭니다.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            mode: Mode::Focus,
            focus_remaining: config.duration(Mode::Focus),
            break_remaining: config.duration(Mode::Break),
            started_at: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    fn stored(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Focus => self.focus_remaining,
            Mode::Break => self.break_remaining,
        }
    }

    fn stored_mut(&mut self, mode: Mode) -> &mut Duration {
        match mode {
            Mode::Focus => &mut self.focus_remaining,
            Mode::Break => &mut self.break_remaining,
        }
    }

    /// 타이머를 시작합니다.
    ///
    /// 이미 실행 중이면 시작 시각을 다시 잡지 않고 `AlreadyRunning`을 반환합니다.
    /// (다시 잡으면 아직 반영되지 않은 경과 시간이 사라집니다.)
    pub fn start(&mut self, now: Instant) -> Result<(), TimerError> {
        if self.is_running() {
            return Err(TimerError::AlreadyRunning);
        }
        self.started_at = Some(now);
        Ok(())
    }

    /// 일시정지하고 경과 시간을 현재 모드의 남은 시간에서 뺍니다.
    ///
    /// 반환값은 일시정지 후 남은 시간입니다.
    pub fn pause(&mut self, now: Instant) -> Result<Duration, TimerError> {
        let remaining = self.remaining(now);
        if self.started_at.take().is_none() {
            return Err(TimerError::NotRunning);
        }
        *self.stored_mut(self.mode) = remaining;
        Ok(remaining)
    }

    /// 멈추고 현재 모드의 남은 시간을 설정된 기본값으로 되돌립니다.
    pub fn reset(&mut self) {
        self.started_at = None;
        let full = self.config.duration(self.mode);
        *self.stored_mut(self.mode) = full;
    }

    /// 남은 시간을 계산합니다. 상태를 바꾸지 않습니다.
    pub fn remaining(&self, now: Instant) -> Duration {
        let stored = self.stored(self.mode);
        match self.started_at {
            None => stored,
            // saturating_*: 시계가 started_at보다 앞서 있어도 음수가 되지 않음
            Some(started_at) => stored.saturating_sub(now.saturating_duration_since(started_at)),
        }
    }

    /// 완료 여부를 확인합니다.
    ///
    /// 실행 중이고 남은 시간이 0이면 모드를 넘기고 대기 상태가 되며
    /// `Completion`을 돌려줍니다. 한 번의 완료에 모드 전환은 정확히 한 번입니다.
    pub fn tick(&mut self, now: Instant) -> Option<Completion> {
        if !self.is_running() || !self.remaining(now).is_zero() {
            return None;
        }

        let finished = self.mode;
        let full = self.config.duration(finished);
        *self.stored_mut(finished) = full;
        self.mode = finished.next();
        self.reset();

        Some(Completion {
            finished,
            next: self.mode,
            message: finished.completion_message(),
        })
    }

    /// 집중/휴식 길이를 바꿉니다 (초 단위, `None`은 변경 없음).
    ///
    /// 실행 중에는 거부합니다. 두 값 중 하나라도 0이면 아무것도 바꾸지 않습니다.
    /// 값이 바뀐 모드는 남은 시간도 새 길이로 맞춥니다.
    pub fn configure(
        &mut self,
        focus_seconds: Option<u64>,
        break_seconds: Option<u64>,
    ) -> Result<TimerConfig, TimerError> {
        if self.is_running() {
            return Err(TimerError::ConfigureWhileRunning);
        }

        let focus = focus_seconds.map(positive).transpose()?;
        let brk = break_seconds.map(positive).transpose()?;

        if let Some(focus) = focus {
            if focus != self.config.focus {
                self.config.focus = focus;
                self.focus_remaining = focus;
            }
        }
        if let Some(brk) = brk {
            if brk != self.config.brk {
                self.config.brk = brk;
                self.break_remaining = brk;
            }
        }

        Ok(self.config)
    }

    /// 화면 표시용 스냅샷. 완료 확인(`tick`)은 하지 않으므로 호출자가 먼저 불러야 합니다.
    pub fn snapshot(&self, now: Instant) -> TimerSnapshot {
        let remaining_seconds = self.remaining(now).as_secs();
        TimerSnapshot {
            mode: self.mode,
            mode_label: self.mode.label(),
            running: self.is_running(),
            remaining_seconds,
            display: format_mmss(remaining_seconds),
            focus_seconds: self.config.focus_seconds(),
            break_seconds: self.config.break_seconds(),
        }
    }
}

/// 초를 `MM:SS`로 표시합니다. 60분 이상이면 분 자리가 늘어납니다.
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
