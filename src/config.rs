//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `DATABASE_URL`: SQLite 주소 (기본값 `sqlite::memory:`, 재시작하면 모두 사라짐)
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `FOCUS_SECONDS`, `BREAK_SECONDS`: 새 세션의 집중/휴식 기본 길이 (초)
//! - `TICK_INTERVAL_MS`: 서버가 타이머 완료를 확인하는 주기 (밀리초)
//! - `FRONTEND_DIST`: 빌드된 프론트엔드 디렉토리

// std::env: Rust 표준 라이브러리의 환경변수 모듈
use std::env;
use std::time::Duration; // 틱 주기 (밀리초 → Duration)

use thiserror::Error;

use crate::services::timer::{TimerConfig, DEFAULT_BREAK_SECONDS, DEFAULT_FOCUS_SECONDS};

/// 설정 로딩 실패
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

// #[derive(...)]: 자동으로 트레이트 구현을 생성하는 derive 매크로
// - Debug: {:?} 포맷으로 출력 가능
// - Clone: .clone()으로 복제 가능. main.rs에서 필드 일부를 AppState로 넘길 때 씁니다.

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    /// u16: 0~65535 범위의 부호 없는 정수. 포트 번호에 딱 맞는 타입입니다.
    pub port: u16,
    /// 새 타이머 세션의 기본 길이
    pub timer: TimerConfig,
    pub tick_interval: Duration,
    pub frontend_dist: String,
}

// impl 블록: Config 타입에 연관 함수/메서드를 붙입니다.
// self 인자가 없는 from_env는 `Config::from_env()`로 부르는 연관 함수(생성자 역할)입니다.
impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `JWT_SECRET`이 없거나, 숫자 항목이 숫자가 아니거나, 타이머 길이가 0이면 에러입니다.
    /// 나머지는 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let focus_seconds = parse_var("FOCUS_SECONDS", DEFAULT_FOCUS_SECONDS)?;
        let break_seconds = parse_var("BREAK_SECONDS", DEFAULT_BREAK_SECONDS)?;
        let timer = TimerConfig::new(focus_seconds, break_seconds).map_err(|_| {
            ConfigError::Invalid {
                name: "FOCUS_SECONDS/BREAK_SECONDS",
                value: format!("{}/{}", focus_seconds, break_seconds),
            }
        })?;

        let tick_ms: u64 = parse_var("TICK_INTERVAL_MS", 500)?;
        if tick_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "TICK_INTERVAL_MS",
                value: tick_ms.to_string(),
            });
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite::memory:".to_string()),
            jwt_secret,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 3000)?,
            timer,
            tick_interval: Duration::from_millis(tick_ms),
            frontend_dist: env::var("FRONTEND_DIST")
                .unwrap_or_else(|_| "frontend/dist".to_string()),
        })
    }
}

/// 숫자 환경변수를 읽습니다. 없으면 기본값, 있는데 숫자가 아니면 에러.
///
/// `T: FromStr`: `.parse()`로 문자열에서 만들 수 있는 타입이면 무엇이든 (u16, u64 ...)
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
