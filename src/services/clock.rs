//! # 시계(Clock) 추상화
//!
//! 타이머는 현재 시각을 직접 읽지 않고 호출자가 넘겨준 `now`로만 계산합니다.
//! 서버는 `SystemClock`을, 테스트는 손으로 시간을 넘기는 `ManualClock`을 씁니다.

use std::sync::Mutex; // 여러 스레드가 공유하는 값을 한 번에 하나씩만 바꾸도록 잠금
use std::time::{Duration, Instant}; // Instant: 벽시계가 아닌 단조 시각. 시스템 시간 변경에 흔들리지 않음

/// 단조 증가(monotonic) 시각을 제공하는 시계
///
/// `Send + Sync`: AppState에 `Arc<dyn Clock>`으로 넣어 여러 핸들러와
/// 백그라운드 틱 태스크가 함께 씁니다.
// trait: "이 타입이 할 수 있는 행동"의 목록. 다른 언어의 interface와 비슷합니다.
// 구현 타입이 달라도 `&dyn Clock`으로 같은 방식으로 부를 수 있습니다.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// 실제 시스템 시계
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// 테스트용 수동 시계. `advance()`를 호출할 때만 시간이 흐릅니다.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        // 다른 스레드가 잠금을 쥔 채 panic해도(poisoned) 안의 값은 그대로 씁니다
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
