//! # 타이머 API 모델
//!
//! 타이머 상태 자체(`TimerSnapshot`, `Completion`)는 `services::timer`에 있고,
//! 여기에는 HTTP 요청/응답 본문만 둡니다.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::services::timer::{Completion, TimerError, TimerSnapshot};

/// 시간 설정 변경 요청: `PUT /api/v1/timer/settings`
///
/// PATCH처럼 빠진 필드는 그대로 둡니다.
/// 값은 JSON 숫자 그대로 받습니다. `u64`로 받으면 `-5`나 `1.5`가
/// 역직렬화 단계에서 걸러져 `invalid_duration`이 아닌 다른 에러가 됩니다.
#[derive(Debug, Deserialize)]
pub struct UpdateTimerSettingsRequest {
    pub focus_seconds: Option<Number>,
    pub break_seconds: Option<Number>,
}

impl UpdateTimerSettingsRequest {
    /// `(focus, break)` 초 단위 값. 음수나 소수는 `InvalidDuration`입니다.
    ///
    /// 0은 여기서 통과시키고 `TimerSession::configure`가 거부합니다.
    pub fn durations(&self) -> Result<(Option<u64>, Option<u64>), TimerError> {
        Ok((
            whole_seconds(self.focus_seconds.as_ref())?,
            whole_seconds(self.break_seconds.as_ref())?,
        ))
    }
}

fn whole_seconds(value: Option<&Number>) -> Result<Option<u64>, TimerError> {
    value
        .map(|n| n.as_u64().ok_or(TimerError::InvalidDuration))
        .transpose()
}

/// 타이머 엔드포인트 공통 응답
///
/// `notifications`에는 지난 조회 이후 완료된 세션 알림이 오래된 순으로 들어갑니다.
#[derive(Debug, Serialize)]
pub struct TimerView {
    pub timer: TimerSnapshot,
    pub notifications: Vec<Completion>,
}
