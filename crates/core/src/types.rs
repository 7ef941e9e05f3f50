//! 도메인 타입 — 실행 상태, 러너 상태 머신, 실패 분류

use std::fmt;

use serde::{Deserialize, Serialize};

/// 테스트 케이스 실행 상태
///
/// 러너가 반환하는 결과는 항상 `Passed` 또는 `Failed`입니다.
/// `Skipped`는 테스트 세트에서 실행되지 않은 케이스에만 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    /// 아직 판정되지 않음
    NotRun,
    /// 성공
    Passed,
    /// 실패
    Failed,
    /// 실행하지 않음
    Skipped,
}

impl TestStatus {
    /// 리포트/메트릭 레이블용 문자열
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotRun => "NOT_RUN",
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        }
    }

    /// 최종 판정 여부
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NotRun)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 러너 상태 머신
///
/// 상태 전환:
/// - `Created` → `SetupRunning` → `SetupDone` | `SetupFailed`
/// - `SetupDone` → `RunRunning` → `RunDone` | `RunFailed`
/// - `SetupFailed` | `RunDone` | `RunFailed` → `TeardownRunning` → `Finished`
///
/// `SetupFailed`는 `RunRunning`을 건너뛰지만 `TeardownRunning`은 건너뛰지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunnerState {
    Created,
    SetupRunning,
    SetupDone,
    SetupFailed,
    RunRunning,
    RunDone,
    RunFailed,
    TeardownRunning,
    Finished,
}

impl RunnerState {
    /// 허용된 전환인지 검사합니다.
    pub fn can_transition_to(self, next: RunnerState) -> bool {
        use RunnerState::*;
        matches!(
            (self, next),
            (Created, SetupRunning)
                | (SetupRunning, SetupDone)
                | (SetupRunning, SetupFailed)
                | (SetupDone, RunRunning)
                | (SetupFailed, TeardownRunning)
                | (RunRunning, RunDone)
                | (RunRunning, RunFailed)
                | (RunDone, TeardownRunning)
                | (RunFailed, TeardownRunning)
                | (TeardownRunning, Finished)
        )
    }
}

impl fmt::Display for RunnerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::SetupRunning => "setup_running",
            Self::SetupDone => "setup_done",
            Self::SetupFailed => "setup_failed",
            Self::RunRunning => "run_running",
            Self::RunDone => "run_done",
            Self::RunFailed => "run_failed",
            Self::TeardownRunning => "teardown_running",
            Self::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// 실패가 발생한 단계
///
/// tear down 실패는 결과를 분류하지 않으므로 변형이 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// setup 단계 실패 (run 생략)
    Setup,
    /// run 단계 실패 (명시적 fail 또는 에러/panic)
    Scenario,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "setup"),
            Self::Scenario => write!(f, "scenario"),
        }
    }
}
