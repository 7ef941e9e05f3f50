//! 실행 결과 — 한 번의 실행마다 한 번 생성되어 리포트 계층으로 전달됩니다.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{FailureKind, RunnerState, TestStatus};

/// 단일 테스트 케이스 실행 결과
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// 테스트 케이스 ID
    pub id: String,
    /// 테스트 케이스 이름
    pub name: String,
    /// 실행 ID
    pub run_id: Uuid,
    /// 최종 상태
    pub status: TestStatus,
    /// 진단 메시지 (성공 시 비어 있음)
    pub result_string: String,
    /// 전체 소요 시간 (초 단위로 직렬화)
    #[serde(rename = "elapsed_secs", with = "duration_secs")]
    pub elapsed: Duration,
    /// 실패 단계
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    /// tear down 에러 (상태에는 영향 없음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown_error: Option<String>,
    /// 거쳐 간 러너 상태
    #[serde(default)]
    pub states: Vec<RunnerState>,
}

impl ExecutionResult {
    /// 실행되지 않은 케이스의 결과를 생성합니다.
    pub fn skipped(id: impl Into<String>, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            run_id: Uuid::new_v4(),
            status: TestStatus::Skipped,
            result_string: reason.into(),
            elapsed: Duration::ZERO,
            failure: None,
            teardown_error: None,
            states: Vec::new(),
        }
    }

    /// 케이스 인스턴스를 만들지 못해 생명주기를 시작하지 못한 결과를 생성합니다.
    pub fn not_started(id: impl Into<String>, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Failed,
            failure: Some(FailureKind::Setup),
            ..Self::skipped(id, name, reason)
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    pub fn is_failed(&self) -> bool {
        self.status == TestStatus::Failed
    }

    /// 리포트 표의 Summary 열 값. 비어 있으면 `--`.
    pub fn summary(&self) -> &str {
        if self.result_string.is_empty() {
            "--"
        } else {
            &self.result_string
        }
    }
}

pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
