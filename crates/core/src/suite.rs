//! 테스트 세트 — 여러 케이스를 순서대로 실행하고 결과를 집계
//!
//! # 테스트 세트 파일 형식 (TOML)
//! ```toml
//! name = "nightly-fs"
//! description = "File system smoke"
//!
//! [inputs]            # 모든 케이스 공통 기본 입력
//! ClientName = "client01"
//!
//! [[cases]]
//! id = "1001"
//! kind = "command"
//! name = "agent binary responds"
//! [cases.inputs]
//! command = "cvd"
//! args = ["--version"]
//!
//! [[cases]]
//! id = "1002"
//! kind = "dir-compare"
//! enabled = false
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::config::CaseflowConfig;
use crate::error::{CaseflowError, ReportError, SuiteError};
use crate::inputs::InputMap;
use crate::metrics as names;
use crate::registry::TestCaseRegistry;
use crate::result::ExecutionResult;
use crate::runner::{TestCaseRunner, contain};
use crate::types::TestStatus;

/// 비활성 케이스의 SKIPPED 사유
pub const REASON_DISABLED: &str = "disabled in test set";

/// stop_on_failure로 건너뛴 케이스의 SKIPPED 사유
pub const REASON_STOPPED: &str = "skipped after earlier failure";

/// 테스트 세트 정의
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteSpec {
    /// 테스트 세트 이름
    pub name: String,
    /// 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 모든 케이스에 적용되는 기본 입력
    #[serde(default)]
    pub inputs: InputMap,
    /// 실행 순서대로 나열된 케이스
    #[serde(default)]
    pub cases: Vec<CaseSpec>,
}

/// 테스트 세트 안의 케이스 정의
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseSpec {
    /// 테스트 케이스 ID (세트 안에서 고유)
    pub id: String,
    /// 시나리오 종류
    pub kind: String,
    /// 표시 이름 (없으면 `<kind>-<id>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 실행 여부
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// 케이스 입력
    #[serde(default)]
    pub inputs: InputMap,
}

fn default_enabled() -> bool {
    true
}

impl CaseSpec {
    /// 표시 이름
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.kind, self.id))
    }
}

impl SuiteSpec {
    /// 테스트 세트 파일을 로드하고 검증합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CaseflowError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CaseflowError::Suite(SuiteError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CaseflowError::Io(e)
            }
        })?;
        let spec = Self::parse(&content)?;
        spec.validate()?;
        Ok(spec)
    }

    /// TOML 문자열에서 테스트 세트를 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, CaseflowError> {
        toml::from_str(toml_str).map_err(|e| {
            CaseflowError::Suite(SuiteError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// ID 중복과 필수 필드를 검증합니다.
    pub fn validate(&self) -> Result<(), CaseflowError> {
        let mut seen = HashSet::new();
        for (index, case) in self.cases.iter().enumerate() {
            if case.id.trim().is_empty() {
                return Err(SuiteError::InvalidCase {
                    index,
                    reason: "id must not be empty".to_owned(),
                }
                .into());
            }
            if case.kind.trim().is_empty() {
                return Err(SuiteError::InvalidCase {
                    index,
                    reason: "kind must not be empty".to_owned(),
                }
                .into());
            }
            if !seen.insert(case.id.as_str()) {
                return Err(SuiteError::DuplicateCaseId {
                    id: case.id.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// 기본 입력 위에 케이스 입력을 얹은 최종 입력
    pub fn inputs_for(&self, case: &CaseSpec) -> InputMap {
        self.inputs.overlay(&case.inputs)
    }
}

/// 상태별 케이스 수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteSummary {
    fn from_results(results: &[ExecutionResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.status {
                TestStatus::Passed => summary.passed += 1,
                TestStatus::Failed => summary.failed += 1,
                TestStatus::Skipped | TestStatus::NotRun => summary.skipped += 1,
            }
        }
        summary
    }
}

/// 테스트 세트 실행 리포트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// 테스트 세트 이름
    pub name: String,
    /// 세트 실행 ID
    pub run_id: Uuid,
    /// 케이스별 결과 (세트 순서)
    pub results: Vec<ExecutionResult>,
    /// 집계
    pub summary: SuiteSummary,
    /// 전체 소요 시간 (초 단위로 직렬화)
    #[serde(rename = "elapsed_secs", with = "crate::result::duration_secs")]
    pub elapsed: Duration,
}

impl SuiteReport {
    /// 실패한 케이스가 없으면 성공
    pub fn is_success(&self) -> bool {
        self.summary.failed == 0
    }

    /// 리포트를 `<dir>/<name>-<run_id>.json`에 기록하고 경로를 반환합니다.
    pub async fn write_json(&self, dir: impl AsRef<Path>) -> Result<PathBuf, CaseflowError> {
        let dir = dir.as_ref();
        let path = dir.join(format!("{}-{}.json", sanitize(&self.name), self.run_id));
        let body = serde_json::to_vec_pretty(self).map_err(ReportError::from)?;

        let write = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, body).await
        };
        write.await.map_err(|e| ReportError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!(path = %path.display(), "suite report written");
        Ok(path)
    }
}

/// 파일 이름에 쓸 수 없는 문자를 `_`로 바꿉니다.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "suite".to_owned()
    } else {
        cleaned
    }
}

/// 테스트 세트 실행기
///
/// 케이스를 한 번에 하나씩 [`TestCaseRunner`]로 실행합니다.
pub struct SuiteRunner<'a> {
    registry: &'a TestCaseRegistry,
    runner: TestCaseRunner,
    stop_on_failure: bool,
}

impl<'a> SuiteRunner<'a> {
    /// 설정의 `runner.stop_on_failure`를 따르는 실행기를 생성합니다.
    pub fn new(registry: &'a TestCaseRegistry, config: Arc<CaseflowConfig>) -> Self {
        let stop_on_failure = config.runner.stop_on_failure;
        Self {
            registry,
            runner: TestCaseRunner::new(config),
            stop_on_failure,
        }
    }

    /// 첫 실패 이후 케이스를 건너뛸지 지정합니다.
    pub fn stop_on_failure(mut self, enabled: bool) -> Self {
        self.stop_on_failure = enabled;
        self
    }

    /// 테스트 세트를 실행합니다. 개별 케이스 실패는 리포트에만 반영됩니다.
    pub fn run(&self, suite: &SuiteSpec) -> SuiteReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("suite", name = %suite.name, run_id = %run_id);
        let _entered = span.enter();

        info!(cases = suite.cases.len(), "test set started");
        let started = Instant::now();
        let mut results = Vec::with_capacity(suite.cases.len());
        let mut halted = false;

        for spec in &suite.cases {
            let name = spec.display_name();

            if !spec.enabled {
                info!(id = %spec.id, "test case disabled, skipping");
                results.push(ExecutionResult::skipped(&spec.id, name, REASON_DISABLED));
                continue;
            }
            if halted {
                warn!(id = %spec.id, "skipping test case after earlier failure");
                results.push(ExecutionResult::skipped(&spec.id, name, REASON_STOPPED));
                continue;
            }

            let created = contain("create", || self.registry.create(spec))
                .and_then(|created| created.map_err(|e| e.to_string()));
            let result = match created {
                Ok(mut case) => {
                    let mut result = self.runner.execute(case.as_mut(), suite.inputs_for(spec));
                    if result.id.is_empty() {
                        result.id = spec.id.clone();
                        result.name = name;
                    }
                    result
                }
                Err(reason) => {
                    error!(id = %spec.id, kind = %spec.kind, error = %reason, "failed to create test case");
                    ExecutionResult::not_started(&spec.id, name, reason)
                }
            };

            if result.is_failed() && self.stop_on_failure {
                halted = true;
            }
            results.push(result);
        }

        let elapsed = started.elapsed();
        let summary = SuiteSummary::from_results(&results);
        let report = SuiteReport {
            name: suite.name.clone(),
            run_id,
            results,
            summary,
            elapsed,
        };

        let label = if report.is_success() { "success" } else { "failure" };
        counter!(names::SUITES_TOTAL, names::LABEL_RESULT => label).increment(1);
        histogram!(names::SUITE_DURATION_SECONDS).record(elapsed.as_secs_f64());

        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "test set finished"
        );
        report
    }
}
