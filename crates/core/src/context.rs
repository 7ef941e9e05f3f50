//! 실행 컨텍스트 — 한 번의 실행 동안 러너가 소유하고 각 단계에 빌려주는 상태

use std::sync::Arc;

use tracing::{Span, warn};
use uuid::Uuid;

use crate::config::CaseflowConfig;
use crate::inputs::InputMap;
use crate::types::{RunnerState, TestStatus};

/// 테스트 케이스 실행 컨텍스트
///
/// 설정은 전역 조회 대신 생성 시 주입됩니다. 로그는 러너가 연
/// `testcase{id, name, run_id}` span 아래에서 `tracing` 매크로로 남깁니다.
#[derive(Debug)]
pub struct TestContext {
    id: String,
    name: String,
    run_id: Uuid,
    inputs: InputMap,
    config: Arc<CaseflowConfig>,
    span: Span,
    status: TestStatus,
    result_string: String,
    state: RunnerState,
}

impl TestContext {
    /// 새 컨텍스트를 생성합니다. 상태는 `NotRun`, 러너 상태는 `Created`입니다.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        inputs: InputMap,
        config: Arc<CaseflowConfig>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            run_id: Uuid::new_v4(),
            inputs,
            config,
            span: Span::none(),
            status: TestStatus::NotRun,
            result_string: String::new(),
            state: RunnerState::Created,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 실행마다 새로 발급되는 ID (로그 상관관계용)
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn inputs(&self) -> &InputMap {
        &self.inputs
    }

    pub fn config(&self) -> &CaseflowConfig {
        &self.config
    }

    /// 다른 스레드로 작업을 넘길 때 전파할 span
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn result_string(&self) -> &str {
        &self.result_string
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_failed(&self) -> bool {
        self.status == TestStatus::Failed
    }

    /// 케이스를 실패로 표시하고 진단 메시지를 기록합니다.
    ///
    /// 마지막 호출의 메시지가 남습니다. run 단계가 끝난 뒤(tear down 중)에는
    /// 상태가 고정되어 있으므로 경고만 남기고 무시합니다.
    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if self.is_frozen() {
            warn!(
                state = %self.state,
                reason = reason.as_str(),
                "status is frozen after run phase, ignoring failure"
            );
            return;
        }
        self.status = TestStatus::Failed;
        self.result_string = reason;
    }

    fn is_frozen(&self) -> bool {
        matches!(
            self.state,
            RunnerState::TeardownRunning | RunnerState::Finished
        )
    }

    // --- 러너 전용 ---

    pub(crate) fn attach_span(&mut self, span: Span) {
        self.span = span;
    }

    pub(crate) fn transition(&mut self, next: RunnerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid runner transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
    }

    /// 에러/panic을 실패로 기록합니다. 기존 진단이 있으면 뒤에 덧붙입니다.
    pub(crate) fn record_error(&mut self, message: &str) {
        self.status = TestStatus::Failed;
        if self.result_string.is_empty() {
            self.result_string = message.to_owned();
        } else {
            self.result_string = format!("{}; {}", self.result_string, message);
        }
    }

    pub(crate) fn mark_passed(&mut self) {
        if self.status == TestStatus::NotRun {
            self.status = TestStatus::Passed;
        }
    }
}
