//! 테스트 케이스 러너 — 생명주기 실행과 실패 정규화
//!
//! [`TestCaseRunner::execute`]는 하나의 [`TestCase`]를 `setup → run → tear_down`
//! 순서로 실행하고 항상 [`ExecutionResult`]를 반환합니다. 어떤 단계의 에러나
//! panic도 `execute()` 밖으로 전파되지 않습니다.
//!
//! # 실패 분류
//! - setup 에러/panic, 필수 입력 누락 → `FailureKind::Setup`, run 생략
//! - run 에러/panic, `ctx.fail()` → `FailureKind::Scenario`
//! - tear down 에러/panic → 로그와 `teardown_error`에만 기록, 상태 불변
//! - `info()` panic → 생명주기를 시작하지 않고 FAILED (`not_started`)

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, error, info, info_span, warn};

use crate::case::TestCase;
use crate::config::CaseflowConfig;
use crate::context::TestContext;
use crate::error::{CaseError, CaseflowError};
use crate::inputs::InputMap;
use crate::metrics as names;
use crate::result::ExecutionResult;
use crate::types::{FailureKind, RunnerState, TestStatus};

/// 단계 실행 결과 (에러 또는 panic 메시지)
type PhaseOutcome = Result<(), String>;

/// 테스트 케이스 생명주기 러너
///
/// 공유 리소스를 소유하지 않으며, 여러 스레드에서 동시에 `execute()`를
/// 호출해도 안전합니다. 같은 케이스 인스턴스의 단계는 서로 겹치지 않습니다.
#[derive(Debug, Clone)]
pub struct TestCaseRunner {
    config: Arc<CaseflowConfig>,
}

impl TestCaseRunner {
    /// 주입된 설정으로 러너를 생성합니다.
    pub fn new(config: Arc<CaseflowConfig>) -> Self {
        Self { config }
    }

    /// 러너가 각 컨텍스트에 주입하는 설정
    pub fn config(&self) -> &Arc<CaseflowConfig> {
        &self.config
    }

    /// 케이스 하나를 전체 생명주기로 실행합니다.
    ///
    /// `tear_down()`은 앞 단계 결과와 무관하게 정확히 한 번 호출됩니다.
    pub fn execute(&self, case: &mut dyn TestCase, inputs: InputMap) -> ExecutionResult {
        let info = match contain("info", || case.info().clone()) {
            Ok(info) => info,
            Err(message) => {
                // ID를 알 수 없으므로 호출자가 채움
                error!(error = message.as_str(), "test case metadata unavailable");
                counter!(names::CASES_TOTAL, names::LABEL_STATUS => TestStatus::Failed.as_str())
                    .increment(1);
                return ExecutionResult::not_started("", "", message);
            }
        };
        let mut ctx = TestContext::new(&info.id, &info.name, inputs, Arc::clone(&self.config));
        let span = info_span!(
            "testcase",
            id = %info.id,
            name = %info.name,
            kind = %info.kind,
            run_id = %ctx.run_id()
        );
        ctx.attach_span(span.clone());
        let _entered = span.enter();

        let started = Instant::now();
        let mut states = vec![RunnerState::Created];
        let mut failure = None;

        info!("test case started");

        // ── setup ──
        advance(&mut ctx, &mut states, RunnerState::SetupRunning);
        let setup_outcome = validate_required(&info.required_inputs, ctx.inputs())
            .and_then(|()| guarded("setup", || case.setup(&mut ctx)));

        let setup_ok = match setup_outcome {
            Ok(()) if !ctx.is_failed() => {
                advance(&mut ctx, &mut states, RunnerState::SetupDone);
                true
            }
            Ok(()) => {
                error!(reason = ctx.result_string(), "setup marked test case as failed");
                false
            }
            Err(message) => {
                error!(error = message.as_str(), "setup failed");
                ctx.record_error(&message);
                false
            }
        };

        // ── run ──
        if setup_ok {
            advance(&mut ctx, &mut states, RunnerState::RunRunning);
            match guarded("run", || case.run(&mut ctx)) {
                Ok(()) if !ctx.is_failed() => {
                    ctx.mark_passed();
                    advance(&mut ctx, &mut states, RunnerState::RunDone);
                }
                Ok(()) => {
                    error!(reason = ctx.result_string(), "scenario reported failure");
                    failure = Some(FailureKind::Scenario);
                    advance(&mut ctx, &mut states, RunnerState::RunFailed);
                }
                Err(message) => {
                    error!(error = message.as_str(), "scenario failed");
                    ctx.record_error(&message);
                    failure = Some(FailureKind::Scenario);
                    advance(&mut ctx, &mut states, RunnerState::RunFailed);
                }
            }
        } else {
            failure = Some(FailureKind::Setup);
            advance(&mut ctx, &mut states, RunnerState::SetupFailed);
        }

        // ── tear down ──
        advance(&mut ctx, &mut states, RunnerState::TeardownRunning);
        let teardown_error = match guarded("tear_down", || case.tear_down(&mut ctx)) {
            Ok(()) => None,
            Err(message) => {
                warn!(
                    error = message.as_str(),
                    status = %ctx.status(),
                    "tear down failed, status unchanged"
                );
                counter!(names::TEARDOWN_FAILURES_TOTAL).increment(1);
                Some(message)
            }
        };
        advance(&mut ctx, &mut states, RunnerState::Finished);

        let elapsed = started.elapsed();
        let status = ctx.status();

        counter!(names::CASES_TOTAL, names::LABEL_STATUS => status.as_str()).increment(1);
        histogram!(names::CASE_DURATION_SECONDS).record(elapsed.as_secs_f64());
        if let Some(kind) = failure {
            let label = match kind {
                FailureKind::Setup => "setup",
                FailureKind::Scenario => "scenario",
            };
            counter!(names::CASE_FAILURES_TOTAL, names::LABEL_FAILURE => label).increment(1);
        }

        info!(
            status = %status,
            elapsed_ms = elapsed.as_millis() as u64,
            "test case finished"
        );

        ExecutionResult {
            id: info.id,
            name: info.name,
            run_id: ctx.run_id(),
            status,
            result_string: ctx.result_string().to_owned(),
            elapsed,
            failure,
            teardown_error,
            states,
        }
    }
}

fn advance(ctx: &mut TestContext, states: &mut Vec<RunnerState>, next: RunnerState) {
    debug!(from = %ctx.state(), to = %next, "runner transition");
    ctx.transition(next);
    states.push(next);
}

fn validate_required(required: &[String], inputs: &InputMap) -> PhaseOutcome {
    inputs
        .require(required)
        .map_err(|e: CaseError| CaseflowError::from(e).to_string())
}

/// 단계를 실행하고 에러와 panic을 메시지로 정규화합니다.
fn guarded<F>(phase: &'static str, f: F) -> PhaseOutcome
where
    F: FnOnce() -> Result<(), CaseflowError>,
{
    contain(phase, f).and_then(|outcome| outcome.map_err(|e| e.to_string()))
}

/// panic을 `panicked during <phase>: <payload>` 메시지로 바꿉니다.
pub(crate) fn contain<T, F>(phase: &str, f: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        format!(
            "panicked during {phase}: {}",
            panic_message(payload.as_ref())
        )
    })
}

/// panic payload에서 사람이 읽을 메시지를 꺼냅니다.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
