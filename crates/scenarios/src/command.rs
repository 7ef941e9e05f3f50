//! `command` scenario: run a local process and check what it produced.
//!
//! # Inputs
//!
//! | key | type | default |
//! |-----|------|---------|
//! | `command` | string (required) | |
//! | `args` | array of strings | `[]` |
//! | `expect_exit_code` | integer | `0` |
//! | `expect_stdout` | string, substring match | none |
//! | `working_dir` | existing directory | current dir |

use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::Instant;

use caseflow_core::error::CaseError;
use caseflow_core::{CaseInfo, CaseSpec, CaseflowError, TestCase, TestContext};
use tracing::{debug, info};

/// Registry kind name.
pub const KIND: &str = "command";

/// Longest stderr excerpt carried into a failure message.
const STDERR_EXCERPT: usize = 200;

/// Runs one local process per execution.
#[derive(Debug)]
pub struct CommandCase {
    info: CaseInfo,
    plan: Option<CommandPlan>,
}

/// Inputs resolved during setup.
#[derive(Debug, Clone)]
struct CommandPlan {
    program: String,
    args: Vec<String>,
    expect_exit_code: i64,
    expect_stdout: Option<String>,
    working_dir: Option<PathBuf>,
}

impl CommandCase {
    pub fn new(info: CaseInfo) -> Self {
        Self {
            info: info.with_required_inputs(["command"]),
            plan: None,
        }
    }

    /// Registry factory.
    pub fn factory(spec: &CaseSpec) -> Result<Box<dyn TestCase>, CaseflowError> {
        let info = CaseInfo::new(&spec.id, spec.display_name(), &spec.kind);
        Ok(Box::new(Self::new(info)))
    }

    fn plan(&self) -> Result<&CommandPlan, CaseflowError> {
        self.plan
            .as_ref()
            .ok_or_else(|| CaseflowError::scenario("command was not prepared by setup"))
    }
}

impl TestCase for CommandCase {
    fn info(&self) -> &CaseInfo {
        &self.info
    }

    fn setup(&mut self, ctx: &mut TestContext) -> Result<(), CaseflowError> {
        let inputs = ctx.inputs();
        let program = inputs.require_str("command")?.to_owned();
        if program.trim().is_empty() {
            return Err(CaseError::InvalidInput {
                key: "command".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        let working_dir = match inputs.get_str("working_dir")? {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                if !dir.is_dir() {
                    return Err(CaseError::InvalidInput {
                        key: "working_dir".to_owned(),
                        reason: format!("{} is not a directory", dir.display()),
                    }
                    .into());
                }
                Some(dir)
            }
            None => None,
        };

        let plan = CommandPlan {
            program,
            args: inputs.get_str_list("args")?.unwrap_or_default(),
            expect_exit_code: inputs.get_i64("expect_exit_code")?.unwrap_or(0),
            expect_stdout: inputs.get_str("expect_stdout")?.map(str::to_owned),
            working_dir,
        };
        debug!(program = %plan.program, args = ?plan.args, "command prepared");
        self.plan = Some(plan);
        Ok(())
    }

    fn run(&mut self, ctx: &mut TestContext) -> Result<(), CaseflowError> {
        let plan = self.plan()?;

        let mut command = Command::new(&plan.program);
        command.args(&plan.args);
        if let Some(dir) = &plan.working_dir {
            command.current_dir(dir);
        }

        let started = Instant::now();
        let output = command.output().map_err(|e| {
            CaseflowError::scenario(format!("failed to execute '{}': {e}", plan.program))
        })?;
        info!(
            program = %plan.program,
            exit_code = ?output.status.code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );

        if let Some(reason) = check_output(plan, &output) {
            ctx.fail(reason);
        }
        Ok(())
    }

    fn tear_down(&mut self, ctx: &mut TestContext) -> Result<(), CaseflowError> {
        debug!(status = %ctx.status(), "command case done");
        self.plan = None;
        Ok(())
    }
}

/// Returns the failure reason, or `None` when the output matches expectations.
fn check_output(plan: &CommandPlan, output: &Output) -> Option<String> {
    let Some(code) = output.status.code() else {
        return Some(format!("'{}' was terminated by a signal", plan.program));
    };

    if i64::from(code) != plan.expect_exit_code {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let excerpt = excerpt(stderr.trim());
        let mut reason = format!(
            "'{}' exited with code {code}, expected {}",
            plan.program, plan.expect_exit_code
        );
        if !excerpt.is_empty() {
            reason.push_str(&format!(" (stderr: {excerpt})"));
        }
        return Some(reason);
    }

    if let Some(expected) = &plan.expect_stdout {
        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.contains(expected.as_str()) {
            return Some(format!(
                "stdout of '{}' does not contain '{expected}'",
                plan.program
            ));
        }
    }

    None
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(STDERR_EXCERPT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_owned(),
    }
}
