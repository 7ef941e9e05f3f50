#![doc = include_str!("../README.md")]

pub mod case;
pub mod config;
pub mod context;
pub mod error;
pub mod inputs;
pub mod metrics;
pub mod registry;
pub mod result;
pub mod runner;
pub mod suite;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{CaseError, CaseflowError, ConfigError, RegistryError, ReportError, SuiteError};

// 설정
pub use config::CaseflowConfig;

// 테스트 케이스 계약
pub use case::{CaseInfo, TestCase};
pub use context::TestContext;
pub use inputs::InputMap;

// 실행
pub use registry::{CaseFactory, ScenarioEntry, TestCaseRegistry};
pub use result::ExecutionResult;
pub use runner::TestCaseRunner;
pub use suite::{CaseSpec, SuiteReport, SuiteRunner, SuiteSpec, SuiteSummary};

// 도메인 타입
pub use types::{FailureKind, RunnerState, TestStatus};
