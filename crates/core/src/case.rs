//! 테스트 케이스 trait — 시나리오 생명주기 계약
//!
//! 모든 시나리오는 [`TestCase`]를 구현하고, [`TestCaseRunner`](crate::runner::TestCaseRunner)가
//! 단계를 순서대로 호출합니다.
//!
//! # 생명주기
//! ```text
//! setup() → run() → tear_down()
//! ```
//! `tear_down()`은 앞 단계의 성공 여부와 관계없이 정확히 한 번 호출됩니다.

use serde::{Deserialize, Serialize};

use crate::context::TestContext;
use crate::error::CaseflowError;

/// 테스트 케이스 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInfo {
    /// 테스트 케이스 고유 ID (예: `"45204"`)
    pub id: String,
    /// 사람이 읽는 이름
    pub name: String,
    /// 시나리오 종류 (레지스트리 키)
    pub kind: String,
    /// 실행 전에 반드시 존재해야 하는 입력 키
    #[serde(default)]
    pub required_inputs: Vec<String>,
}

impl CaseInfo {
    /// 필수 입력이 없는 메타데이터를 생성합니다.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            required_inputs: Vec::new(),
        }
    }

    /// 필수 입력 키를 지정합니다.
    pub fn with_required_inputs<S: Into<String>>(
        mut self,
        keys: impl IntoIterator<Item = S>,
    ) -> Self {
        self.required_inputs = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// 모든 시나리오가 구현하는 생명주기 trait
///
/// 각 단계는 블로킹 호출입니다. 외부 작업(백업 잡 폴링 등)을 기다리는 것은
/// 시나리오 내부의 책임이며, 러너는 타임아웃을 강제하지 않습니다.
///
/// 실패 보고 방법:
/// - 도메인 검증 실패: `ctx.fail(reason)` 후 `Ok(())` 반환
/// - 진행 불가능한 오류: `Err(..)` 반환 (러너가 분류)
///
/// # 구현 예시
/// ```ignore
/// struct Restore { info: CaseInfo }
///
/// impl TestCase for Restore {
///     fn info(&self) -> &CaseInfo { &self.info }
///
///     fn run(&mut self, ctx: &mut TestContext) -> Result<(), CaseflowError> {
///         if !restored_matches_source()? {
///             ctx.fail("restored data does not match source");
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait TestCase: Send {
    /// 메타데이터를 반환합니다.
    fn info(&self) -> &CaseInfo;

    /// 외부 리소스(세션, 헬퍼, 연결)를 준비하고 입력을 검증합니다.
    ///
    /// 에러를 반환하면 `run()`은 생략됩니다.
    fn setup(&mut self, _ctx: &mut TestContext) -> Result<(), CaseflowError> {
        Ok(())
    }

    /// 시나리오 본문을 실행합니다.
    fn run(&mut self, ctx: &mut TestContext) -> Result<(), CaseflowError>;

    /// 리소스를 정리합니다 (best-effort).
    ///
    /// 에러는 로그로만 남고 최종 상태를 바꾸지 않습니다.
    /// `ctx.status()`로 성공 시에만 정리하는 패턴을 구현할 수 있습니다.
    fn tear_down(&mut self, _ctx: &mut TestContext) -> Result<(), CaseflowError> {
        Ok(())
    }
}
