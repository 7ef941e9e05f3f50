//! 시나리오 레지스트리 — kind 이름으로 테스트 케이스 인스턴스 생성
//!
//! 테스트 세트 파일은 시나리오를 `kind`로 지정합니다.
//! [`TestCaseRegistry`]는 kind별 팩토리를 등록 순서대로 보관하고,
//! [`CaseSpec`]으로부터 실행할 [`TestCase`] 인스턴스를 만듭니다.

use std::fmt;

use crate::case::TestCase;
use crate::error::{CaseflowError, RegistryError};
use crate::suite::CaseSpec;

/// 테스트 케이스 팩토리
pub type CaseFactory =
    Box<dyn Fn(&CaseSpec) -> Result<Box<dyn TestCase>, CaseflowError> + Send + Sync>;

/// 등록된 시나리오 정보
pub struct ScenarioEntry {
    kind: String,
    description: String,
    factory: CaseFactory,
}

impl ScenarioEntry {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for ScenarioEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioEntry")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// 시나리오 레지스트리
///
/// # 사용 예시
/// ```ignore
/// let mut registry = TestCaseRegistry::new();
/// registry.register("command", "Run a local command", |spec| {
///     Ok(Box::new(CommandCase::from_spec(spec)) as Box<dyn TestCase>)
/// })?;
///
/// let mut case = registry.create(&spec)?;
/// let result = runner.execute(case.as_mut(), spec.inputs.clone());
/// ```
#[derive(Debug, Default)]
pub struct TestCaseRegistry {
    entries: Vec<ScenarioEntry>,
}

impl TestCaseRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 시나리오 팩토리를 등록합니다.
    ///
    /// 동일한 kind가 이미 등록되어 있으면 에러를 반환합니다.
    pub fn register<F>(
        &mut self,
        kind: impl Into<String>,
        description: impl Into<String>,
        factory: F,
    ) -> Result<(), CaseflowError>
    where
        F: Fn(&CaseSpec) -> Result<Box<dyn TestCase>, CaseflowError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if self.contains(&kind) {
            return Err(RegistryError::AlreadyRegistered { kind }.into());
        }
        self.entries.push(ScenarioEntry {
            kind,
            description: description.into(),
            factory: Box::new(factory),
        });
        Ok(())
    }

    /// 시나리오를 해제합니다.
    pub fn unregister(&mut self, kind: &str) -> Result<ScenarioEntry, CaseflowError> {
        match self.entries.iter().position(|e| e.kind == kind) {
            Some(idx) => Ok(self.entries.remove(idx)),
            None => Err(RegistryError::NotFound {
                kind: kind.to_owned(),
            }
            .into()),
        }
    }

    /// 등록 여부
    pub fn contains(&self, kind: &str) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// kind로 등록 정보를 조회합니다.
    pub fn get(&self, kind: &str) -> Option<&ScenarioEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// 케이스 정의로부터 인스턴스를 생성합니다.
    ///
    /// 등록되지 않은 kind면 `RegistryError::NotFound`, 팩토리 에러는 그대로 전달합니다.
    pub fn create(&self, spec: &CaseSpec) -> Result<Box<dyn TestCase>, CaseflowError> {
        let entry = self.get(&spec.kind).ok_or_else(|| RegistryError::NotFound {
            kind: spec.kind.clone(),
        })?;
        (entry.factory)(spec)
    }

    /// 등록된 시나리오 수
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// 등록 순서대로 모든 시나리오 정보를 반환합니다.
    pub fn list(&self) -> Vec<&ScenarioEntry> {
        self.entries.iter().collect()
    }

    /// 등록 순서대로 kind 목록을 반환합니다.
    pub fn kinds(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.kind.as_str()).collect()
    }
}
