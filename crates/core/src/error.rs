//! 에러 타입 — 도메인별 에러 정의

/// caseflow 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum CaseflowError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 테스트 케이스 단계 에러
    #[error("{0}")]
    Case(#[from] CaseError),

    /// 시나리오 레지스트리 에러
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// 테스트 세트 에러
    #[error("suite error: {0}")]
    Suite(#[from] SuiteError),

    /// 리포트 출력 에러
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaseflowError {
    /// 시나리오 코드에서 임의의 에러를 실행 실패로 감쌀 때 사용합니다.
    pub fn scenario(reason: impl Into<String>) -> Self {
        CaseError::Scenario(reason.into()).into()
    }

    /// 사전 조건 실패를 setup 에러로 감쌀 때 사용합니다.
    pub fn setup(reason: impl Into<String>) -> Self {
        CaseError::Setup(reason.into()).into()
    }
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 테스트 케이스 단계 에러
///
/// 시나리오는 문자열 비교 대신 이 변형들로 실패 원인을 구분합니다.
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    /// 필수 입력 누락
    #[error("missing required input: {key}")]
    MissingInput { key: String },

    /// 입력 값 타입/형식 오류
    #[error("invalid input '{key}': {reason}")]
    InvalidInput { key: String, reason: String },

    /// 사전 조건 실패
    #[error("setup failed: {0}")]
    Setup(String),

    /// 시나리오 실행 실패
    #[error("scenario failed: {0}")]
    Scenario(String),

    /// 정리 실패
    #[error("tear down failed: {0}")]
    Teardown(String),
}

/// 시나리오 레지스트리 에러
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// 같은 kind가 이미 등록됨
    #[error("scenario kind already registered: {kind}")]
    AlreadyRegistered { kind: String },

    /// 등록되지 않은 kind
    #[error("scenario kind not found: {kind}")]
    NotFound { kind: String },
}

/// 테스트 세트 에러
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    /// 테스트 세트 파일을 찾을 수 없음
    #[error("test set file not found: {path}")]
    FileNotFound { path: String },

    /// 테스트 세트 파싱 실패
    #[error("failed to parse test set: {reason}")]
    ParseFailed { reason: String },

    /// 케이스 ID 중복
    #[error("duplicate test case id: {id}")]
    DuplicateCaseId { id: String },

    /// 케이스 정의 오류
    #[error("invalid test case at index {index}: {reason}")]
    InvalidCase { index: usize, reason: String },
}

/// 리포트 출력 에러
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// 직렬화 실패
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 파일 쓰기 실패
    #[error("failed to write report to {path}: {reason}")]
    Write { path: String, reason: String },
}
