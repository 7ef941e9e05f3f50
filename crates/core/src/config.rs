//! 설정 관리 — caseflow.toml 파싱 및 런타임 설정
//!
//! [`CaseflowConfig`]는 러너, 리포트, 로깅, 시나리오 설정을 담는 최상위 구조체입니다.
//! 전역 싱글턴이 아니며, 호출자가 로드한 뒤 `Arc`로 각 실행 컨텍스트에 주입합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`CASEFLOW_RUNNER_STOP_ON_FAILURE=true` 형식)
//! 3. 설정 파일 (`caseflow.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), caseflow_core::error::CaseflowError> {
//! use caseflow_core::config::CaseflowConfig;
//!
//! let config = CaseflowConfig::load("caseflow.toml").await?;
//!
//! let config = CaseflowConfig::parse("[general]\nlog_level = \"debug\"")?;
//! let user = config.setting("sql.username");
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CaseflowError, ConfigError};

/// caseflow 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseflowConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 러너 설정
    #[serde(default)]
    pub runner: RunnerConfig,
    /// 리포트 설정
    #[serde(default)]
    pub report: ReportConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// 시나리오가 참조하는 자유 형식 설정 트리
    #[serde(default)]
    pub settings: toml::Table,
}

impl CaseflowConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CaseflowError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, CaseflowError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CaseflowError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CaseflowError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, CaseflowError> {
        toml::from_str(toml_str).map_err(|e| {
            CaseflowError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `CASEFLOW_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "CASEFLOW_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "CASEFLOW_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.log_file, "CASEFLOW_GENERAL_LOG_FILE");

        override_bool(
            &mut self.runner.stop_on_failure,
            "CASEFLOW_RUNNER_STOP_ON_FAILURE",
        );

        override_string(&mut self.report.output_dir, "CASEFLOW_REPORT_OUTPUT_DIR");
        override_string(&mut self.report.format, "CASEFLOW_REPORT_FORMAT");

        override_bool(&mut self.metrics.enabled, "CASEFLOW_METRICS_ENABLED");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), CaseflowError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 현재 리포트 파일은 JSON만 지원
        if self.report.format != "json" {
            return Err(ConfigError::InvalidValue {
                field: "report.format".to_owned(),
                reason: "must be one of: json".to_owned(),
            }
            .into());
        }

        Ok(())
    }

    /// 점(`.`)으로 구분된 경로로 `[settings]` 값을 조회합니다.
    ///
    /// 예: `setting("sql.username")` → `[settings.sql] username = ...`
    pub fn setting(&self, path: &str) -> Option<&toml::Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.settings.get(first)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        Some(current)
    }

    /// 문자열 설정값을 조회합니다.
    pub fn setting_str(&self, path: &str) -> Option<&str> {
        self.setting(path).and_then(toml::Value::as_str)
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// 로그 파일 경로 (빈 문자열이면 파일 기록 안 함)
    pub log_file: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
            log_file: String::new(),
        }
    }
}

/// 러너 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// 첫 실패 이후 남은 케이스를 건너뛸지 여부
    pub stop_on_failure: bool,
}

/// 리포트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 리포트 파일 디렉토리 (빈 문자열이면 파일 출력 안 함)
    pub output_dir: String,
    /// 리포트 파일 형식 (json)
    pub format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: String::new(),
            format: "json".to_owned(),
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 메트릭 설명 등록 여부
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}
