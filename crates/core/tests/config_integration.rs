//! caseflow.toml 통합 설정 테스트
//!
//! - caseflow.toml.example 파싱 테스트
//! - 부분 설정 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 파일 로딩 / 잘못된 형식 에러 테스트

use std::io::Write;

use caseflow_core::config::CaseflowConfig;
use caseflow_core::error::{CaseflowError, ConfigError};

// =============================================================================
// caseflow.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../caseflow.toml.example");
    let config = CaseflowConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert!(config.general.log_file.is_empty());
    assert!(!config.runner.stop_on_failure);
    assert_eq!(config.report.format, "json");
    assert!(config.metrics.enabled);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../caseflow.toml.example");
    let config = CaseflowConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_settings_are_reachable_by_path() {
    let content = include_str!("../../../caseflow.toml.example");
    let config = CaseflowConfig::parse(content).expect("should parse");

    assert_eq!(config.setting_str("sql.username"), Some("sa"));
    assert_eq!(config.setting_str("client.install_dir"), Some("/opt/agent"));
    assert!(config.setting("client.missing").is_none());
    assert!(config.setting("sql.username.deeper").is_none());
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../caseflow.toml.example");
    let example = CaseflowConfig::parse(content).expect("should parse");
    let defaults = CaseflowConfig::default();

    assert_eq!(example.general.log_level, defaults.general.log_level);
    assert_eq!(example.general.log_format, defaults.general.log_format);
    assert_eq!(example.general.log_file, defaults.general.log_file);
    assert_eq!(
        example.runner.stop_on_failure,
        defaults.runner.stop_on_failure
    );
    assert_eq!(example.report.output_dir, defaults.report.output_dir);
    assert_eq!(example.report.format, defaults.report.format);
    assert_eq!(example.metrics.enabled, defaults.metrics.enabled);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_runner_only() {
    let config = CaseflowConfig::parse("[runner]\nstop_on_failure = true").expect("should parse");
    assert!(config.runner.stop_on_failure);
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.report.format, "json");
}

#[test]
fn partial_config_general_field_keeps_other_defaults() {
    let config = CaseflowConfig::parse("[general]\nlog_format = \"json\"").expect("should parse");
    assert_eq!(config.general.log_format, "json");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn empty_string_parses_with_defaults() {
    let config = CaseflowConfig::parse("").expect("empty config should parse");
    assert_eq!(config.general.log_level, "info");
    assert!(config.settings.is_empty());
}

#[test]
fn malformed_toml_returns_parse_error() {
    let err = CaseflowConfig::parse("[general\nlog_level = ").unwrap_err();
    assert!(matches!(
        err,
        CaseflowError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn unsupported_report_format_is_rejected() {
    let config = CaseflowConfig::parse("[report]\nformat = \"html\"").expect("should parse");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("report.format"));
}

// =============================================================================
// 파일 로딩 테스트
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn load_reads_file_and_validates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[general]\nlog_level = \"debug\"\n[settings]\nhost = \"db01\"").unwrap();

    let config = CaseflowConfig::load(file.path()).await.unwrap();
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(config.setting_str("host"), Some("db01"));
}

#[tokio::test]
async fn load_missing_file_returns_file_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = CaseflowConfig::load(dir.path().join("absent.toml"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CaseflowError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn load_invalid_value_returns_invalid_value() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[general]\nlog_level = \"verbose\"").unwrap();

    let err = CaseflowConfig::load(file.path()).await.unwrap_err();
    assert!(matches!(
        err,
        CaseflowError::Config(ConfigError::InvalidValue { .. })
    ));
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn env_override_takes_precedence_over_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[runner]\nstop_on_failure = false").unwrap();

    // SAFETY: serial_test로 환경변수 테스트를 직렬화
    unsafe { std::env::set_var("CASEFLOW_RUNNER_STOP_ON_FAILURE", "true") };
    let result = CaseflowConfig::load(file.path()).await;
    unsafe { std::env::remove_var("CASEFLOW_RUNNER_STOP_ON_FAILURE") };

    assert!(result.unwrap().runner.stop_on_failure);
}

#[tokio::test]
#[serial_test::serial]
async fn env_override_invalid_value_fails_validation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[general]\nlog_format = \"json\"").unwrap();

    // SAFETY: serial_test로 환경변수 테스트를 직렬화
    unsafe { std::env::set_var("CASEFLOW_GENERAL_LOG_FORMAT", "xml") };
    let result = CaseflowConfig::load(file.path()).await;
    unsafe { std::env::remove_var("CASEFLOW_GENERAL_LOG_FORMAT") };

    assert!(result.is_err());
}

#[test]
#[serial_test::serial]
fn env_override_unparseable_bool_keeps_value() {
    let mut config = CaseflowConfig::default();

    // SAFETY: serial_test로 환경변수 테스트를 직렬화
    unsafe { std::env::set_var("CASEFLOW_METRICS_ENABLED", "maybe") };
    config.apply_env_overrides();
    unsafe { std::env::remove_var("CASEFLOW_METRICS_ENABLED") };

    assert!(config.metrics.enabled);
}
