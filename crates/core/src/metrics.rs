//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 러너와 테스트 세트 실행기는 이 상수로 `metrics::counter!()`,
//! `metrics::histogram!()` 매크로를 호출합니다. 레코더(exporter) 설치는
//! 바이너리의 몫이며, 설치되지 않으면 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `caseflow_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

use metrics::{Unit, describe_counter, describe_histogram};

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 실행 상태 레이블 키 (PASSED, FAILED, SKIPPED)
pub const LABEL_STATUS: &str = "status";

/// 실패 단계 레이블 키 (setup, scenario)
pub const LABEL_FAILURE: &str = "failure";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── 러너 메트릭 ────────────────────────────────────────────────────

/// 실행된 테스트 케이스 수 (counter, label: status)
pub const CASES_TOTAL: &str = "caseflow_cases_total";

/// 실패한 테스트 케이스 수 (counter, label: failure)
pub const CASE_FAILURES_TOTAL: &str = "caseflow_case_failures_total";

/// 테스트 케이스 실행 시간 (histogram, 초)
pub const CASE_DURATION_SECONDS: &str = "caseflow_case_duration_seconds";

/// tear down 실패 수 (counter)
pub const TEARDOWN_FAILURES_TOTAL: &str = "caseflow_teardown_failures_total";

// ─── 테스트 세트 메트릭 ─────────────────────────────────────────────

/// 실행된 테스트 세트 수 (counter, label: result)
pub const SUITES_TOTAL: &str = "caseflow_suites_total";

/// 테스트 세트 실행 시간 (histogram, 초)
pub const SUITE_DURATION_SECONDS: &str = "caseflow_suite_duration_seconds";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    describe_counter!(CASES_TOTAL, "Total number of executed test cases");
    describe_counter!(
        CASE_FAILURES_TOTAL,
        "Total number of failed test cases by failing phase"
    );
    describe_histogram!(
        CASE_DURATION_SECONDS,
        Unit::Seconds,
        "Wall time of a single test case lifecycle"
    );
    describe_counter!(
        TEARDOWN_FAILURES_TOTAL,
        "Total number of tear down failures (status unaffected)"
    );
    describe_counter!(SUITES_TOTAL, "Total number of executed test sets");
    describe_histogram!(
        SUITE_DURATION_SECONDS,
        Unit::Seconds,
        "Wall time of a whole test set run"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_use_prefix_and_suffix() {
        for name in [
            CASES_TOTAL,
            CASE_FAILURES_TOTAL,
            TEARDOWN_FAILURES_TOTAL,
            SUITES_TOTAL,
        ] {
            assert!(name.starts_with("caseflow_"), "{name}");
            assert!(name.ends_with("_total"), "{name}");
        }
        for name in [CASE_DURATION_SECONDS, SUITE_DURATION_SECONDS] {
            assert!(name.starts_with("caseflow_"), "{name}");
            assert!(name.ends_with("_seconds"), "{name}");
        }
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        describe_all();
    }
}
