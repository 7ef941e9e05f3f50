//! 테스트 케이스 입력 — 시나리오별 키/값 맵
//!
//! 입력 키 집합은 시나리오마다 다르므로 고정 구조체 대신 범용 맵을 사용하고,
//! 각 시나리오가 `setup()`에서 필요한 키를 검증합니다.
//! JSON `null` 값은 누락으로 취급합니다.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CaseError;

/// 시나리오 입력 맵
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputMap {
    values: BTreeMap<String, Value>,
}

impl InputMap {
    /// 빈 입력 맵을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 값을 설정합니다. 기존 값은 덮어씁니다.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// 빌더 형태로 값을 설정합니다.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// 원시 값을 조회합니다. `null`은 `None`으로 취급합니다.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    /// 키 존재 여부 (`null` 제외)
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 문자열 입력을 조회합니다. 타입이 다르면 에러를 반환합니다.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, CaseError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(type_mismatch(key, "string", other)),
        }
    }

    /// 불리언 입력을 조회합니다.
    ///
    /// 설정 파일마다 표기가 달라 `"true"`/`"false"` 문자열도 허용합니다.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, CaseError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(CaseError::InvalidInput {
                    key: key.to_owned(),
                    reason: format!("expected boolean, got string '{s}'"),
                }),
            },
            Some(other) => Err(type_mismatch(key, "boolean", other)),
        }
    }

    /// 정수 입력을 조회합니다. 숫자 문자열도 허용합니다.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, CaseError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| CaseError::InvalidInput {
                key: key.to_owned(),
                reason: format!("expected integer, got {n}"),
            }),
            Some(Value::String(s)) => {
                s.trim()
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| CaseError::InvalidInput {
                        key: key.to_owned(),
                        reason: format!("expected integer, got string '{s}'"),
                    })
            }
            Some(other) => Err(type_mismatch(key, "integer", other)),
        }
    }

    /// 문자열 배열 입력을 조회합니다.
    pub fn get_str_list(&self, key: &str) -> Result<Option<Vec<String>>, CaseError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(type_mismatch(key, "array of strings", other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(type_mismatch(key, "array of strings", other)),
        }
    }

    /// 입력을 `T`로 변환하고, 없거나 `null`이면 `default`를 반환합니다.
    ///
    /// 문자열 표기를 허용하는 `get_bool`/`get_i64`와 달리 타입이 정확히 맞아야 합니다.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, CaseError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => T::deserialize(value).map_err(|e| CaseError::InvalidInput {
                key: key.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    /// 필수 문자열 입력을 조회합니다.
    pub fn require_str(&self, key: &str) -> Result<&str, CaseError> {
        self.get_str(key)?.ok_or_else(|| CaseError::MissingInput {
            key: key.to_owned(),
        })
    }

    /// 모든 필수 키가 존재하는지 검증합니다.
    ///
    /// 첫 번째 누락 키에서 에러를 반환합니다.
    pub fn require<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), CaseError> {
        match keys.iter().find(|key| !self.contains(key.as_ref())) {
            Some(missing) => Err(CaseError::MissingInput {
                key: missing.as_ref().to_owned(),
            }),
            None => Ok(()),
        }
    }

    /// `other`의 값으로 덮어쓴 새 맵을 반환합니다.
    ///
    /// 테스트 세트 기본 입력 위에 케이스 입력을 얹을 때 사용합니다.
    pub fn overlay(&self, other: &InputMap) -> InputMap {
        let mut merged = self.clone();
        for (key, value) in &other.values {
            merged.values.insert(key.clone(), value.clone());
        }
        merged
    }

    /// 입력 개수
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 키 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

impl FromIterator<(String, Value)> for InputMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn type_mismatch(key: &str, expected: &str, actual: &Value) -> CaseError {
    let actual = match actual {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    CaseError::InvalidInput {
        key: key.to_owned(),
        reason: format!("expected {expected}, got {actual}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> InputMap {
        InputMap::new()
            .with("ClientName", "client01")
            .with("use_lookahead", true)
            .with("retries", 3)
            .with("pool_name", Value::Null)
    }

    #[test]
    fn null_counts_as_missing() {
        let inputs = sample();
        assert!(inputs.get("pool_name").is_none());
        assert!(!inputs.contains("pool_name"));
        let err = inputs.require(&["ClientName", "pool_name"]).unwrap_err();
        assert!(matches!(err, CaseError::MissingInput { ref key } if key == "pool_name"));
    }

    #[test]
    fn require_reports_first_missing_key() {
        let inputs = sample();
        inputs.require(&["ClientName", "retries"]).unwrap();
        let err = inputs.require(&["AgentName", "MediaAgent"]).unwrap_err();
        assert_eq!(err.to_string(), "missing required input: AgentName");
    }

    #[test]
    fn typed_getters() {
        let inputs = sample();
        assert_eq!(inputs.get_str("ClientName").unwrap(), Some("client01"));
        assert_eq!(inputs.get_bool("use_lookahead").unwrap(), Some(true));
        assert_eq!(inputs.get_i64("retries").unwrap(), Some(3));
        assert_eq!(inputs.get_str("absent").unwrap(), None);
    }

    #[test]
    fn string_forms_of_bool_and_int_are_accepted() {
        let inputs = InputMap::new().with("flag", "False").with("count", " 42 ");
        assert_eq!(inputs.get_bool("flag").unwrap(), Some(false));
        assert_eq!(inputs.get_i64("count").unwrap(), Some(42));
    }

    #[test]
    fn type_mismatch_is_invalid_input() {
        let inputs = sample();
        let err = inputs.get_str("retries").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input 'retries': expected string, got number"
        );
        assert!(inputs.get_i64("ClientName").is_err());
    }

    #[test]
    fn string_list() {
        let inputs = InputMap::new()
            .with("args", json!(["-c", "echo hi"]))
            .with("bad", json!(["ok", 1]));
        assert_eq!(
            inputs.get_str_list("args").unwrap(),
            Some(vec!["-c".to_owned(), "echo hi".to_owned()])
        );
        assert!(inputs.get_str_list("bad").is_err());
    }

    #[test]
    fn get_or_falls_back_for_missing_and_null() {
        let inputs = sample();
        assert_eq!(inputs.get_or("retries", 0_u32).unwrap(), 3);
        assert_eq!(inputs.get_or("timeout_secs", 30_u64).unwrap(), 30);
        assert_eq!(
            inputs.get_or("pool_name", "default".to_owned()).unwrap(),
            "default"
        );
        assert_eq!(
            inputs.get_or("ClientName", String::new()).unwrap(),
            "client01"
        );
    }

    #[test]
    fn get_or_rejects_wrong_type() {
        let err = sample().get_or("ClientName", false).unwrap_err();
        assert!(matches!(err, CaseError::InvalidInput { ref key, .. } if key == "ClientName"));
    }

    #[test]
    fn overlay_prefers_case_values() {
        let defaults = InputMap::new().with("ClientName", "default").with("AgentName", "File System");
        let case = InputMap::new().with("ClientName", "override");
        let merged = defaults.overlay(&case);
        assert_eq!(merged.get_str("ClientName").unwrap(), Some("override"));
        assert_eq!(merged.get_str("AgentName").unwrap(), Some("File System"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn deserializes_from_toml_table() {
        let inputs: InputMap = toml::from_str(
            r#"
command = "true"
args = ["a", "b"]
expect_exit_code = 0
"#,
        )
        .unwrap();
        assert_eq!(inputs.require_str("command").unwrap(), "true");
        assert_eq!(inputs.get_i64("expect_exit_code").unwrap(), Some(0));
    }
}
