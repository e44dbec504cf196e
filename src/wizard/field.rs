use super::error::WizardError;
use crate::catalog::{FieldKind, FieldSpec, FieldValidator, InspectorRule, StepSpec};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

/// 값이 비어 있는 것으로 취급되는지 판별한다.
///
/// Select 필드에서 placeholder 문구와 동일한 값은 선택하지 않은 것으로
/// 간주한다.
pub fn is_empty_value(field: &FieldSpec, value: Option<&Value>) -> bool {
    let Some(value) = value else {
        return true;
    };
    match value {
        Value::Null => true,
        Value::String(text) => {
            if text.trim().is_empty() {
                return true;
            }
            field.placeholder().is_some_and(|ph| ph == text.as_str())
        }
        _ => false,
    }
}

/// 단일 필드 값을 검증한다. 필수 검사 후 선언된 규칙을 순서대로 적용한다.
pub fn validate_field(field: &FieldSpec, value: Option<&Value>) -> Result<(), WizardError> {
    if is_empty_value(field, value) {
        if field.required {
            return Err(WizardError::RequiredField {
                label: field.label.clone(),
            });
        }
        return Ok(());
    }
    let text = match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    for validator in &field.validators {
        match validator {
            FieldValidator::MinLength { min } => {
                if text.chars().count() < *min {
                    return Err(WizardError::Validation {
                        field: field.key.clone(),
                        message: format!("{}은(는) 최소 {min}자 이상이어야 합니다.", field.label),
                    });
                }
            }
            FieldValidator::Pattern { pattern, message } => {
                let re = Regex::new(pattern).map_err(|err| WizardError::Validation {
                    field: field.key.clone(),
                    message: format!("검증 패턴이 잘못되었습니다: {err}"),
                })?;
                if !re.is_match(&text) {
                    return Err(WizardError::Validation {
                        field: field.key.clone(),
                        message: message.clone(),
                    });
                }
            }
        }
    }
    if let FieldKind::Number = field.kind {
        let numeric = matches!(value, Some(Value::Number(_)))
            || text.trim().parse::<f64>().is_ok();
        if !numeric {
            return Err(WizardError::Validation {
                field: field.key.clone(),
                message: format!("{}은(는) 숫자여야 합니다.", field.label),
            });
        }
    }
    Ok(())
}

/// 구성 단계 전체를 검증한다. 첫 실패에서 중단하고 그 메시지를 돌려준다.
pub fn validate_configure(
    spec: &StepSpec,
    values: &BTreeMap<String, Value>,
) -> Result<(), WizardError> {
    for field in spec.configure_fields() {
        validate_field(field, values.get(&field.key))?;
    }
    if let Some(inspector) = &spec.inspector {
        if let Some(InspectorRule::RequireAny { keys, message }) = &inspector.validation {
            let satisfied = keys.iter().any(|key| {
                let field = spec.fields.iter().find(|f| &f.key == key);
                match field {
                    Some(field) => !is_empty_value(field, values.get(key)),
                    None => false,
                }
            });
            if !satisfied {
                return Err(WizardError::Validation {
                    field: keys.join(","),
                    message: message.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;
    use serde_json::json;

    /// placeholder 문구가 선택된 Select 값은 빈 값으로 취급되는지 확인한다.
    #[test]
    fn placeholder_selection_counts_as_empty() {
        let spec = catalog().get("sendMessage");
        let chat = spec
            .fields
            .iter()
            .find(|f| f.key == "chat_id")
            .expect("chat_id 필드가 없습니다.");
        assert!(is_empty_value(chat, Some(&json!("채팅을 선택하세요..."))));
        assert!(!is_empty_value(chat, Some(&json!("general"))));
    }

    /// 필수 필드 누락이 구성 검증을 막는지 확인한다.
    #[test]
    fn missing_required_field_blocks_configure() {
        let spec = catalog().get("sendMessage");
        let mut values = BTreeMap::new();
        values.insert("chat_id".to_string(), json!("general"));
        let err = validate_configure(spec, &values).expect_err("검증이 통과하면 안 됩니다.");
        assert!(matches!(err, WizardError::RequiredField { .. }));
        values.insert("message".to_string(), json!("배포 완료"));
        validate_configure(spec, &values).expect("모든 필수 값이 있으면 통과해야 합니다.");
    }

    /// 패턴 검증 실패 시 선언된 메시지가 그대로 노출되는지 확인한다.
    #[test]
    fn pattern_validator_surfaces_declared_message() {
        let spec = catalog().get("httpRequest");
        let mut values = BTreeMap::new();
        values.insert("url".to_string(), json!("ftp://example.com"));
        values.insert("method".to_string(), json!("GET"));
        let err = validate_configure(spec, &values).expect_err("URL 패턴 검증이 실패해야 합니다.");
        match err {
            WizardError::Validation { field, message } => {
                assert_eq!(field, "url");
                assert!(message.contains("http://"));
            }
            other => panic!("예상치 못한 오류: {other}"),
        }
    }

    /// 교차 필드 규칙(RequireAny)이 동작하는지 확인한다.
    #[test]
    fn require_any_rule_blocks_until_one_key_present() {
        let spec = catalog().get("productLookup");
        let values = BTreeMap::new();
        let err = validate_configure(spec, &values).expect_err("둘 다 비면 실패해야 합니다.");
        assert!(matches!(err, WizardError::Validation { .. }));
        let mut values = BTreeMap::new();
        values.insert("product_code".to_string(), json!("SKU-100"));
        validate_configure(spec, &values).expect("코드만 있어도 통과해야 합니다.");
    }

    /// 숫자 필드에 숫자가 아닌 값이 오면 거부되는지 확인한다.
    #[test]
    fn number_field_rejects_non_numeric_text() {
        let spec = catalog().get("delay");
        let mut values = BTreeMap::new();
        values.insert("seconds".to_string(), json!("많이"));
        assert!(validate_configure(spec, &values).is_err());
        values.insert("seconds".to_string(), json!(30));
        validate_configure(spec, &values).expect("숫자 값은 통과해야 합니다.");
    }
}
