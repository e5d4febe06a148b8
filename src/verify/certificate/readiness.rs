// ABOUTME: Interpretation of a Certificate's status conditions.
// ABOUTME: Ready iff the first "Ready" condition has status "True".

use serde_json::Value;

use crate::verify::VerifyError;

/// Issuance state read from a Certificate object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady(String),
}

/// Inspect `status.conditions` of a Certificate object.
///
/// A missing `status` or `conditions` means cert-manager has not reconciled
/// the object yet and is not an error. A present but wrongly shaped
/// conditions list is.
pub fn certificate_readiness(object: &Value) -> Result<Readiness, VerifyError> {
    let status = match object.get("status") {
        None | Some(Value::Null) => return Ok(not_ready("no status reported yet")),
        Some(Value::Object(status)) => status,
        Some(_) => return Err(malformed("status is not an object")),
    };

    let conditions = match status.get("conditions") {
        None | Some(Value::Null) => return Ok(not_ready("no conditions reported yet")),
        Some(Value::Array(conditions)) => conditions,
        Some(_) => return Err(malformed("status.conditions is not a list")),
    };

    for condition in conditions {
        let condition = condition
            .as_object()
            .ok_or_else(|| malformed("condition is not an object"))?;

        let type_ = condition
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("condition has no string type"))?;
        if type_ != "Ready" {
            continue;
        }

        let status = condition
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("Ready condition has no string status"))?;
        if status == "True" {
            return Ok(Readiness::Ready);
        }

        let detail = condition
            .get("message")
            .or_else(|| condition.get("reason"))
            .and_then(Value::as_str)
            .map(|d| format!(": {d}"))
            .unwrap_or_default();
        return Ok(Readiness::NotReady(format!("Ready={status}{detail}")));
    }

    Ok(not_ready("no Ready condition reported yet"))
}

fn not_ready(reason: &str) -> Readiness {
    Readiness::NotReady(reason.to_string())
}

fn malformed(reason: &str) -> VerifyError {
    VerifyError::MalformedStatus(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ready_true_is_ready() {
        let obj = json!({"status": {"conditions": [
            {"type": "Issuing", "status": "False"},
            {"type": "Ready", "status": "True"},
        ]}});
        assert_eq!(certificate_readiness(&obj), Ok(Readiness::Ready));
    }

    #[test]
    fn ready_false_is_not_ready_without_error() {
        let obj = json!({"status": {"conditions": [
            {"type": "Ready", "status": "False", "reason": "Pending"},
        ]}});
        assert_eq!(
            certificate_readiness(&obj),
            Ok(Readiness::NotReady("Ready=False: Pending".to_string()))
        );
    }

    #[test]
    fn unknown_status_is_not_ready() {
        let obj = json!({"status": {"conditions": [{"type": "Ready", "status": "Unknown"}]}});
        assert!(matches!(
            certificate_readiness(&obj),
            Ok(Readiness::NotReady(_))
        ));
    }

    #[test]
    fn only_the_ready_condition_needs_a_status() {
        let obj = json!({"status": {"conditions": [
            {"type": "Issuing"},
            {"type": "Ready", "status": "True"},
        ]}});
        assert_eq!(certificate_readiness(&obj), Ok(Readiness::Ready));
    }

    #[test]
    fn missing_conditions_is_not_ready() {
        assert!(matches!(
            certificate_readiness(&json!({})),
            Ok(Readiness::NotReady(_))
        ));
        assert!(matches!(
            certificate_readiness(&json!({"status": {}})),
            Ok(Readiness::NotReady(_))
        ));
        assert!(matches!(
            certificate_readiness(&json!({"status": {"conditions": []}})),
            Ok(Readiness::NotReady(_))
        ));
    }

    #[test]
    fn wrongly_shaped_conditions_are_malformed() {
        let err = certificate_readiness(&json!({"status": {"conditions": "Ready"}})).unwrap_err();
        assert!(matches!(err, VerifyError::MalformedStatus(_)));

        let err = certificate_readiness(&json!({"status": {"conditions": [{"status": "True"}]}}))
            .unwrap_err();
        assert!(matches!(err, VerifyError::MalformedStatus(_)));

        let err = certificate_readiness(&json!({"status": {"conditions": [{"type": "Ready", "status": true}]}}))
            .unwrap_err();
        assert!(matches!(err, VerifyError::MalformedStatus(_)));
    }
}
