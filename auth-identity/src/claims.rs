// Doctor identifier resolution across historical claim shapes
use serde_json::{Map, Value};

type DoctorIdExtractor = fn(&Map<String, Value>) -> Option<&Value>;

fn top_level_camel(claims: &Map<String, Value>) -> Option<&Value> {
    claims.get("doctorId")
}

fn top_level_snake(claims: &Map<String, Value>) -> Option<&Value> {
    claims.get("doctor_id")
}

fn nested_doctor(claims: &Map<String, Value>) -> Option<&Value> {
    claims.get("doctor")?.get("id")
}

fn nested_profile(claims: &Map<String, Value>) -> Option<&Value> {
    claims.get("profile")?.get("doctorId")
}

/// Claim locations that may carry the doctor identifier, newest shape first.
/// Append new issuer shapes at the end.
const DOCTOR_ID_EXTRACTORS: &[DoctorIdExtractor] = &[
    top_level_camel,
    top_level_snake,
    nested_doctor,
    nested_profile,
];

fn coerce_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Resolve the doctor identifier from a decoded claim map.
pub fn doctor_id_from_claims(claims: &Map<String, Value>) -> Option<String> {
    DOCTOR_ID_EXTRACTORS
        .iter()
        .filter_map(|extract| extract(claims))
        .find_map(coerce_identifier)
}

/// Resolve the doctor identifier from an optional claim payload.
///
/// Returns `None` when the payload is absent, not an object, or carries no
/// usable identifier in any known location.
pub fn resolve_doctor_id(claims: Option<&Value>) -> Option<String> {
    claims
        .and_then(Value::as_object)
        .and_then(doctor_id_from_claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_shapes_resolve_same_id() {
        let shapes = [
            json!({"doctorId": "d-1"}),
            json!({"doctor_id": "d-1"}),
            json!({"doctor": {"id": "d-1"}}),
            json!({"profile": {"doctorId": "d-1"}}),
        ];

        for shape in &shapes {
            assert_eq!(resolve_doctor_id(Some(shape)), Some("d-1".to_string()), "{shape}");
        }
    }

    #[test]
    fn test_absent_input() {
        assert_eq!(resolve_doctor_id(None), None);
        assert_eq!(resolve_doctor_id(Some(&json!({}))), None);
        assert_eq!(resolve_doctor_id(Some(&Value::Null)), None);
        assert_eq!(resolve_doctor_id(Some(&json!("d-1"))), None);
    }

    #[test]
    fn test_first_usable_shape_wins() {
        let claims = json!({
            "doctorId": "top",
            "doctor": {"id": "nested"},
            "profile": {"doctorId": "profile"}
        });
        assert_eq!(resolve_doctor_id(Some(&claims)), Some("top".to_string()));

        let claims = json!({
            "doctorId": "   ",
            "doctor": {"id": null},
            "profile": {"doctorId": "profile"}
        });
        assert_eq!(resolve_doctor_id(Some(&claims)), Some("profile".to_string()));
    }

    #[test]
    fn test_numeric_ids_are_stringified() {
        assert_eq!(
            resolve_doctor_id(Some(&json!({"doctor": {"id": 42}}))),
            Some("42".to_string())
        );
    }

    #[test]
    fn test_non_scalar_ids_are_ignored() {
        let claims = json!({"doctorId": {"value": "d-1"}, "doctor": ["d-2"], "profile": true});
        assert_eq!(resolve_doctor_id(Some(&claims)), None);
    }
}
