use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::claims::doctor_id_from_claims;
use crate::error::{IdentityError, Result};
use crate::roles::{normalize_role, normalize_roles, Role};

/// Verified identity of the caller for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthContext {
    pub subject_id: String,
    /// Primary role, from the `role` claim or the first usable `roles` entry
    pub role: Role,
    /// Every role the credential carries, primary role included
    pub roles: BTreeSet<Role>,
    pub doctor_id: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub raw_claims: Map<String, Value>,
}

impl AuthContext {
    /// Build a context from claims whose signature and expiry were already
    /// verified.
    pub fn from_claims(claims: Map<String, Value>) -> Result<Self> {
        let subject_id = claims
            .get("sub")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|sub| !sub.is_empty())
            .map(str::to_string)
            .ok_or_else(|| IdentityError::MissingClaim("sub".to_string()))?;

        let role = claims
            .get("role")
            .and_then(normalize_role)
            .or_else(|| first_listed_role(&claims))
            .ok_or_else(|| IdentityError::MissingClaim("role".to_string()))?;

        let mut roles = claims.get("roles").map(normalize_roles).unwrap_or_default();
        roles.insert(role.clone());

        let expires_at = claims
            .get("exp")
            .and_then(timestamp)
            .ok_or_else(|| IdentityError::MissingClaim("exp".to_string()))?;
        let issued_at = claims.get("iat").and_then(timestamp);

        Ok(Self {
            subject_id,
            role,
            roles,
            doctor_id: doctor_id_from_claims(&claims),
            issued_at,
            expires_at,
            raw_claims: claims,
        })
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&Role::Admin)
    }

    pub fn is_doctor(&self) -> bool {
        self.has_role(&Role::Doctor)
    }

    /// Whether the caller is the doctor identified by `doctor_id`.
    pub fn owns_doctor_record(&self, doctor_id: &str) -> bool {
        self.is_doctor() && self.doctor_id.as_deref() == Some(doctor_id.trim())
    }

    /// Raw claim lookup for policy checks that need more than role and
    /// doctor id.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.raw_claims.get(name)
    }
}

fn first_listed_role(claims: &Map<String, Value>) -> Option<Role> {
    claims
        .get("roles")?
        .as_array()?
        .iter()
        .find_map(normalize_role)
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.as_i64()?, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_from_claims_full_shape() {
        let ctx = AuthContext::from_claims(claims(json!({
            "sub": "user-7",
            "role": "medico",
            "roles": ["MÉDICO", "admin"],
            "doctor": {"id": "d-1"},
            "iat": 1_700_000_000,
            "exp": 1_700_003_600
        })))
        .unwrap();

        assert_eq!(ctx.subject_id, "user-7");
        assert_eq!(ctx.role, Role::Doctor);
        assert_eq!(ctx.roles, BTreeSet::from([Role::Admin, Role::Doctor]));
        assert_eq!(ctx.doctor_id.as_deref(), Some("d-1"));
        assert_eq!(ctx.expires_at.timestamp(), 1_700_003_600);
        assert_eq!(ctx.issued_at.map(|t| t.timestamp()), Some(1_700_000_000));
        assert!(ctx.owns_doctor_record("d-1"));
        assert!(!ctx.owns_doctor_record("d-2"));
        assert!(ctx.is_admin());
    }

    #[test]
    fn test_role_falls_back_to_roles_list() {
        let ctx = AuthContext::from_claims(claims(json!({
            "sub": "user-8",
            "roles": ["", {"name": "paciente"}, "insurer"],
            "exp": 1_700_003_600
        })))
        .unwrap();

        assert_eq!(ctx.role, Role::Patient);
        assert!(ctx.has_any_role(&[Role::Insurer, Role::Admin]));
        assert!(!ctx.is_doctor());
    }

    #[test]
    fn test_missing_role_fails_closed() {
        let err = AuthContext::from_claims(claims(json!({"sub": "user-9", "exp": 1_700_003_600})))
            .unwrap_err();
        assert_eq!(err, IdentityError::MissingClaim("role".to_string()));
    }

    #[test]
    fn test_missing_subject() {
        let err = AuthContext::from_claims(claims(json!({"sub": " ", "role": "admin", "exp": 1})))
            .unwrap_err();
        assert_eq!(err, IdentityError::MissingClaim("sub".to_string()));
    }

    #[test]
    fn test_serialized_context_omits_raw_claims() {
        let ctx = AuthContext::from_claims(claims(json!({
            "sub": "user-7",
            "role": "ASEGURADORA",
            "secret_note": "x",
            "exp": 1_700_003_600
        })))
        .unwrap();

        let body = serde_json::to_value(&ctx).unwrap();
        assert_eq!(body["subjectId"], "user-7");
        assert_eq!(body["role"], "INSURER");
        assert!(body.get("rawClaims").is_none());
        assert_eq!(ctx.claim("secret_note"), Some(&json!("x")));
    }
}
