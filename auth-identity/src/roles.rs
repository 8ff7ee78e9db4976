use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Keys under which a role may be wrapped when it arrives as an object,
/// tried in order.
const WRAPPER_KEYS: &[&str] = &["name", "role", "code"];

const ROLE_PREFIX: &str = "ROLE_";

/// Canonical access class of a caller.
///
/// The four named variants form the closed set the policy layer reasons
/// about. Any other non-empty role string is carried verbatim (uppercased)
/// in [`Role::Unrecognized`] so that nothing is silently dropped; callers
/// that need strictness check [`Role::is_known`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    Doctor,
    Patient,
    Insurer,
    Unrecognized(String),
}

impl Role {
    /// Canonical uppercase spelling
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::Doctor => "DOCTOR",
            Role::Patient => "PATIENT",
            Role::Insurer => "INSURER",
            Role::Unrecognized(raw) => raw,
        }
    }

    /// Whether this role belongs to the closed canonical set
    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unrecognized(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn canonical_alias(upper: &str) -> Option<Role> {
    let bare = upper.strip_prefix(ROLE_PREFIX).unwrap_or(upper);
    let role = match bare {
        "ADMIN" | "ADMINISTRATOR" | "ADMINISTRADOR" | "ADMINISTRADORA" => Role::Admin,
        "DOCTOR" | "DOCTORA" | "MEDICO" | "MÉDICO" | "MEDICA" | "MÉDICA" | "PHYSICIAN" => {
            Role::Doctor
        }
        "PATIENT" | "PACIENTE" => Role::Patient,
        "INSURER" | "INSURANCE" | "ASEGURADORA" | "ASEGURADOR" => Role::Insurer,
        _ => return None,
    };
    Some(role)
}

/// Normalize a single role string.
///
/// Returns `None` for blank input.
pub fn normalize_role_str(raw: &str) -> Option<Role> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    Some(canonical_alias(&upper).unwrap_or(Role::Unrecognized(upper)))
}

/// Normalize a role claim of unknown shape.
///
/// Accepts a string, or an object wrapping the role under `name`, `role`
/// or `code`. Anything else (null, booleans, numbers, arrays) yields `None`.
pub fn normalize_role(value: &Value) -> Option<Role> {
    match value {
        Value::String(raw) => normalize_role_str(raw),
        Value::Object(wrapper) => WRAPPER_KEYS
            .iter()
            .filter_map(|key| wrapper.get(*key))
            .find_map(normalize_role),
        _ => None,
    }
}

/// Normalize a single role or a list of roles into a set.
pub fn normalize_roles(value: &Value) -> BTreeSet<Role> {
    match value {
        Value::Array(items) => items.iter().filter_map(normalize_role).collect(),
        single => normalize_role(single).into_iter().collect(),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Role must not be blank")]
pub struct RoleParseError;

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_role_str(s).ok_or(RoleParseError)
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
