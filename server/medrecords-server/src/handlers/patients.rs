//! Patient API surface
//!
//! Persistence sits behind these handlers and is not part of this crate;
//! they show how the verified [`auth_identity::AuthContext`] reaches the
//! policy checks.

use auth_gateway::Authenticated;
use auth_identity::Role;
use axum::{extract::Path, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientListResponse {
    pub requested_by: String,
    pub role: Role,
    /// Set when the listing is restricted to one doctor's patients
    pub doctor_scope: Option<String>,
    pub patients: Vec<serde_json::Value>,
}

pub async fn list_patients(user: Authenticated) -> Json<PatientListResponse> {
    let doctor_scope = if user.is_doctor() && !user.is_admin() {
        user.doctor_id.clone()
    } else {
        None
    };

    Json(PatientListResponse {
        requested_by: user.subject_id.clone(),
        role: user.role.clone(),
        doctor_scope,
        patients: Vec::new(),
    })
}

pub async fn delete_patient(user: Authenticated, Path(patient_id): Path<String>) -> StatusCode {
    if !user.has_any_role(&[Role::Admin, Role::Doctor]) {
        tracing::warn!(
            subject = %user.subject_id,
            role = %user.role,
            patient_id = %patient_id,
            "Patient deletion denied by role"
        );
        return StatusCode::FORBIDDEN;
    }

    tracing::info!(
        subject = %user.subject_id,
        role = %user.role,
        patient_id = %patient_id,
        "Patient deletion authorized"
    );
    StatusCode::NO_CONTENT
}
