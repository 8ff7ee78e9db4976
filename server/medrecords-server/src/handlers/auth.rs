// Session bootstrap endpoints
use auth_gateway::{Authenticated, CsrfGuard};
use auth_identity::AuthContext;
use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub csrf_token: String,
    /// Header the token must be echoed in
    pub header_name: String,
}

/// `GET /api/auth/csrf`: hand the page its double-submit token.
///
/// An existing CSRF cookie is reused so concurrent tabs keep working.
pub async fn csrf_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<CsrfTokenResponse>) {
    let guard: &CsrfGuard = state.gateway.csrf();
    let (jar, csrf_token) = guard.ensure_token(jar);

    (
        jar,
        Json(CsrfTokenResponse {
            csrf_token,
            header_name: guard.header_name().to_string(),
        }),
    )
}

/// `GET /api/auth/session`: the verified identity of the caller.
pub async fn current_session(Authenticated(ctx): Authenticated) -> Json<AuthContext> {
    Json(ctx)
}
