//! Perimeter middleware pipeline
//!
//! Three stages run in a fixed order ahead of every handler:
//!
//! 1. [`edge_gate`] classifies the path and turns away protected requests
//!    that carry no session cookie at all
//! 2. [`csrf_guard`] checks the double-submit token on protected mutations
//! 3. [`session_authenticator`] verifies the credential and stores the
//!    resulting [`AuthContext`] in request extensions
//!
//! Each stage either hands the request on or ends it. [`protect`] installs
//! all three on a router.

use std::sync::Arc;

use auth_identity::{AuthContext, IdentityError, SessionAuthenticator};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower::ServiceBuilder;

use crate::{
    config::GatewayConfig,
    csrf::{requires_csrf, CsrfGuard},
    error::GatewayError,
    routes::{prefix_matches, RouteClassification, RouteClassifier},
};

/// Shared, read-only state of the perimeter stages
#[derive(Clone)]
pub struct GatewayState {
    config: Arc<GatewayConfig>,
    classifier: Arc<RouteClassifier>,
    csrf: Arc<CsrfGuard>,
    authenticator: SessionAuthenticator,
}

impl GatewayState {
    pub fn new(config: GatewayConfig, authenticator: SessionAuthenticator) -> Self {
        Self {
            classifier: Arc::new(RouteClassifier::from_config(&config)),
            csrf: Arc::new(CsrfGuard::from_config(&config)),
            config: Arc::new(config),
            authenticator,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn classifier(&self) -> &RouteClassifier {
        &self.classifier
    }

    pub fn csrf(&self) -> &CsrfGuard {
        &self.csrf
    }

    pub fn authenticator(&self) -> &SessionAuthenticator {
        &self.authenticator
    }

    /// Session cookie value, if present and non-empty
    pub fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(&self.config.session_cookie)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Whether a rejection should be JSON rather than a login redirect
    fn wants_json(&self, request: &Request) -> bool {
        prefix_matches(&self.config.api_prefix, request.uri().path())
            || prefers_json(request.headers())
    }

    fn reject(&self, request: &Request, error: GatewayError) -> Response {
        if self.wants_json(request) {
            error.into_response()
        } else {
            tracing::info!(
                path = %request.uri().path(),
                reason = %error,
                "Redirecting browser navigation to login"
            );
            Redirect::to(&self.config.login_path).into_response()
        }
    }
}

/// Wrap `router` in the perimeter pipeline.
pub fn protect<S>(router: Router<S>, state: GatewayState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn_with_state(state.clone(), edge_gate))
            .layer(middleware::from_fn_with_state(state.clone(), csrf_guard))
            .layer(middleware::from_fn_with_state(state, session_authenticator)),
    )
}

/// First stage: classification and session presence check.
///
/// Never validates the credential; that is left to
/// [`session_authenticator`].
pub async fn edge_gate(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let classification = state.classifier.classify(request.uri().path());
    request.extensions_mut().insert(classification);

    let mut response = if classification == RouteClassification::Protected
        && state.session_token(request.headers()).is_none()
    {
        state.reject(&request, GatewayError::missing_session())
    } else {
        next.run(request).await
    };

    apply_security_headers(response.headers_mut());
    response
}

/// Second stage: double-submit CSRF check for protected mutations.
pub async fn csrf_guard(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Response {
    if requires_csrf(request.method()) && classification_of(&request) == RouteClassification::Protected {
        if let Err(reason) = state.csrf.check(request.headers()) {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = ?reason,
                "CSRF validation failed"
            );
            return GatewayError::CsrfMismatch.into_response();
        }
    }

    next.run(request).await
}

/// Third stage: credential verification.
///
/// Protected requests need a valid credential. On public requests a valid
/// credential is still attached when present, and an invalid one is
/// ignored.
pub async fn session_authenticator(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = state.session_token(request.headers());

    match classification_of(&request) {
        RouteClassification::Public => {
            if let Some(ctx) = token.and_then(|token| state.authenticator.authenticate(&token).ok()) {
                request.extensions_mut().insert(ctx);
            }
        }
        RouteClassification::Protected => {
            let outcome = token
                .ok_or(IdentityError::MissingCredential)
                .and_then(|token| state.authenticator.authenticate(&token));

            match outcome {
                Ok(ctx) => {
                    request.extensions_mut().insert::<AuthContext>(ctx);
                }
                Err(err) => return state.reject(&request, err.into()),
            }
        }
    }

    next.run(request).await
}

/// Classification stored by the edge gate; protected if the gate did not run.
fn classification_of(request: &Request) -> RouteClassification {
    request
        .extensions()
        .get::<RouteClassification>()
        .copied()
        .unwrap_or(RouteClassification::Protected)
}

/// Baseline security headers stamped on every response
pub fn apply_security_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("same-origin"),
    );
}

/// Whether the `Accept` header ranks JSON above HTML.
fn prefers_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let mut json_q = 0.0_f32;
    let mut html_q = 0.0_f32;

    for range in accept.split(',') {
        let mut parts = range.split(';').map(str::trim);
        let media = parts.next().unwrap_or_default().to_ascii_lowercase();
        let quality = parts
            .filter_map(|param| param.strip_prefix("q="))
            .find_map(|q| q.parse::<f32>().ok())
            .unwrap_or(1.0);

        if media == "application/json" || media.ends_with("+json") {
            json_q = json_q.max(quality);
        } else if media == "text/html" || media == "application/xhtml+xml" {
            html_q = html_q.max(quality);
        }
    }

    json_q > html_q
}
