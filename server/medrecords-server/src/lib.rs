//! MedRecords HTTP server
//!
//! Wires the perimeter from `auth-gateway` in front of the application
//! routes. Every route, including unknown paths, passes the edge gate first.

pub mod config;
pub mod handlers;
pub mod server;

pub use config::ServerConfig;
pub use server::AppState;

use auth_gateway::protect;
use axum::{
    extract::Request,
    routing::{delete, get},
    Router,
};
use logger_redacted::PiiRedactor;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, health, pages, patients};

/// Application routes without the perimeter
fn routes(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/login", get(pages::login))
        .route("/patients", get(pages::patients))
        .route("/api/public/health", get(health::health_check))
        .route("/api/auth/csrf", get(auth::csrf_token))
        .route("/api/auth/session", get(auth::current_session))
        .route("/api/patients", get(patients::list_patients))
        .route("/api/patients/:id", delete(patients::delete_patient));

    let gateway = state.gateway.config();
    if gateway.preview_enabled {
        router = router.route(&gateway.preview_prefix, get(pages::preview));
    }

    router.with_state(state)
}

/// Create the application router with the perimeter and request tracing
pub fn create_app(state: AppState) -> Router {
    let redact = state.redact_logs;
    let gateway = state.gateway.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request| {
        let uri = request.uri().to_string();
        let uri = if redact {
            PiiRedactor::default().redact(&uri)
        } else {
            uri
        };
        tracing::info_span!("http_request", method = %request.method(), uri = %uri)
    });

    protect(routes(state), gateway).layer(ServiceBuilder::new().layer(trace))
}
