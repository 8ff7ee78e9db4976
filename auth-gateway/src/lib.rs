//! Request perimeter for MedRecords
//!
//! Everything that decides, before business logic runs, whether a request
//! may proceed:
//!
//! - Route classification against a public-prefix allowlist, failing closed
//! - Session presence gate with login redirect for browser navigations
//! - Double-submit-cookie CSRF protection for state-changing requests
//! - Session verification through [`auth_identity::SessionAuthenticator`]
//! - An [`Authenticated`] extractor handing the verified context to handlers
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_gateway::{protect, Authenticated, GatewayConfig, GatewayState};
//! use auth_identity::{IdentityConfig, SessionAuthenticator};
//! use axum::{routing::get, Router};
//!
//! async fn patients(user: Authenticated) -> String {
//!     format!("patients visible to {}", user.subject_id)
//! }
//!
//! # fn build() -> Result<Router, auth_identity::IdentityError> {
//! let authenticator = SessionAuthenticator::new(&IdentityConfig::with_secret(
//!     "a-shared-secret-of-at-least-32-bytes",
//! ))?;
//! let state = GatewayState::new(GatewayConfig::default(), authenticator);
//!
//! let app = protect(Router::new().route("/patients", get(patients)), state);
//! # Ok(app)
//! # }
//! ```

pub mod config;
pub mod csrf;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

pub use config::*;
pub use csrf::*;
pub use error::*;
pub use extractors::*;
pub use middleware::*;
pub use routes::*;
