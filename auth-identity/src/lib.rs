//! Session identity for MedRecords
//!
//! This crate turns an already-issued session credential into a verified,
//! request-scoped [`AuthContext`]:
//! - Signature and expiry validation of the credential ([`SessionAuthenticator`])
//! - Role normalization across locales and historical spellings ([`normalize_role`])
//! - Doctor identifier resolution across issuer claim shapes ([`resolve_doctor_id`])
//!
//! # Example
//!
//! ```rust,no_run
//! use auth_identity::{IdentityConfig, Role, SessionAuthenticator};
//!
//! fn check(cookie_value: &str) -> Result<(), auth_identity::IdentityError> {
//!     let config = IdentityConfig::with_secret("a-shared-secret-of-at-least-32-bytes");
//!     let authenticator = SessionAuthenticator::new(&config)?;
//!
//!     let ctx = authenticator.authenticate(cookie_value)?;
//!     if ctx.has_role(&Role::Doctor) {
//!         println!("doctor {:?}", ctx.doctor_id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod models;
pub mod roles;
pub mod service;

pub use claims::*;
pub use config::*;
pub use error::*;
pub use models::*;
pub use roles::*;
pub use service::*;
