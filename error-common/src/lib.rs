//! Common error handling utilities for the MedRecords perimeter
//!
//! This crate provides the error type shared by the binaries and the stable
//! error codes every perimeter rejection is reported with. Component crates
//! (`auth-identity`, `auth-gateway`) keep their own `thiserror` enums and map
//! onto these codes when rendering a response.
//!
//! # Error Categories
//!
//! - **Authentication**: absent, malformed or expired session credentials,
//!   and credentials whose signature does not verify
//! - **CSRF**: state-changing requests without a matching token pair
//! - **Routing**: paths the route classifier cannot interpret
//! - **Configuration / Server**: startup and runtime failures of the binary
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, MedRecordsError, Result};
//!
//! fn load_key(secret: &str) -> Result<()> {
//!     if secret.is_empty() {
//!         return Err(MedRecordsError::ConfigError("missing signing secret".into()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(load_key("").is_err());
//! assert_eq!(codes::authentication::TOKEN_EXPIRED, "AUTH_2002");
//! ```

pub mod codes;
pub mod types;

pub use types::*;
