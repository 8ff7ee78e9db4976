use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("No session credential presented")]
    MissingCredential,

    #[error("Malformed session credential: {0}")]
    MalformedCredential(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Session credential not yet valid")]
    NotYetValid,

    #[error("Session credential is missing the '{0}' claim")]
    MissingClaim(String),

    #[error("Invalid credential signature")]
    InvalidSignature,

    #[error("Credential issued for another issuer or audience")]
    ForeignIssuer,

    #[error("Invalid verification key: {0}")]
    InvalidKey(String),
}

impl IdentityError {
    /// Whether the credential failed cryptographic or issuer checks, as
    /// opposed to being absent, expired or incomplete.
    pub fn is_signature_failure(&self) -> bool {
        matches!(self, IdentityError::InvalidSignature | IdentityError::ForeignIssuer)
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
