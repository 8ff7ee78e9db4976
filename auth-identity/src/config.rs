use jsonwebtoken::Algorithm;
use secrecy::SecretString;
use serde::Deserialize;

/// Verification settings for session credentials.
///
/// Exactly one key source is used: `jwt_secret` for the HMAC family,
/// `public_key_pem` for the RSA family.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub jwt_secret: Option<SecretString>,
    pub public_key_pem: Option<String>,
    pub algorithm: Algorithm,
    /// Required `iss` value, when set
    pub issuer: Option<String>,
    /// Required `aud` member, when set
    pub audience: Option<String>,
    /// Clock skew tolerated on `exp` and `nbf`
    pub leeway_seconds: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            public_key_pem: None,
            algorithm: Algorithm::HS256,
            issuer: None,
            audience: None,
            leeway_seconds: 0,
        }
    }
}

impl IdentityConfig {
    /// HMAC configuration from a shared secret
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Some(SecretString::new(secret.into())),
            ..Self::default()
        }
    }
}
