use std::sync::Arc;

use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use logger_redacted::fingerprint;
use secrecy::ExposeSecret;
use serde_json::{Map, Value};

use crate::{config::IdentityConfig, error::*, models::AuthContext};

/// Shortest HMAC secret accepted at startup
pub const MIN_HMAC_SECRET_BYTES: usize = 32;

/// Validates session credentials and turns them into an [`AuthContext`].
///
/// The verification key is decoded once in [`SessionAuthenticator::new`] and
/// shared read-only between clones.
#[derive(Clone)]
pub struct SessionAuthenticator {
    key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl SessionAuthenticator {
    pub fn new(config: &IdentityConfig) -> Result<Self> {
        let key = decoding_key(config)?;

        let mut validation = Validation::new(config.algorithm);
        validation.leeway = config.leeway_seconds;
        validation.validate_nbf = true;

        let mut required = vec!["exp"];
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(required.as_slice());

        tracing::info!(
            algorithm = ?config.algorithm,
            issuer = ?config.issuer,
            audience = ?config.audience,
            leeway_seconds = config.leeway_seconds,
            "Session authenticator ready"
        );

        Ok(Self {
            key: Arc::new(key),
            validation: Arc::new(validation),
        })
    }

    /// Verify a raw session credential.
    ///
    /// The signature is checked before any claim is read. Purely local, no
    /// I/O.
    pub fn authenticate(&self, credential: &str) -> Result<AuthContext> {
        let token = credential.trim();
        if token.is_empty() {
            return Err(IdentityError::MissingCredential);
        }

        let outcome = decode::<Map<String, Value>>(token, &self.key, &self.validation)
            .map_err(classify)
            .and_then(|data| AuthContext::from_claims(data.claims));

        match &outcome {
            Ok(ctx) => tracing::debug!(
                subject = %ctx.subject_id,
                role = %ctx.role,
                "Session credential accepted"
            ),
            Err(err) => tracing::warn!(
                token_fp = %fingerprint(token),
                reason = %err,
                "Session credential rejected"
            ),
        }

        outcome
    }
}

fn decoding_key(config: &IdentityConfig) -> Result<DecodingKey> {
    match config.algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            let secret = config
                .jwt_secret
                .as_ref()
                .map(|s| s.expose_secret().as_bytes())
                .filter(|bytes| !bytes.is_empty())
                .ok_or_else(|| IdentityError::InvalidKey("jwt_secret is not set".to_string()))?;

            if secret.len() < MIN_HMAC_SECRET_BYTES {
                return Err(IdentityError::InvalidKey(format!(
                    "jwt_secret must be at least {MIN_HMAC_SECRET_BYTES} bytes"
                )));
            }
            Ok(DecodingKey::from_secret(secret))
        }
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => {
            let pem = config
                .public_key_pem
                .as_deref()
                .filter(|pem| !pem.trim().is_empty())
                .ok_or_else(|| IdentityError::InvalidKey("public_key_pem is not set".to_string()))?;

            DecodingKey::from_rsa_pem(pem.as_bytes())
                .map_err(|e| IdentityError::InvalidKey(e.to_string()))
        }
        other => Err(IdentityError::InvalidKey(format!(
            "unsupported algorithm {other:?}"
        ))),
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> IdentityError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => IdentityError::InvalidSignature,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => IdentityError::ForeignIssuer,
        ErrorKind::ExpiredSignature => IdentityError::SessionExpired,
        ErrorKind::ImmatureSignature => IdentityError::NotYetValid,
        ErrorKind::MissingRequiredClaim(claim) => IdentityError::MissingClaim(claim.clone()),
        _ => IdentityError::MalformedCredential(err.to_string()),
    }
}
