//! Double-submit-cookie CSRF protection
//!
//! The token lives in a cookie the page can read; state-changing requests
//! must echo it in a header. A cross-site attacker can make the browser send
//! the cookie but cannot read it to forge the header.

use axum::http::{HeaderMap, Method};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;

use crate::config::GatewayConfig;

const TOKEN_BYTES: usize = 32;

/// Why a CSRF check failed. Logged only; every failure gets the same
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfFailure {
    MissingCookie,
    MissingHeader,
    Mismatch,
}

/// Whether `method` changes state and therefore needs a CSRF token
pub fn requires_csrf(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Compare the cookie and header tokens in constant time.
pub fn check_csrf(cookie_token: Option<&str>, header_token: Option<&str>) -> Result<(), CsrfFailure> {
    let cookie = cookie_token
        .filter(|token| !token.is_empty())
        .ok_or(CsrfFailure::MissingCookie)?;
    let header = header_token
        .filter(|token| !token.is_empty())
        .ok_or(CsrfFailure::MissingHeader)?;

    if bool::from(cookie.as_bytes().ct_eq(header.as_bytes())) {
        Ok(())
    } else {
        Err(CsrfFailure::Mismatch)
    }
}

pub fn verify_csrf(cookie_token: Option<&str>, header_token: Option<&str>) -> bool {
    check_csrf(cookie_token, header_token).is_ok()
}

/// Issues CSRF cookies and checks requests against them.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    cookie_name: String,
    header_name: String,
    secure: bool,
}

impl CsrfGuard {
    pub fn new(cookie_name: impl Into<String>, header_name: impl Into<String>, secure: bool) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            header_name: header_name.into(),
            secure,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(&config.csrf_cookie, &config.csrf_header, config.secure_cookies)
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Fresh random token, base64url without padding
    pub fn issue_token() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Readable cookie carrying `token`. Not `HttpOnly`: the page must read
    /// it to echo the header.
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(false)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .build()
    }

    /// Return the jar's existing token, or add a freshly issued one.
    pub fn ensure_token(&self, jar: CookieJar) -> (CookieJar, String) {
        let existing = jar
            .get(&self.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty());

        match existing {
            Some(token) => (jar, token),
            None => {
                let token = Self::issue_token();
                (jar.add(self.cookie(token.clone())), token)
            }
        }
    }

    /// Check the request headers' cookie and echoed token.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), CsrfFailure> {
        let jar = CookieJar::from_headers(headers);
        let cookie = jar.get(&self.cookie_name).map(Cookie::value);
        let header = headers
            .get(self.header_name.as_str())
            .and_then(|value| value.to_str().ok());

        check_csrf(cookie, header)
    }
}
