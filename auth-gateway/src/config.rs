use serde::{Deserialize, Serialize};

/// Perimeter settings shared by every gateway stage.
///
/// The session cookie name is read by both the edge gate and the session
/// authenticator, so it lives here once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub session_cookie: String,
    pub csrf_cookie: String,
    pub csrf_header: String,
    /// Where browser navigations without a session are sent
    pub login_path: String,
    /// Requests under this prefix get JSON errors instead of redirects
    pub api_prefix: String,
    /// Paths reachable without a session. A prefix ending in `/` matches
    /// everything beneath it; otherwise it matches itself and its sub-paths.
    pub public_prefixes: Vec<String>,
    pub preview_prefix: String,
    /// Expose `preview_prefix` without a session (unauthenticated demos)
    pub preview_enabled: bool,
    /// Mark issued cookies `Secure`
    pub secure_cookies: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
            csrf_cookie: default_csrf_cookie(),
            csrf_header: default_csrf_header(),
            login_path: "/login".to_string(),
            api_prefix: "/api".to_string(),
            public_prefixes: default_public_prefixes(),
            preview_prefix: "/preview".to_string(),
            preview_enabled: false,
            secure_cookies: true,
        }
    }
}

fn default_session_cookie() -> String {
    "access_token".to_string()
}

fn default_csrf_cookie() -> String {
    "csrf_token".to_string()
}

fn default_csrf_header() -> String {
    "X-CSRF-Token".to_string()
}

fn default_public_prefixes() -> Vec<String> {
    [
        "/login",
        "/static/",
        "/assets/",
        "/favicon.ico",
        "/robots.txt",
        "/api/public",
        "/api/auth/csrf",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl GatewayConfig {
    /// Public prefixes in effect, including the login page and the preview
    /// namespace when enabled.
    pub fn effective_public_prefixes(&self) -> Vec<String> {
        let mut prefixes = self.public_prefixes.clone();

        if !prefixes.contains(&self.login_path) {
            prefixes.push(self.login_path.clone());
        }
        if self.preview_enabled {
            prefixes.push(self.preview_prefix.clone());
        }

        prefixes
    }
}
