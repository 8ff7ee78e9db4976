// Route classification for the edge gate
use crate::{config::GatewayConfig, error::GatewayError};

/// Outcome of classifying a request path. Stored in request extensions by
/// the edge gate for the later stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClassification {
    Public,
    Protected,
}

/// Prefix allowlist deciding which paths need a session.
#[derive(Debug, Clone)]
pub struct RouteClassifier {
    public_prefixes: Vec<String>,
}

impl RouteClassifier {
    /// Blank prefixes and the bare root are ignored so a misconfigured entry
    /// cannot open every path.
    pub fn new<I, P>(public_prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let public_prefixes = public_prefixes
            .into_iter()
            .map(Into::into)
            .map(|prefix| prefix.trim().to_string())
            .filter(|prefix| prefix.starts_with('/') && prefix != "/")
            .collect();

        Self { public_prefixes }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.effective_public_prefixes())
    }

    /// Classify a path, reporting paths whose meaning is ambiguous.
    pub fn try_classify(&self, path: &str) -> Result<RouteClassification, GatewayError> {
        check_routable(path).map_err(|reason| GatewayError::UnroutableRequest(reason.to_string()))?;

        let public = self
            .public_prefixes
            .iter()
            .any(|prefix| prefix_matches(prefix, path));

        Ok(if public {
            RouteClassification::Public
        } else {
            RouteClassification::Protected
        })
    }

    /// Classify a path, treating anything ambiguous as protected.
    pub fn classify(&self, path: &str) -> RouteClassification {
        self.try_classify(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path, error = %err, "Ambiguous path classified as protected");
            RouteClassification::Protected
        })
    }
}

/// Segment-aware prefix match: `/login` matches `/login` and `/login/x` but
/// not `/loginx`. A prefix ending in `/` matches everything beneath it.
pub fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix.ends_with('/') {
        return path.starts_with(prefix);
    }

    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn check_routable(path: &str) -> Result<(), &'static str> {
    if path.is_empty() {
        return Err("empty path");
    }
    if !path.starts_with('/') {
        return Err("path is not absolute");
    }
    if path.contains('\\') {
        return Err("backslash in path");
    }

    let lowered = path.to_ascii_lowercase();
    if ["%2f", "%2e", "%5c"].iter().any(|encoded| lowered.contains(encoded)) {
        return Err("percent-encoded separator in path");
    }

    if path.split('/').any(|segment| segment == "." || segment == "..") {
        return Err("dot segment in path");
    }

    Ok(())
}
