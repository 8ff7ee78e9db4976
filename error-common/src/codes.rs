// Error codes implementation
// Stable codes attached to every perimeter rejection. Clients may match on
// these; never renumber an existing code.

pub mod authentication {
    pub const MISSING_CREDENTIAL: &str = "AUTH_2001";
    pub const TOKEN_EXPIRED: &str = "AUTH_2002";
    pub const SESSION_INVALID: &str = "AUTH_2003";
    pub const INVALID_SIGNATURE: &str = "AUTH_2004";
}

pub mod csrf {
    pub const TOKEN_MISMATCH: &str = "CSRF_2101";
}

pub mod routing {
    pub const UNROUTABLE_REQUEST: &str = "ROUTE_2201";
}

pub mod server {
    pub const CONFIGURATION: &str = "SRV_5001";
    pub const INTERNAL: &str = "SRV_5002";
}

/// Every code defined above, for uniqueness checks.
pub const ALL: &[&str] = &[
    authentication::MISSING_CREDENTIAL,
    authentication::TOKEN_EXPIRED,
    authentication::SESSION_INVALID,
    authentication::INVALID_SIGNATURE,
    csrf::TOKEN_MISMATCH,
    routing::UNROUTABLE_REQUEST,
    server::CONFIGURATION,
    server::INTERNAL,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let unique: HashSet<_> = ALL.iter().collect();
        assert_eq!(unique.len(), ALL.len());
    }
}
