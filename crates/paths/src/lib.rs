//! Shared Splunk ACS API path definitions
//!
//! This crate centralizes the Admin Config Service (ACS) paths used for HTTP
//! Event Collector token management so the operator's REST client and the
//! mock ACS server always agree on the wire layout.
//!
//! ## Route Constants
//!
//! Axum routes require static string literals, so the route templates are
//! provided as constants. They are validated against the URL builders in tests.

pub mod acs {
    /// Public ACS endpoint. Every stack is addressed as a path segment below it.
    pub const ACS_HOSTNAME: &str = "https://admin.splunk.com";

    /// Token collection path relative to the stack segment
    pub const TOKEN_COLLECTION_PATH: &str = "adminconfig/v2/inputs/http-event-collectors";

    /// Axum route for the token collection (create)
    pub const COLLECTION_ROUTE: &str = "/{instance}/adminconfig/v2/inputs/http-event-collectors";

    /// Axum route for a single token (read, delete)
    pub const TOKEN_ROUTE: &str = "/{instance}/adminconfig/v2/inputs/http-event-collectors/{name}";

    /// Build the collection URL for a stack
    ///
    /// Trailing slashes on `base` are ignored, so both `https://admin.splunk.com`
    /// and `https://admin.splunk.com/` produce the same URL.
    #[must_use]
    pub fn collection_url(base: &str, instance: &str) -> String {
        format!(
            "{}/{}/{}",
            base.trim_end_matches('/'),
            instance.trim_matches('/'),
            TOKEN_COLLECTION_PATH
        )
    }

    /// Build the URL of a single named token below a collection URL
    #[must_use]
    pub fn token_url(collection_url: &str, name: &str) -> String {
        format!("{}/{}", collection_url.trim_end_matches('/'), name)
    }
}
