//! Integration tests for Orderdesk.
//!
//! # Running Tests
//!
//! These tests exercise a running service end to end. They need:
//!
//! - A running `PostgreSQL` database with migrations applied
//!   (`cargo run -p orderdesk-cli -- migrate`)
//! - The api server running (`cargo run -p orderdesk-api`)
//! - A user directory (or stub) reachable at `DIRECTORY_BASE_URL`, seeded
//!   with `george.bluth@reqres.in / George / Bluth`
//!
//! ```bash
//! cargo test -p orderdesk-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

/// Shared context for end-to-end tests.
pub struct TestContext {
    /// HTTP client for calling the running service.
    pub client: reqwest::Client,
    /// Base URL of the running service.
    pub base_url: String,
}

impl TestContext {
    /// Build a context from the environment.
    ///
    /// Reads `ORDERDESK_BASE_URL`, defaulting to `http://localhost:8080`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("ORDERDESK_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_owned());
        let client = reqwest::Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Build an absolute URL for a path on the running service.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
