//! Client for the external user directory.
//!
//! The directory is the source of truth for customer identity. It exposes a
//! paginated `GET /users?page=N` endpoint; this module walks those pages to
//! resolve an email to a user's name fields, translating every transport or
//! protocol failure into [`DirectoryError`] so callers never see raw HTTP
//! errors.
//!
//! Lookups are stateless and never cached: an identity may change between
//! calls, so freshness wins over performance.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::DirectoryConfig;

/// User-Agent header sent with every directory request.
const CLIENT_USER_AGENT: &str = "orderdesk-api";

/// Errors that can occur when querying the user directory.
///
/// Every variant means the same thing to callers - the directory was
/// unavailable - but carries a distinct diagnostic for operators.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The client could not be constructed from its configuration.
    #[error("invalid directory client configuration: {0}")]
    Config(String),

    /// The request never completed: connection failure or timeout.
    #[error("user directory request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The directory answered with a non-success status code.
    #[error("user directory returned HTTP {status}")]
    Status {
        /// The HTTP status code received.
        status: u16,
    },

    /// The directory answered 2xx but the payload was unreadable.
    #[error("user directory returned an unreadable payload: {0}")]
    Decode(String),
}

/// Name fields of a directory user, resolved by email.
///
/// Constructed fresh for every lookup and discarded after being copied into
/// an order; never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// First name as recorded in the directory.
    pub first_name: String,
    /// Last name as recorded in the directory.
    pub last_name: String,
}

/// Identity lookup port.
///
/// Production code uses [`DirectoryClient`]; tests substitute in-memory
/// implementations.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve an email to a user identity.
    ///
    /// Returns `Ok(None)` when the directory does not know the email; a
    /// blank email short-circuits to `Ok(None)` without any network call.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the directory cannot be reached or
    /// answers with anything other than a well-formed user page.
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserIdentity>, DirectoryError>;
}

/// HTTP client for the user directory.
#[derive(Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl DirectoryClient {
    /// Create a new directory client.
    ///
    /// The per-call timeout and the optional `x-api-key` header come from
    /// configuration; the timeout bounds every page fetch so a hung
    /// directory cannot stall a request indefinitely.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Config`] if the HTTP client fails to build
    /// or the configured API key is not a valid header value.
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        // The API key is optional; local directory stubs don't require one
        if let Some(api_key) = &config.api_key {
            headers.insert(
                "x-api-key",
                HeaderValue::from_str(api_key.expose_secret())
                    .map_err(|e| DirectoryError::Config(format!("invalid API key: {e}")))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| DirectoryError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetch a single user page.
    async fn fetch_page(&self, page: u32) -> Result<UsersPage, DirectoryError> {
        let response = self
            .client
            .get(format!("{}/users", self.base_url))
            .query(&[("page", page)])
            .send()
            .await
            .map_err(DirectoryError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<UsersPage>()
            .await
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl UserDirectory for DirectoryClient {
    #[instrument(skip(self), fields(email = %email))]
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserIdentity>, DirectoryError> {
        // Fail fast: no point calling the directory for blank input
        if email.trim().is_empty() {
            return Ok(None);
        }

        let mut page: u32 = 1;
        // The walk is bounded by the first page's reported total. A later
        // page may shorten the walk but never extend it, so a directory
        // that keeps raising its total cannot cause an unbounded walk.
        let mut bound: Option<u32> = None;

        loop {
            let users_page = self.fetch_page(page).await?;
            tracing::trace!(
                page = users_page.page,
                total_pages = users_page.total_pages,
                users = users_page.data.len(),
                "fetched directory page"
            );

            let found = users_page.data.into_iter().find(|user| {
                user.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            });
            if let Some(user) = found {
                return Ok(Some(UserIdentity {
                    first_name: user.first_name.unwrap_or_default(),
                    last_name: user.last_name.unwrap_or_default(),
                }));
            }

            // Treat 0/negative (or absurdly large) reported totals as "1 page"
            let reported = u32::try_from(users_page.total_pages).map_or(1, |n| n.max(1));
            let limit = bound.map_or(reported, |b| b.min(reported));
            bound = Some(limit);

            // Stop when the last page is exhausted without a match
            if page >= limit {
                return Ok(None);
            }
            page += 1;
        }
    }
}

/// Wire representation of one page of the directory's `/users` endpoint.
///
/// Field names follow the directory's snake_case convention; a missing
/// `data` array is treated as an empty page rather than an error.
#[derive(Debug, Deserialize)]
struct UsersPage {
    #[serde(default)]
    page: i64,
    #[serde(default)]
    total_pages: i64,
    #[serde(default)]
    data: Vec<DirectoryUser>,
}

/// A single user record on a directory page.
#[derive(Debug, Deserialize)]
struct DirectoryUser {
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}
