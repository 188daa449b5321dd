//! Typed HTTP client for the slice of the enrollment API the model
//! exercises: session login, bulk course registration, announcement
//! listing.
//!
//! Requests carry the session cookie issued at login. Status verification
//! turns any unexpected status into a typed error; response bodies beyond
//! the fields the verifier needs stay undecoded.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::student::UserAccount;
use crate::verify::ObservedAnnouncement;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{method} {path}: expected status {expected:?}, got {actual}")]
    UnexpectedStatus {
        method: &'static str,
        path: String,
        expected: Vec<u16>,
        actual: u16,
    },
}

#[derive(Debug, Clone, Serialize)]
struct LoginRequest {
    code: String,
    password: String,
}

#[derive(Debug, Clone, Serialize)]
struct RegisterCourseRequest {
    id: String,
}

/// One page of the announcement listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementPage {
    pub announcements: Vec<ObservedAnnouncement>,
    #[serde(default)]
    pub unread_count: u64,
}

/// Client for one simulated user's session against the target server.
pub struct ApiClient {
    base: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build a client rooted at `base` (scheme + host + optional port).
    pub fn new(base: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("enrollbench/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base: base.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn check(
        method: &'static str,
        path: &str,
        expected: &[u16],
        resp: &reqwest::Response,
    ) -> Result<(), ApiError> {
        let actual = resp.status().as_u16();
        if expected.contains(&actual) {
            return Ok(());
        }
        Err(ApiError::UnexpectedStatus {
            method,
            path: path.to_string(),
            expected: expected.to_vec(),
            actual,
        })
    }

    /// POST the account's raw credentials; the session cookie lands in the
    /// client's cookie store.
    pub async fn login(&self, account: &UserAccount) -> Result<(), ApiError> {
        let path = "/api/login";
        let resp = self
            .http
            .post(self.url(path))
            .json(&LoginRequest {
                code: account.code.clone(),
                password: account.raw_password.clone(),
            })
            .send()
            .await?;
        Self::check("POST", path, &[200], &resp)
    }

    /// Submit a bulk course registration.
    ///
    /// Any non-200 status is the server rejecting the submission as a
    /// whole; the caller decides how to reconcile the local model.
    pub async fn register_courses(&self, course_ids: &[String]) -> Result<(), ApiError> {
        let path = "/api/me/courses";
        let body: Vec<RegisterCourseRequest> = course_ids
            .iter()
            .map(|id| RegisterCourseRequest { id: id.clone() })
            .collect();
        let resp = self.http.put(self.url(path)).json(&body).send().await?;
        Self::check("PUT", path, &[200], &resp)
    }

    /// Fetch the first page of the session user's announcement listing.
    pub async fn announcements(&self) -> Result<AnnouncementPage, ApiError> {
        let path = "/api/announcements";
        let resp = self.http.get(self.url(path)).send().await?;
        Self::check("GET", path, &[200], &resp)?;
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
