//! HTTP client, probe verdicts and the error taxonomy shared by all checkers.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use ureq::{Agent, ResponseExt};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Desktop browser user agent. Several platforms serve a login wall or an
/// error page to anything that does not look like a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Errors that turn a probe into an [`Status::Error`] verdict.
///
/// Checkers never return these to their caller; they are carried inside
/// [`Verdict::Error`] so the driver can report them and move on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CheckError {
    /// Transport failure: timeout, DNS, refused connection, unreadable body.
    #[error("network: {0}")]
    Network(#[source] Box<ureq::Error>),
    /// A status code the platform's heuristic cannot classify.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Parse(String),
    /// The checker could not run to completion (e.g. its thread panicked).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ureq::Error> for CheckError {
    fn from(e: ureq::Error) -> Self {
        Self::Network(Box::new(e))
    }
}

/// Outcome of a heuristic that managed to classify the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// The profile exists.
    Found,
    /// The platform says there is no such profile.
    NotFound,
}

/// Coarse classification of a [`CheckResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The profile exists.
    Found,
    /// No such profile.
    NotFound,
    /// The probe failed.
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found => write!(f, "found"),
            Self::NotFound => write!(f, "not found"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The verdict of one probe. The profile URL only exists for `Found`.
#[derive(Debug)]
#[must_use]
pub enum Verdict {
    /// The profile exists at `url`.
    Found {
        /// Public profile URL.
        url: String,
    },
    /// No such profile.
    NotFound,
    /// The probe failed.
    Error(CheckError),
}

/// The result of probing one platform for one username variant.
#[derive(Debug)]
#[must_use]
pub struct CheckResult {
    /// Registry name of the platform (e.g. `github_gist`).
    pub platform: &'static str,
    /// The username variant that was probed.
    pub variant: String,
    /// What the probe concluded.
    pub verdict: Verdict,
}

impl CheckResult {
    /// Coarse status of the verdict.
    pub fn status(&self) -> Status {
        match self.verdict {
            Verdict::Found { .. } => Status::Found,
            Verdict::NotFound => Status::NotFound,
            Verdict::Error(_) => Status::Error,
        }
    }

    /// Profile URL, present iff the profile was found.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match &self.verdict {
            Verdict::Found { url } => Some(url),
            _ => None,
        }
    }

    /// The failure behind an error verdict.
    #[must_use]
    pub fn error(&self) -> Option<&CheckError> {
        match &self.verdict {
            Verdict::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Settings for [`Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout covering the whole exchange, including the body.
    pub timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// A fetched page: final status, final URL after redirects, and body text.
#[derive(Debug, Clone)]
pub struct Page {
    /// HTTP status of the final response.
    pub status: u16,
    /// URL the redirect chain ended at.
    pub final_url: String,
    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub body: String,
}

/// A blocking HTTP client shared by every checker.
///
/// Redirects are followed and every status code is handed back as data, so
/// heuristics decide what a 404 means. Cloning is cheap; clones share the
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use kosinter::check::Client;
///
/// let client = Client::new();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    agent: Agent,
}

impl Client {
    /// Create a client with the default timeout and browser user agent.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client from explicit settings.
    #[must_use]
    pub fn with_config(config: &ClientConfig) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .user_agent(config.user_agent.as_str())
            // 404 is a verdict here, not a failure.
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    /// GET `url` with extra `headers`, following redirects.
    ///
    /// Any status code is returned as a [`Page`]; only transport failures
    /// and body read failures are errors.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Network`] when the request or body read fails.
    pub fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Page, CheckError> {
        let mut request = self.agent.get(url);
        for &(name, value) in headers {
            request = request.header(name, value);
        }

        let mut response = request.call()?;
        let status = response.status().as_u16();
        let final_url = response.get_uri().to_string();
        let bytes = response.body_mut().read_to_vec()?;

        Ok(Page {
            status,
            final_url,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
