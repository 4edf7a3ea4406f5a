//! Registry of supported platforms and the heuristic each one uses to decide
//! whether a profile exists.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::check::{CheckError, CheckResult, Client, Page, Presence, Verdict};

/// Placeholder substituted with the username in URL templates.
pub const USERNAME_PLACEHOLDER: &str = "{username}";

const INSTAGRAM_API: &str =
    "https://i.instagram.com/api/v1/users/web_profile_info/?username={username}";
const INSTAGRAM_APP_ID: &str = "936619743392459";

const REDDIT_MISSING: &[&str] = &["sorry, nobody on reddit goes by that name", "page not found"];

const TIKTOK_MISSING: &[&str] = &[
    "couldn't find this account",
    "couldn\u{2019}t find this account",
    "account not found",
    "this account could not be found",
];

const TWITTER_MISSING: &[&str] = &[
    "hmm...this page doesn't exist. try searching for something else.",
    "hmm...this page doesn\u{2019}t exist. try searching for something else.",
];

/// How a platform's response is turned into a [`Presence`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Heuristic {
    /// 200 is found, 404 is not found, anything else is an error.
    Status,
    /// Like [`Heuristic::Status`], but a body containing any of these
    /// lower-case markers is not found regardless of status.
    StatusUnlessMarked(&'static [&'static str]),
    /// Instagram's profile-info JSON API; `data.user` decides.
    InstagramApi {
        /// API URL template with a `{username}` placeholder.
        api_url: Cow<'static, str>,
    },
    /// Twitter/X profile HTML inspection. Ambiguous pages are not found.
    TwitterHtml,
}

/// A platform a username can be probed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Registry name, used on the command line (e.g. `github_gist`).
    pub name: &'static str,
    /// Human-readable name used in reports.
    pub display_name: &'static str,
    /// Public profile URL template with a `{username}` placeholder.
    pub profile_url: Cow<'static, str>,
    /// How responses are classified.
    pub heuristic: Heuristic,
}

const fn entry(
    name: &'static str,
    display_name: &'static str,
    profile_url: &'static str,
    heuristic: Heuristic,
) -> Platform {
    Platform {
        name,
        display_name,
        profile_url: Cow::Borrowed(profile_url),
        heuristic,
    }
}

/// Every supported platform, in probe order.
pub static PLATFORMS: [Platform; 10] = [
    entry(
        "instagram",
        "Instagram",
        "https://www.instagram.com/{username}/",
        Heuristic::InstagramApi {
            api_url: Cow::Borrowed(INSTAGRAM_API),
        },
    ),
    entry(
        "facebook",
        "Facebook",
        "https://www.facebook.com/{username}",
        Heuristic::Status,
    ),
    entry(
        "twitter",
        "Twitter",
        "https://twitter.com/{username}",
        Heuristic::TwitterHtml,
    ),
    entry(
        "github",
        "GitHub",
        "https://github.com/{username}",
        Heuristic::Status,
    ),
    entry(
        "github_gist",
        "GitHub Gist",
        "https://gist.github.com/{username}",
        Heuristic::Status,
    ),
    entry(
        "gitlab",
        "GitLab",
        "https://gitlab.com/{username}",
        Heuristic::Status,
    ),
    entry(
        "reddit",
        "Reddit",
        "https://www.reddit.com/user/{username}",
        Heuristic::StatusUnlessMarked(REDDIT_MISSING),
    ),
    entry(
        "tiktok",
        "TikTok",
        "https://www.tiktok.com/@{username}",
        Heuristic::StatusUnlessMarked(TIKTOK_MISSING),
    ),
    entry(
        "youtube",
        "YouTube",
        "https://www.youtube.com/@{username}",
        Heuristic::Status,
    ),
    entry(
        "snapchat",
        "Snapchat",
        "https://www.snapchat.com/add/{username}",
        Heuristic::Status,
    ),
];

/// Look up a registered platform by its registry name (case-insensitive).
#[must_use]
pub fn find(name: &str) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// A platform name that is not in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform `{0}`")]
pub struct UnknownPlatform(pub String);

impl FromStr for &'static Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        find(s.trim()).ok_or_else(|| UnknownPlatform(s.trim().to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name)
    }
}

/// Substitute `username` into a URL template.
///
/// Everything outside the unreserved set (`A-Z a-z 0-9 - . _ ~`) is
/// percent-encoded, so the result is safe both as a path segment and as a
/// query value.
#[must_use]
pub fn expand(template: &str, username: &str) -> String {
    template.replace(USERNAME_PLACEHOLDER, &urlencoding::encode(username))
}

impl Platform {
    /// Public profile URL for `username`.
    #[must_use]
    pub fn profile_url_for(&self, username: &str) -> String {
        expand(&self.profile_url, username)
    }

    /// Probe this platform for `username`.
    ///
    /// Never fails: network errors, unexpected statuses and malformed
    /// bodies all come back as [`Verdict::Error`].
    pub fn check(&self, client: &Client, username: &str) -> CheckResult {
        let started = Instant::now();
        let verdict = match self.probe(client, username) {
            Ok(Presence::Found) => Verdict::Found {
                url: self.profile_url_for(username),
            },
            Ok(Presence::NotFound) => Verdict::NotFound,
            Err(e) => {
                warn!(platform = self.name, variant = username, error = %e, "probe failed");
                Verdict::Error(e)
            }
        };
        debug!(
            platform = self.name,
            variant = username,
            elapsed_ms = started.elapsed().as_millis() as u64,
            verdict = ?verdict,
            "probe finished"
        );

        CheckResult {
            platform: self.name,
            variant: username.to_string(),
            verdict,
        }
    }

    fn probe(&self, client: &Client, username: &str) -> Result<Presence, CheckError> {
        match &self.heuristic {
            Heuristic::Status => {
                let page = client.fetch(&self.profile_url_for(username), &[])?;
                by_status(&page)
            }
            Heuristic::StatusUnlessMarked(markers) => {
                let page = client.fetch(&self.profile_url_for(username), &[])?;
                if contains_any(&page.body.to_lowercase(), markers) {
                    return Ok(Presence::NotFound);
                }
                by_status(&page)
            }
            Heuristic::InstagramApi { api_url } => {
                let page = client.fetch(
                    &expand(api_url, username),
                    &[("X-IG-App-ID", INSTAGRAM_APP_ID)],
                )?;
                instagram_presence(&page)
            }
            Heuristic::TwitterHtml => {
                let page = client.fetch(
                    &self.profile_url_for(username),
                    &[("Accept-Language", "en-US,en;q=0.9")],
                )?;
                Ok(twitter_presence(&page, username))
            }
        }
    }
}

fn by_status(page: &Page) -> Result<Presence, CheckError> {
    match page.status {
        200 => Ok(Presence::Found),
        404 => Ok(Presence::NotFound),
        other => Err(CheckError::UnexpectedStatus(other)),
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[derive(Deserialize)]
struct ProfileInfo {
    #[serde(default)]
    data: Option<ProfileData>,
}

#[derive(Deserialize)]
struct ProfileData {
    #[serde(default)]
    user: Option<serde_json::Value>,
}

fn instagram_presence(page: &Page) -> Result<Presence, CheckError> {
    match page.status {
        200 => {
            let info: ProfileInfo = serde_json::from_str(&page.body)
                .map_err(|e| CheckError::Parse(format!("instagram profile info: {e}")))?;
            let exists = info
                .data
                .and_then(|d| d.user)
                .is_some_and(|user| is_truthy(&user));
            Ok(if exists {
                Presence::Found
            } else {
                Presence::NotFound
            })
        }
        404 => Ok(Presence::NotFound),
        other => Err(CheckError::UnexpectedStatus(other)),
    }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are all empty.
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
    }
}

fn twitter_presence(page: &Page, username: &str) -> Presence {
    let html = page.body.to_lowercase();

    if contains_any(&html, TWITTER_MISSING) || page.status == 404 {
        return Presence::NotFound;
    }

    if html.contains("account suspended")
        || page.final_url.to_lowercase().contains("/account/suspended")
    {
        return Presence::Found;
    }

    let handle = username.to_lowercase();
    let markers = [
        format!("(@{handle}) / x"),
        format!("(@{handle}) / twitter"),
        format!("\"screen_name\":\"{handle}\""),
        format!("\"screen_name\": \"{handle}\""),
        format!("@{handle} \u{b7}"),
    ];
    if markers.iter().any(|m| html.contains(m.as_str())) {
        Presence::Found
    } else {
        debug!(variant = username, status = page.status, "twitter page ambiguous");
        Presence::NotFound
    }
}
