use serde::{Deserialize, Serialize};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

pub(super) const RECENT_SUBMISSIONS_QUERY: &str = r#"
query getRecentSubmissions($username: String!, $limit: Int!) {
  recentSubmissionList(username: $username, limit: $limit) {
    title
    titleSlug
    timestamp
    statusDisplay
    lang
  }
}
"#;

pub(super) const USER_PROFILE_QUERY: &str = r#"
query getUserProfile($username: String!) {
  matchedUser(username: $username) {
    username
    submitStats {
      acSubmissionNum {
        difficulty
        count
        submissions
      }
    }
    profile {
      ranking
      reputation
    }
  }
}
"#;

/// HTTP retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds (default: 1000ms)
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds (default: 10000ms)
    pub max_backoff_ms: u64,
    /// Backoff multiplier (default: 2.0 for exponential backoff)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 10000,
            backoff_multiplier: 2.0,
        }
    }
}

/// Error raised when the GraphQL body carries an `errors` array
#[derive(Debug, thiserror::Error)]
#[error("GraphQL errors: {0}")]
pub(super) struct GraphQlError(pub String);

/// Non-2xx reply, kept apart from transport errors so the retry loop can inspect the status
#[derive(Debug, thiserror::Error)]
#[error("LeetCode returned HTTP {status}")]
pub(super) struct HttpStatusError {
    pub status: reqwest::StatusCode,
}

#[derive(Debug, Serialize)]
pub(super) struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlResponse<D> {
    pub data: Option<D>,
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQlErrorEntry {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RecentSubmissionsData {
    pub recent_submission_list: Option<Vec<RawSubmission>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawSubmission {
    pub title: String,
    pub title_slug: String,
    /// Epoch seconds, sent as a string
    pub timestamp: String,
    pub status_display: String,
    pub lang: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProfileData {
    pub matched_user: Option<MatchedUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MatchedUser {
    pub username: String,
    pub submit_stats: Option<SubmitStats>,
    pub profile: Option<ProfileStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubmitStats {
    pub ac_submission_num: Vec<DifficultyCount>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DifficultyCount {
    pub difficulty: String,
    pub count: u32,
    pub submissions: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProfileStats {
    pub ranking: Option<u32>,
    pub reputation: Option<u32>,
}
