use anyhow::{Context, Result};
use serde_json::json;

use codestreak_domain::activity::SubmissionRecord;

use super::types::{RawSubmission, RecentSubmissionsData, RECENT_SUBMISSIONS_QUERY};

impl super::LeetCodeClient {
    /// Recent submissions for a handle, newest first, with retry
    pub async fn recent_submissions(&self, username: &str, limit: u32) -> Result<Vec<SubmissionRecord>> {
        let url = self.graphql_url.clone();
        let username = username.to_string();

        let data: Option<RecentSubmissionsData> = self
            .execute_with_retry("Get recent submissions", || {
                let client = self.client.clone();
                let url = url.clone();
                let variables = json!({ "username": username, "limit": limit });

                async move {
                    Self::post_graphql(&client, &url, RECENT_SUBMISSIONS_QUERY, variables).await
                }
            })
            .await?;

        data.and_then(|d| d.recent_submission_list)
            .unwrap_or_default()
            .into_iter()
            .map(into_record)
            .collect()
    }
}

fn into_record(raw: RawSubmission) -> Result<SubmissionRecord> {
    let timestamp = raw
        .timestamp
        .trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid submission timestamp '{}'", raw.timestamp))?;

    Ok(SubmissionRecord {
        title: raw.title,
        title_slug: raw.title_slug,
        timestamp,
        status: raw.status_display,
        language: raw.lang,
    })
}
