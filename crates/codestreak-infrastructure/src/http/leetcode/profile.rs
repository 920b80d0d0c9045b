use anyhow::Result;
use serde_json::json;

use codestreak_domain::activity::PlatformProfile;

use super::types::{MatchedUser, ProfileData, USER_PROFILE_QUERY};

impl super::LeetCodeClient {
    /// Public profile statistics; `None` when the handle does not exist
    pub async fn user_profile(&self, username: &str) -> Result<Option<PlatformProfile>> {
        let url = self.graphql_url.clone();
        let username = username.to_string();

        let data: Option<ProfileData> = self
            .execute_with_retry("Get user profile", || {
                let client = self.client.clone();
                let url = url.clone();
                let variables = json!({ "username": username });

                async move { Self::post_graphql(&client, &url, USER_PROFILE_QUERY, variables).await }
            })
            .await?;

        Ok(data.and_then(|d| d.matched_user).map(into_profile))
    }
}

fn into_profile(user: MatchedUser) -> PlatformProfile {
    let stats = user
        .submit_stats
        .map(|s| s.ac_submission_num)
        .unwrap_or_default();

    let solved = |difficulty: &str| {
        stats
            .iter()
            .find(|s| s.difficulty == difficulty)
            .map_or(0, |s| s.count)
    };

    let easy_solved = solved("Easy");
    let medium_solved = solved("Medium");
    let hard_solved = solved("Hard");
    let total_submissions = stats.iter().map(|s| s.submissions).sum();

    let (ranking, reputation) = user
        .profile
        .map(|p| (p.ranking.unwrap_or(0), p.reputation.unwrap_or(0)))
        .unwrap_or((0, 0));

    PlatformProfile {
        username: user.username,
        total_solved: easy_solved + medium_solved + hard_solved,
        easy_solved,
        medium_solved,
        hard_solved,
        total_submissions,
        ranking,
        reputation,
    }
}
