mod profile;
mod submissions;
mod types;

pub use types::RetryConfig;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

use codestreak_domain::activity::{ActivitySource, PlatformProfile, SubmissionRecord};
use codestreak_domain::shared::DomainError;
use codestreak_domain::user::ExternalHandle;

use types::{GraphQlError, GraphQlRequest, GraphQlResponse, HttpStatusError, USER_AGENT};

/// LeetCode GraphQL client
pub struct LeetCodeClient {
    client: Client,
    graphql_url: String,
    retry_config: RetryConfig,
}

impl LeetCodeClient {
    pub fn new(graphql_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_retry_config(graphql_url, timeout, RetryConfig::default())
    }

    pub fn with_retry_config(
        graphql_url: impl Into<String>,
        timeout: Duration,
        retry_config: RetryConfig,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            graphql_url: graphql_url.into(),
            retry_config,
        })
    }

    /// Execute a request with retry logic
    ///
    /// Retries on:
    /// - Network errors (connection failures, timeouts)
    /// - 5xx server errors
    /// - 429 Too Many Requests
    ///
    /// Does NOT retry on:
    /// - 4xx client errors (except 429)
    /// - GraphQL-level errors
    async fn execute_with_retry<F, Fut, T>(&self, operation_name: &str, mut request_fn: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        let mut backoff_ms = self.retry_config.initial_backoff_ms;

        loop {
            attempt += 1;

            match request_fn().await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!("✅ {} succeeded after {} attempts", operation_name, attempt);
                    }
                    return Ok(response);
                }
                Err(e) => {
                    let should_retry =
                        attempt <= self.retry_config.max_retries && is_retryable_error(&e);

                    if !should_retry {
                        if attempt > self.retry_config.max_retries {
                            warn!(
                                "❌ {} failed after {} attempts",
                                operation_name, attempt
                            );
                        }
                        return Err(e);
                    }

                    warn!(
                        "⚠️  {} failed (attempt {}/{}): {}. Retrying in {}ms...",
                        operation_name, attempt, self.retry_config.max_retries, e, backoff_ms
                    );

                    sleep(Duration::from_millis(backoff_ms)).await;

                    // Exponential backoff with cap
                    backoff_ms = ((backoff_ms as f64 * self.retry_config.backoff_multiplier)
                        as u64)
                        .min(self.retry_config.max_backoff_ms);
                }
            }
        }
    }

    /// Post one GraphQL query and decode its `data` member
    async fn post_graphql<V, D>(client: &Client, url: &str, query: &str, variables: V) -> Result<Option<D>>
    where
        V: Serialize,
        D: DeserializeOwned,
    {
        let response = client
            .post(url)
            .header(reqwest::header::REFERER, "https://leetcode.com")
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpStatusError { status }.into());
        }

        let body: GraphQlResponse<D> = response
            .json()
            .await
            .context("Failed to parse GraphQL response")?;

        if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(GraphQlError(joined).into());
        }

        Ok(body.data)
    }
}

/// Check if an error is retryable
fn is_retryable_error(error: &anyhow::Error) -> bool {
    if let Some(status_err) = error.downcast_ref::<HttpStatusError>() {
        return status_err.status.is_server_error()
            || status_err.status == StatusCode::TOO_MANY_REQUESTS;
    }

    if let Some(reqwest_err) = error.downcast_ref::<reqwest::Error>() {
        // Retry on network/connection errors
        if reqwest_err.is_connect() || reqwest_err.is_timeout() || reqwest_err.is_request() {
            return true;
        }

        if let Some(status) = reqwest_err.status() {
            return status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
        }
    }

    false
}

/// Convert a client failure into the domain error seen by callers
fn to_domain_error(operation: &str, error: anyhow::Error) -> DomainError {
    let timed_out = error
        .downcast_ref::<reqwest::Error>()
        .is_some_and(|e| e.is_timeout());

    if timed_out {
        DomainError::Timeout(format!("{}: {}", operation, error))
    } else {
        DomainError::ExternalService(format!("{}: {:#}", operation, error))
    }
}

#[async_trait]
impl ActivitySource for LeetCodeClient {
    async fn fetch_recent_submissions(
        &self,
        handle: &ExternalHandle,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, DomainError> {
        self.recent_submissions(handle.as_str(), limit)
            .await
            .map_err(|e| to_domain_error("Fetch recent submissions", e))
    }

    async fn fetch_profile(
        &self,
        handle: &ExternalHandle,
    ) -> Result<Option<PlatformProfile>, DomainError> {
        self.user_profile(handle.as_str())
            .await
            .map_err(|e| to_domain_error("Fetch user profile", e))
    }
}
