#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::DateTime;
use http_body_util::BodyExt;
use tokio::sync::{Mutex, RwLock};
use tower::ServiceExt;

use codestreak_app::presentation::{
    assemble_app_state, build_app_router, AppState, ExternalAdapters,
};
use codestreak_domain::activity::{ActivitySource, PlatformProfile, SubmissionRecord};
use codestreak_domain::notification::{NotificationMessage, NotificationSender, TemplateKind};
use codestreak_domain::shared::{DomainError, FixedClock, UserId};
use codestreak_domain::user::{ExternalHandle, User};
use codestreak_infrastructure::config::AppConfig;
use codestreak_infrastructure::persistence::Database;

pub const CRON_SECRET: &str = "test-cron-secret";

/// Every test app runs at this instant
pub const NOW: &str = "2026-10-15T21:00:00+00:00";

pub fn now_epoch() -> i64 {
    DateTime::parse_from_rfc3339(NOW).unwrap().timestamp()
}

/// Config with a cron secret, UTC basis and the dry-run email channel
pub fn test_config() -> AppConfig {
    config_from(&[("CRON_SECRET", CRON_SECRET), ("REMINDER_UTC_OFFSET", "+00:00")])
}

pub fn config_from(vars: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Scripted activity source keyed by handle
#[derive(Default)]
pub struct StubSource {
    submissions: RwLock<HashMap<String, Vec<SubmissionRecord>>>,
    profiles: RwLock<HashMap<String, PlatformProfile>>,
    failing: RwLock<HashSet<String>>,
}

impl StubSource {
    pub async fn push_submission(&self, handle: &str, title: &str, timestamp: i64, status: &str) {
        let record = SubmissionRecord {
            title: title.to_string(),
            title_slug: title.to_lowercase().replace(' ', "-"),
            timestamp,
            status: status.to_string(),
            language: "rust".to_string(),
        };
        self.submissions
            .write()
            .await
            .entry(handle.to_string())
            .or_default()
            .insert(0, record);
    }

    pub async fn set_profile(&self, handle: &str, total_solved: u32) {
        self.profiles.write().await.insert(
            handle.to_string(),
            PlatformProfile {
                username: handle.to_string(),
                total_solved,
                easy_solved: total_solved,
                medium_solved: 0,
                hard_solved: 0,
                total_submissions: total_solved * 2,
                ranking: 123_456,
                reputation: 7,
            },
        );
    }

    pub async fn fail(&self, handle: &str) {
        self.failing.write().await.insert(handle.to_string());
    }
}

#[async_trait]
impl ActivitySource for StubSource {
    async fn fetch_recent_submissions(
        &self,
        handle: &ExternalHandle,
        limit: u32,
    ) -> Result<Vec<SubmissionRecord>, DomainError> {
        if self.failing.read().await.contains(handle.as_str()) {
            return Err(DomainError::ExternalService("stub outage".to_string()));
        }
        Ok(self
            .submissions
            .read()
            .await
            .get(handle.as_str())
            .map(|subs| subs.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn fetch_profile(
        &self,
        handle: &ExternalHandle,
    ) -> Result<Option<PlatformProfile>, DomainError> {
        Ok(self.profiles.read().await.get(handle.as_str()).cloned())
    }
}

/// Sender that keeps every accepted message
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<NotificationMessage>>,
}

impl RecordingSender {
    pub async fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_of(&self, kind: TemplateKind) -> Vec<NotificationMessage> {
        self.sent()
            .await
            .into_iter()
            .filter(|m| m.kind() == kind)
            .collect()
    }

    /// Poll until `count` messages of `kind` arrived; detached sends land later
    pub async fn wait_for(&self, kind: TemplateKind, count: usize) -> Vec<NotificationMessage> {
        for _ in 0..100 {
            let sent = self.sent_of(kind).await;
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.sent_of(kind).await
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "recording"
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub source: Arc<StubSource>,
    pub sender: Arc<RecordingSender>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub async fn seed_user(&self, email: &str, username: &str) -> UserId {
        let user = User::new(email.to_string(), username.to_string()).unwrap();
        self.state.repositories.user.save(&user).await.unwrap();
        user.id().clone()
    }
}

pub async fn build_test_app() -> TestApp {
    build_test_app_with(test_config(), Database::in_memory().await.unwrap()).await
}

pub async fn build_test_app_with(config: AppConfig, database: Database) -> TestApp {
    let source = Arc::new(StubSource::default());
    let sender = Arc::new(RecordingSender::default());
    let now = DateTime::parse_from_rfc3339(NOW).unwrap();

    let state = assemble_app_state(
        &config,
        database,
        ExternalAdapters {
            activity_source: source.clone(),
            sender: sender.clone(),
            clock: Arc::new(FixedClock::new(now)),
        },
    )
    .await
    .unwrap();

    let router = build_app_router(state.clone(), Duration::from_secs(30));

    TestApp {
        router,
        state,
        source,
        sender,
    }
}

pub async fn get(app: Router, path: &str) -> Response<Body> {
    send(app, Method::GET, path, None, None).await
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, path, Some(body), None).await
}

pub async fn send(
    app: Router,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
    bearer: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Seed a user, link `handle` and set reminder times through the API
pub async fn link_user(app: &TestApp, username: &str, handle: &str, times: &[&str]) -> String {
    let user_id = app
        .seed_user(&format!("{}@example.com", username), username)
        .await
        .to_string();

    let response = post_json(
        app.app(),
        &format!("/api/users/{}/leetcode/connect", user_id),
        serde_json::json!({ "leetcodeUsername": handle }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let response = post_json(
        app.app(),
        &format!("/api/users/{}/reminders/settings", user_id),
        serde_json::json!({ "reminderEnabled": true, "reminderTimes": times }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    user_id
}
