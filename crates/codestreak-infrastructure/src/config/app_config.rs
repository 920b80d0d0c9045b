use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use codestreak_domain::notification::{ChannelConfig, ChannelType};
use codestreak_domain::shared::{DomainError, TimeBasis};
use codestreak_domain::streak::StreakPolicy;

use super::timeouts::TimeoutConfig;
use crate::notification::from_address_for_domain;

const DEFAULT_LEETCODE_GRAPHQL_URL: &str = "https://leetcode.com/graphql/";
const DEFAULT_RESEND_BASE_URL: &str = "https://api.resend.com";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_FROM: &str = "LeetCode Reminder <noreply@codestreak.local>";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`)
    pub host: String,
    /// Bind port (default: `3000`)
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`)
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Run the in-process minute ticker
    pub enabled: bool,
    pub time_basis: TimeBasis,
    pub streak_policy: StreakPolicy,
}

#[derive(Debug, Clone)]
pub struct LeetCodeConfig {
    pub graphql_url: String,
    /// Look the handle up on the platform before linking it
    pub validate_handles: bool,
}

/// Service configuration loaded from the environment.
///
/// | Env Var                     | Default                                   |
/// |-----------------------------|-------------------------------------------|
/// | `HOST`                      | `0.0.0.0`                                 |
/// | `PORT`                      | `3000`                                    |
/// | `REQUEST_TIMEOUT_SECS`      | `30`                                      |
/// | `DATABASE_PATH`             | `{data_dir}/codestreak/codestreak.db`     |
/// | `LOG_DIR`                   | `{data_dir}/codestreak/logs`              |
/// | `CRON_SECRET`               | unset                                     |
/// | `SCHEDULER_ENABLED`         | `true`                                    |
/// | `REMINDER_UTC_OFFSET`       | unset (server local time)                 |
/// | `STREAK_MISS_POLICY`        | `lazy`                                    |
/// | `LEETCODE_GRAPHQL_URL`      | `https://leetcode.com/graphql/`           |
/// | `LEETCODE_VALIDATE_HANDLES` | `false`                                   |
/// | `EMAIL_PROVIDER`            | `log`                                     |
/// | `SMTP_HOST` / `SMTP_PORT`   | required for smtp / `587`                 |
/// | `SMTP_FROM`                 | `LeetCode Reminder <noreply@codestreak.local>` |
/// | `SMTP_USER` / `SMTP_PASSWORD` | unset                                   |
/// | `RESEND_API_KEY`            | required for resend                       |
/// | `RESEND_BASE_URL`           | `https://api.resend.com`                  |
/// | `EMAIL_FROM_DOMAIN`         | `resend.dev`                              |
/// | `ACTIVITY_TIMEOUT_SECS`     | `15`                                      |
/// | `DISPATCH_TIMEOUT_SECS`     | `20`                                      |
/// | `DB_QUERY_TIMEOUT_SECS`     | `10`                                      |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    pub cron_secret: Option<String>,
    pub scheduler: SchedulerConfig,
    pub leetcode: LeetCodeConfig,
    pub email: ChannelConfig,
    pub timeouts: TimeoutConfig,
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, DomainError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("codestreak");

        let server = ServerConfig {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "PORT", 3000)?,
            request_timeout_secs: parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?,
        };

        let scheduler = SchedulerConfig {
            enabled: parse_bool(&get, "SCHEDULER_ENABLED", true)?,
            time_basis: match get("REMINDER_UTC_OFFSET") {
                Some(raw) => TimeBasis::parse_offset(&raw)?,
                None => TimeBasis::Local,
            },
            streak_policy: match get("STREAK_MISS_POLICY") {
                Some(raw) => StreakPolicy::from_str(&raw)?,
                None => StreakPolicy::LazyBreak,
            },
        };

        let graphql_url = get("LEETCODE_GRAPHQL_URL")
            .unwrap_or_else(|| DEFAULT_LEETCODE_GRAPHQL_URL.to_string());
        url::Url::parse(&graphql_url).map_err(|e| {
            DomainError::Configuration(format!("Invalid LEETCODE_GRAPHQL_URL: {}", e))
        })?;

        let leetcode = LeetCodeConfig {
            graphql_url,
            validate_handles: parse_bool(&get, "LEETCODE_VALIDATE_HANDLES", false)?,
        };

        let email = email_from_lookup(&get)?;
        email.validate()?;

        let timeouts = TimeoutConfig::new()
            .with_activity_query(Duration::from_secs(parse_or(
                &get,
                "ACTIVITY_TIMEOUT_SECS",
                15,
            )?))
            .with_dispatch(Duration::from_secs(parse_or(
                &get,
                "DISPATCH_TIMEOUT_SECS",
                20,
            )?))
            .with_db_query(Duration::from_secs(parse_or(
                &get,
                "DB_QUERY_TIMEOUT_SECS",
                10,
            )?));

        Ok(Self {
            server,
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("codestreak.db")),
            log_dir: get("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir.join("logs")),
            cron_secret: get("CRON_SECRET"),
            scheduler,
            leetcode,
            email,
            timeouts,
        })
    }
}

fn email_from_lookup<G>(get: &G) -> Result<ChannelConfig, DomainError>
where
    G: Fn(&str) -> Option<String>,
{
    let provider = match get("EMAIL_PROVIDER") {
        Some(raw) => ChannelType::from_str(&raw)
            .map_err(|_| DomainError::Configuration(format!("Unknown EMAIL_PROVIDER: {}", raw)))?,
        None => ChannelType::Log,
    };

    let config = match provider {
        ChannelType::Smtp => ChannelConfig::Smtp {
            host: get("SMTP_HOST").ok_or_else(|| {
                DomainError::Configuration("SMTP_HOST is required for the smtp provider".to_string())
            })?,
            port: parse_or(get, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            from_address: get("SMTP_FROM").unwrap_or_else(|| DEFAULT_SMTP_FROM.to_string()),
            username: get("SMTP_USER"),
            password: get("SMTP_PASSWORD"),
        },
        ChannelType::Resend => ChannelConfig::Resend {
            api_key: get("RESEND_API_KEY").ok_or_else(|| {
                DomainError::Configuration(
                    "RESEND_API_KEY is required for the resend provider".to_string(),
                )
            })?,
            from_address: from_address_for_domain(get("EMAIL_FROM_DOMAIN").as_deref()),
            base_url: get("RESEND_BASE_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_BASE_URL.to_string()),
        },
        ChannelType::Log => ChannelConfig::Log,
    };

    Ok(config)
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> Result<T, DomainError>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            DomainError::Configuration(format!("{} has an invalid value: {}", key, raw))
        }),
        None => Ok(default),
    }
}

fn parse_bool<G>(get: &G, key: &str, default: bool) -> Result<bool, DomainError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(DomainError::Configuration(format!(
            "{} must be a boolean, got {}",
            key, v
        ))),
    }
}
