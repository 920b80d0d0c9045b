use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// Email delivery provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// SMTP relay
    Smtp,
    /// Resend HTTP API
    Resend,
    /// Dry run, writes the rendered email to the log
    Log,
}

impl ChannelType {
    pub fn as_str(&self) -> &str {
        match self {
            ChannelType::Smtp => "smtp",
            ChannelType::Resend => "resend",
            ChannelType::Log => "log",
        }
    }
}

impl FromStr for ChannelType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(ChannelType::Smtp),
            "resend" => Ok(ChannelType::Resend),
            "log" => Ok(ChannelType::Log),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown channel type: {other}"
            ))),
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channel configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelConfig {
    Smtp {
        host: String,
        port: u16,
        from_address: String,
        username: Option<String>,
        password: Option<String>,
    },
    Resend {
        api_key: String,
        from_address: String,
        base_url: String,
    },
    Log,
}

impl ChannelConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            ChannelConfig::Smtp {
                host,
                port,
                from_address,
                username,
                password,
            } => {
                if host.trim().is_empty() {
                    return Err(DomainError::Configuration(
                        "SMTP host cannot be empty".to_string(),
                    ));
                }
                if *port == 0 {
                    return Err(DomainError::Configuration(
                        "SMTP port must be greater than 0".to_string(),
                    ));
                }
                if from_address.trim().is_empty() {
                    return Err(DomainError::Configuration(
                        "From address cannot be empty".to_string(),
                    ));
                }
                if username.is_some() != password.is_some() {
                    return Err(DomainError::Configuration(
                        "SMTP username and password must be set together".to_string(),
                    ));
                }
            }
            ChannelConfig::Resend {
                api_key,
                from_address,
                base_url,
            } => {
                if api_key.trim().is_empty() {
                    return Err(DomainError::Configuration(
                        "RESEND_API_KEY cannot be empty".to_string(),
                    ));
                }
                if from_address.trim().is_empty() {
                    return Err(DomainError::Configuration(
                        "From address cannot be empty".to_string(),
                    ));
                }
                if base_url.trim().is_empty() {
                    return Err(DomainError::Configuration(
                        "Resend base URL cannot be empty".to_string(),
                    ));
                }
            }
            ChannelConfig::Log => {}
        }
        Ok(())
    }

    /// Get channel type from config
    pub fn channel_type(&self) -> ChannelType {
        match self {
            ChannelConfig::Smtp { .. } => ChannelType::Smtp,
            ChannelConfig::Resend { .. } => ChannelType::Resend,
            ChannelConfig::Log => ChannelType::Log,
        }
    }
}

// Credentials stay out of logs
impl fmt::Debug for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelConfig::Smtp {
                host,
                port,
                from_address,
                username,
                ..
            } => f
                .debug_struct("Smtp")
                .field("host", host)
                .field("port", port)
                .field("from_address", from_address)
                .field("username", username)
                .field("password", &"***")
                .finish(),
            ChannelConfig::Resend {
                from_address,
                base_url,
                ..
            } => f
                .debug_struct("Resend")
                .field("api_key", &"***")
                .field("from_address", from_address)
                .field("base_url", base_url)
                .finish(),
            ChannelConfig::Log => f.write_str("Log"),
        }
    }
}
