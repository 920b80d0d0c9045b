use std::time::Duration;

/// Upper bounds for every call that leaves the process
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// One activity-source query including retries (default: 15 seconds)
    pub activity_query: Duration,

    /// One notification dispatch (default: 20 seconds)
    pub dispatch: Duration,

    /// Single HTTP request to an external API (default: 10 seconds)
    pub http_request: Duration,

    /// Database query timeout (default: 10 seconds)
    pub db_query: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            activity_query: Duration::from_secs(15),
            dispatch: Duration::from_secs(20),
            http_request: Duration::from_secs(10),
            db_query: Duration::from_secs(10),
        }
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set activity query timeout
    pub fn with_activity_query(mut self, duration: Duration) -> Self {
        self.activity_query = duration;
        self
    }

    /// Builder pattern: set dispatch timeout
    pub fn with_dispatch(mut self, duration: Duration) -> Self {
        self.dispatch = duration;
        self
    }

    /// Builder pattern: set HTTP request timeout
    pub fn with_http_request(mut self, duration: Duration) -> Self {
        self.http_request = duration;
        self
    }

    /// Builder pattern: set database query timeout
    pub fn with_db_query(mut self, duration: Duration) -> Self {
        self.db_query = duration;
        self
    }
}
