use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub catalog_path: PathBuf,
    /// Bearer key for the TickerTrends API. `None` selects the built-in
    /// static trend table.
    pub tickertrends_api_key: Option<String>,
    pub tickertrends_base_url: Option<String>,
    /// Qdrant base URL for the trend index. `None` disables index writes.
    pub index_url: Option<String>,
    pub index_collection: String,
    pub trends_region: String,
    pub trends_limit: usize,
    pub trends_time_range: String,
    pub min_relevance_score: f64,
    pub max_briefs_per_scan: usize,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("catalog_path", &self.catalog_path)
            .field("database_url", &"[redacted]")
            .field(
                "tickertrends_api_key",
                &self.tickertrends_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("tickertrends_base_url", &self.tickertrends_base_url)
            .field("index_url", &self.index_url)
            .field("index_collection", &self.index_collection)
            .field("trends_region", &self.trends_region)
            .field("trends_limit", &self.trends_limit)
            .field("trends_time_range", &self.trends_time_range)
            .field("min_relevance_score", &self.min_relevance_score)
            .field("max_briefs_per_scan", &self.max_briefs_per_scan)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
