use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("trends API error: {0}")]
    Api(String),

    #[error("index error: {0}")]
    Index(String),

    #[error("invalid trend: {0}")]
    Validation(String),
}
