use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown copy variant: {0}")]
    UnknownVariant(String),

    #[error("unknown tone: {0}")]
    UnknownTone(String),

    #[error("unknown content format: {0}")]
    UnknownFormat(String),
}
