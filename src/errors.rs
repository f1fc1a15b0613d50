use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageSightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Page driver error: {0}")]
    Driver(String),

    #[error("Scan error: {0}")]
    Scan(String),

    #[error("Overlay error: {0}")]
    Overlay(String),

    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Memory store error: {0}")]
    Memory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type PageSightResult<T> = Result<T, PageSightError>;
