#[derive(thiserror::Error, Debug)]
pub enum OverpassError {
    #[error("Init error: {0}")]
    Init(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

pub type OverpassResult<T> = Result<T, OverpassError>;
