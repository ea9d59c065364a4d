#[derive(thiserror::Error, Debug)]
pub enum OrsError {
    #[error("Init error: {0}")]
    Init(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("No route in response")]
    NoRoute,

    #[error("Unknown travel mode: {0}")]
    UnknownProfile(String),
}

pub type OrsResult<T> = Result<T, OrsError>;
