#[derive(thiserror::Error, Debug)]
pub enum NominatimError {
    #[error("Init error: {0}")]
    Init(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Address not found: {0}")]
    NotFound(String),

    #[error("Invalid coordinate in response: {0}")]
    InvalidCoordinate(#[from] std::num::ParseFloatError),
}

pub type NominatimResult<T> = Result<T, NominatimError>;
