#[derive(thiserror::Error, Debug)]
pub enum AmenityError {
    #[error("Routing error: {0}")]
    Routing(#[from] crate::ors::error::OrsError),
}

pub type AmenityResult<T> = Result<T, AmenityError>;
