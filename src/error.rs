use actix_web::{HttpResponse, ResponseError};
use actix_web::http::StatusCode;

use crate::config::ConfigError;
use crate::jobs::JobError;
use crate::nominatim::error::NominatimError;
use crate::ors::error::OrsError;
use crate::overpass::error::OverpassError;
use crate::store::StoreError;
use crate::survey::SurveyError;

#[derive(thiserror::Error, Debug)]
pub enum StrollError {
    #[error("Geocoding error: {0}")]
    Nominatim(#[from] NominatimError),

    #[error("Overpass error: {0}")]
    Overpass(#[from] OverpassError),

    #[error("Routing error: {0}")]
    Ors(#[from] OrsError),

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Result error: {0}")]
    Store(#[from] StoreError),

    #[error("Survey error: {0}")]
    Survey(#[from] SurveyError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<StrollError> for std::io::Error {
    fn from(e: StrollError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, e)
    }
}

/// Every failure is a plain 500, details only go to the log
impl ResponseError for StrollError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        log::error!("{}", self);
        HttpResponse::InternalServerError().finish()
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub type StrollResult<T> = Result<T, StrollError>;
