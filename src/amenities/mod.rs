mod error;
pub mod pipeline;
pub mod taxonomy;

pub use error::AmenityError;
pub use pipeline::{process_result, WalkSettings, WalkSettingsBuilder};
