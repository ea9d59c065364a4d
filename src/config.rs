use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::amenities::{WalkSettings, WalkSettingsBuilder};

const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/";
const DEFAULT_OVERPASS_URL: &str = "http://overpass-api.de/api/interpreter";
const DEFAULT_ORS_URL: &str = "https://api.openrouteservice.org/";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Could not build settings: {0}")]
    Settings(String),
}

impl From<ConfigError> for std::io::Error {
    fn from(e: ConfigError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_address: String,
    pub allow_origin: Option<String>,
    pub nominatim_url: String,
    pub nominatim_user_agent: String,
    pub geocode_min_delay: Duration,
    pub overpass_url: String,
    pub ors_url: String,
    pub ors_api_key: Option<String>,
    pub search_radius_metres: u32,
    pub walkable_seconds: f64,
    pub route_delay: Duration,
    pub survey_delay: Duration,
    pub result_path: PathBuf,
    pub survey_csv_path: PathBuf,
    pub survey_file: Option<PathBuf>,
    pub job_queue_capacity: usize,
}

impl Config {
    pub fn from_env() -> ConfigResult<Config> {
        Ok(Config {
            listen_address: string_or("LISTEN_ADDRESS", "127.0.0.1:8080"),
            allow_origin: env::var("ALLOW_ORIGIN").ok(),
            nominatim_url: string_or("NOMINATIM_URL", DEFAULT_NOMINATIM_URL),
            nominatim_user_agent: string_or("NOMINATIM_USER_AGENT", "stroll"),
            geocode_min_delay: Duration::from_millis(parse_or("GEOCODE_MIN_DELAY_MS", 1000)?),
            overpass_url: string_or("OVERPASS_URL", DEFAULT_OVERPASS_URL),
            ors_url: string_or("ORS_URL", DEFAULT_ORS_URL),
            ors_api_key: env::var("ORS_API_KEY").ok().filter(|k| !k.is_empty()),
            search_radius_metres: parse_or("SEARCH_RADIUS_METRES", 1000)?,
            walkable_seconds: parse_or("WALKABLE_SECONDS", 900.0)?,
            route_delay: Duration::from_millis(parse_or("ROUTE_DELAY_MS", 1500)?),
            survey_delay: Duration::from_millis(parse_or("SURVEY_DELAY_MS", 1200)?),
            result_path: string_or("RESULT_PATH", "result.json").into(),
            survey_csv_path: string_or("SURVEY_CSV_PATH", "result.csv").into(),
            survey_file: env::var("SURVEY_FILE").ok().map(PathBuf::from),
            job_queue_capacity: positive_or("JOB_QUEUE_CAPACITY", 16)?,
        })
    }

    /// Settings for the amenity aggregation
    pub fn walk_settings(&self) -> ConfigResult<WalkSettings> {
        WalkSettingsBuilder::default()
            .max_duration_secs(self.walkable_seconds)
            .pacing(self.route_delay)
            .build()
            .map_err(|e| ConfigError::Settings(e.to_string()))
    }

    /// Same threshold as the aggregation, paced for the tram survey
    pub fn survey_settings(&self) -> ConfigResult<WalkSettings> {
        WalkSettingsBuilder::default()
            .max_duration_secs(self.walkable_seconds)
            .pacing(self.survey_delay)
            .build()
            .map_err(|e| ConfigError::Settings(e.to_string()))
    }
}

fn string_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(name: &'static str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: value.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn positive_or(name: &'static str, default: usize) -> ConfigResult<usize> {
    match parse_or(name, default)? {
        0 => Err(ConfigError::Invalid {
            name,
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        }),
        value => Ok(value),
    }
}
