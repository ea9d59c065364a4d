use std::fmt::Display;
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{OrsError, OrsResult};

/// OpenRouteService routing profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    DrivingCar,
    DrivingHgv,
    CyclingRegular,
    CyclingRoad,
    CyclingMountain,
    CyclingElectric,
    #[default]
    FootWalking,
    FootHiking,
    Wheelchair,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::DrivingCar => "driving-car",
            TravelMode::DrivingHgv => "driving-hgv",
            TravelMode::CyclingRegular => "cycling-regular",
            TravelMode::CyclingRoad => "cycling-road",
            TravelMode::CyclingMountain => "cycling-mountain",
            TravelMode::CyclingElectric => "cycling-electric",
            TravelMode::FootWalking => "foot-walking",
            TravelMode::FootHiking => "foot-hiking",
            TravelMode::Wheelchair => "wheelchair",
        }
    }
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = OrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s {
            "driving-car" => TravelMode::DrivingCar,
            "driving-hgv" => TravelMode::DrivingHgv,
            "cycling-regular" => TravelMode::CyclingRegular,
            "cycling-road" => TravelMode::CyclingRoad,
            "cycling-mountain" => TravelMode::CyclingMountain,
            "cycling-electric" => TravelMode::CyclingElectric,
            "foot-walking" => TravelMode::FootWalking,
            "foot-hiking" => TravelMode::FootHiking,
            "wheelchair" => TravelMode::Wheelchair,
            other => return Err(OrsError::UnknownProfile(other.to_string())),
        };
        Ok(mode)
    }
}

#[derive(Serialize, Debug)]
pub struct DirectionsRequest {
    /// `[lon, lat]` pairs
    pub coordinates: Vec<[f64; 2]>,
}

impl DirectionsRequest {
    pub fn between(from: Point, to: Point) -> Self {
        DirectionsRequest {
            coordinates: vec![[from.x(), from.y()], [to.x(), to.y()]],
        }
    }
}

/// ORS leaves out zero-valued fields, e.g. for a route to the same point
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteSummary {
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Route {
    #[serde(default)]
    pub summary: RouteSummary,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Directions response, passed back to API callers as received
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RouteResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteResponse {
    pub fn summary(&self) -> OrsResult<RouteSummary> {
        self.routes
            .first()
            .map(|r| r.summary)
            .ok_or(OrsError::NoRoute)
    }
}
