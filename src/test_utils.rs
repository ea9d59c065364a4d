use std::sync::Mutex;

use geo::Point;

use crate::nominatim::client::Geocoder;
use crate::nominatim::error::{NominatimError, NominatimResult};
use crate::ors::entities::{Route, RouteResponse, RouteSummary, TravelMode};
use crate::ors::error::{OrsError, OrsResult};
use crate::ors::Router;
use crate::overpass::client::AmenitySource;
use crate::overpass::entities::AmenityElement;
use crate::overpass::error::OverpassResult;

pub fn init() {
    dotenvy::from_filename(".dev.vars").ok();
    env_logger::builder().is_test(true).try_init().ok();
}

/// Router answering with canned durations keyed by destination
#[derive(Default)]
pub struct ScriptedRouter {
    durations: Vec<(Point, f64)>,
    default_duration: Option<f64>,
    fail: bool,
    destinations: Mutex<Vec<Point>>,
    modes: Mutex<Vec<TravelMode>>,
}

impl ScriptedRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, to: Point, duration: f64) -> Self {
        self.durations.push((to, duration));
        self
    }

    pub fn with_default(mut self, duration: f64) -> Self {
        self.default_duration = Some(duration);
        self
    }

    pub fn destinations(&self) -> Vec<Point> {
        self.destinations.lock().unwrap().clone()
    }

    pub fn modes(&self) -> Vec<TravelMode> {
        self.modes.lock().unwrap().clone()
    }
}

impl Router for ScriptedRouter {
    async fn route(&self, _from: Point, to: Point, mode: TravelMode) -> OrsResult<RouteResponse> {
        self.destinations.lock().unwrap().push(to);
        self.modes.lock().unwrap().push(mode);

        if self.fail {
            return Err(OrsError::NoRoute);
        }

        let duration = self
            .durations
            .iter()
            .find(|(p, _)| *p == to)
            .map(|(_, d)| *d)
            .or(self.default_duration)
            .ok_or(OrsError::NoRoute)?;

        Ok(RouteResponse {
            routes: vec![Route {
                summary: RouteSummary {
                    distance: duration * 1.4,
                    duration,
                },
                extra: Default::default(),
            }],
            extra: Default::default(),
        })
    }
}

/// Geocoder that knows a fixed set of addresses
#[derive(Default)]
pub struct ScriptedGeocoder {
    places: Vec<(String, Point)>,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, address: &str, location: Point) -> Self {
        self.places.push((address.to_string(), location));
        self
    }
}

impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, address: &str) -> NominatimResult<Point> {
        self.places
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, p)| *p)
            .ok_or_else(|| NominatimError::NotFound(address.to_string()))
    }
}

/// Amenity source returning the same elements for every search, remembering the searches
#[derive(Default)]
pub struct ScriptedAmenities {
    elements: Vec<AmenityElement>,
    searches: Mutex<Vec<(f64, f64, u32)>>,
}

impl ScriptedAmenities {
    pub fn new(elements: Vec<AmenityElement>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    /// `(lat, lon, radius)` of every search so far
    pub fn searches(&self) -> Vec<(f64, f64, u32)> {
        self.searches.lock().unwrap().clone()
    }
}

impl AmenitySource for ScriptedAmenities {
    async fn get_data(
        &self,
        lat: f64,
        lon: f64,
        radius: u32,
    ) -> OverpassResult<Vec<AmenityElement>> {
        self.searches.lock().unwrap().push((lat, lon, radius));
        Ok(self.elements.clone())
    }
}
