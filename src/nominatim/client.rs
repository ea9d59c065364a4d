use geo::Point;
use url::Url;

use super::entities::Place;
use super::error::{NominatimError, NominatimResult};
use crate::ratelimit::RateLimiter;

/// Anything that can turn an address into a point
#[allow(async_fn_in_trait)]
pub trait Geocoder {
    async fn geocode(&self, address: &str) -> NominatimResult<Point>;
}

#[derive(Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: Url,
    limiter: RateLimiter,
}

impl NominatimClient {
    pub fn new(base_url: &str, user_agent: &str, limiter: RateLimiter) -> NominatimResult<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| NominatimError::Init(e.to_string()))?;
        // joined against below, so a last segment without '/' would be replaced
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        // Nominatim's usage policy rejects requests without an identifying agent
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| NominatimError::Init(e.to_string()))?;

        Ok(NominatimClient {
            client,
            base_url,
            limiter,
        })
    }

    fn search_url(&self, address: &str) -> NominatimResult<Url> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| NominatimError::Init(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", address)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        Ok(url)
    }

    async fn request(&self, url: Url) -> NominatimResult<Vec<Place>> {
        self.limiter.wait().await;

        log::debug!("Requesting {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;

        let data_str = response.text().await?;
        log::trace!("Response: {}", data_str);
        let data = serde_json::from_str(&data_str)?;

        Ok(data)
    }
}

impl Geocoder for NominatimClient {
    /// Resolves a free-text address to a point (x = longitude, y = latitude).
    async fn geocode(&self, address: &str) -> NominatimResult<Point> {
        let url = self.search_url(address)?;
        let places = self.request(url).await?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| NominatimError::NotFound(address.to_string()))?;

        let location = place_location(&place)?;
        log::debug!("Geocoded '{}' to {:?} ({})", address, location, place.display_name);
        Ok(location)
    }
}

fn place_location(place: &Place) -> NominatimResult<Point> {
    let lat: f64 = place.lat.parse()?;
    let lon: f64 = place.lon.parse()?;
    Ok(Point::new(lon, lat))
}
