use url::Url;

use super::entities::{AmenityElement, OverpassResponse};
use super::error::{OverpassError, OverpassResult};

const QUERY_TEMPLATE: &str = r#"
    [out:json];
    (
      node["amenity"](around:<RADIUS>,<LATITUDE>,<LONGITUDE>);
      way["amenity"](around:<RADIUS>,<LATITUDE>,<LONGITUDE>);
      relation["amenity"](around:<RADIUS>,<LATITUDE>,<LONGITUDE>);
    );
    out center;
"#;

/// All amenities within `radius` metres of the point
pub fn amenity_query(lat: f64, lon: f64, radius: u32) -> String {
    QUERY_TEMPLATE
        .replace("<LATITUDE>", &lat.to_string())
        .replace("<LONGITUDE>", &lon.to_string())
        .replace("<RADIUS>", &radius.to_string())
}

/// Anything that can list the amenities around a point
#[allow(async_fn_in_trait)]
pub trait AmenitySource {
    async fn get_data(
        &self,
        lat: f64,
        lon: f64,
        radius: u32,
    ) -> OverpassResult<Vec<AmenityElement>>;
}

#[derive(Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    url: Url,
}

impl OverpassClient {
    pub fn new(url: &str) -> OverpassResult<Self> {
        let url = Url::parse(url).map_err(|e| OverpassError::Init(e.to_string()))?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| OverpassError::Init(e.to_string()))?;

        Ok(OverpassClient { client, url })
    }

    async fn request(&self, query: String) -> OverpassResult<OverpassResponse> {
        log::debug!("Requesting {}", self.url);
        log::trace!("Query: {}", query);
        let response = self
            .client
            .post(self.url.clone())
            .form(&[("data", query)])
            .send()
            .await?
            .error_for_status()?;

        let data_str = response.text().await?;
        log::trace!("Response: {}", data_str);
        let data = serde_json::from_str(&data_str)?;

        Ok(data)
    }
}

impl AmenitySource for OverpassClient {
    async fn get_data(
        &self,
        lat: f64,
        lon: f64,
        radius: u32,
    ) -> OverpassResult<Vec<AmenityElement>> {
        let OverpassResponse { elements } = self.request(amenity_query(lat, lon, radius)).await?;
        log::info!(
            "Found {} amenities within {}m of {},{}",
            elements.len(),
            radius,
            lat,
            lon
        );
        Ok(elements)
    }
}
