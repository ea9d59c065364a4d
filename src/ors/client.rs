use geo::Point;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use url::Url;

use super::entities::{DirectionsRequest, RouteResponse, TravelMode};
use super::error::{OrsError, OrsResult};

/// Anything that can produce a route between two points
#[allow(async_fn_in_trait)]
pub trait Router {
    async fn route(&self, from: Point, to: Point, mode: TravelMode) -> OrsResult<RouteResponse>;
}

#[derive(Clone)]
pub struct OrsClient {
    client: reqwest::Client,
    base_url: Url,
}

impl OrsClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> OrsResult<OrsClient> {
        let mut base_url = Url::parse(base_url).map_err(|e| OrsError::Init(e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let mut value =
                HeaderValue::from_str(key).map_err(|e| OrsError::Init(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        } else {
            log::warn!("No OpenRouteService API key set, requests may be refused");
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| OrsError::Init(e.to_string()))?;

        Ok(OrsClient { client, base_url })
    }

    fn url(&self, mode: TravelMode) -> OrsResult<Url> {
        self.base_url
            .join(&format!("v2/directions/{}/json", mode))
            .map_err(|e| OrsError::Init(e.to_string()))
    }

    async fn request<T>(&self, url: Url, body: &DirectionsRequest) -> OrsResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        log::debug!("Requesting {} {:?}", url, body.coordinates);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        let data_str = response.text().await?;
        log::trace!("Response: {}", data_str);
        let data = serde_json::from_str(&data_str)?;

        Ok(data)
    }
}

impl Router for OrsClient {
    async fn route(&self, from: Point, to: Point, mode: TravelMode) -> OrsResult<RouteResponse> {
        let url = self.url(mode)?;
        self.request(url, &DirectionsRequest::between(from, to)).await
    }
}
