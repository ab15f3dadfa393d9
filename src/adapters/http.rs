use crate::domain::model::{Coordinates, GeocodeQuery};
use crate::domain::ports::{ConfigProvider, GeocodingGateway};
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_ENDPOINT: &str = "https://api-adresse.data.gouv.fr/search/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// The service turns away anonymous clients, so every request identifies itself.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<f64>,
}

impl FeatureCollection {
    fn first_coordinates(&self) -> Option<Coordinates> {
        self.features
            .first()
            .and_then(|feature| Coordinates::from_lon_lat(&feature.geometry.coordinates))
    }
}

/// Client for the French national address API (`/search/?q=...&postcode=...`).
#[derive(Debug, Clone)]
pub struct AdresseApiClient {
    client: Client,
    endpoint: Url,
}

impl AdresseApiClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_endpoint(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    pub fn request_url(&self, query: &GeocodeQuery) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &query.text);
            if let Some(postcode) = &query.postcode {
                pairs.append_pair("postcode", postcode);
            }
        }
        url
    }

    async fn fetch(&self, url: Url) -> Result<Option<Coordinates>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(EnrichError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let collection: FeatureCollection = serde_json::from_slice(&body)?;
        Ok(collection.first_coordinates())
    }
}

#[async_trait]
impl GeocodingGateway for AdresseApiClient {
    async fn lookup(&self, query: &GeocodeQuery) -> Option<Coordinates> {
        let url = self.request_url(query);
        tracing::info!("{}", url);

        match self.fetch(url.clone()).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                tracing::error!("geocode {} failed: {}", url, e);
                None
            }
        }
    }
}
