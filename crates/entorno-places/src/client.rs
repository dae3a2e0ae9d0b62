//! HTTP client for the Google Maps web service endpoints used by the pipeline.
//!
//! Wraps `reqwest` with API key management, per-endpoint timeouts, transient
//! error retries, and typed response deserialization. Every endpoint checks
//! the `"status"` field of the JSON envelope and surfaces provider-level
//! failures as [`PlacesError::ApiError`] or [`PlacesError::QuotaExceeded`].

use std::time::Duration;

use entorno_core::{AppConfig, LatLng};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{
    DetailsResponse, GeocodeResponse, NearbyPlace, NearbySearchResponse, OpeningHours,
};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

const NEARBY_SEARCH_PATH: &str = "place/nearbysearch/json";
const DETAILS_PATH: &str = "place/details/json";
const GEOCODE_PATH: &str = "geocode/json";
const DISTANCE_MATRIX_PATH: &str = "distancematrix/json";

/// Client for the places, geocoding and distance-matrix endpoints.
///
/// Use [`PlacesClient::from_config`] in the binary or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    language: String,
    region: String,
    details_timeout: Duration,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production API with default hints
    /// (`pt-BR`, `BR`) and no retries.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`PlacesError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent("entorno/0.1 (nearby-places)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            language: "pt-BR".to_owned(),
            region: "BR".to_owned(),
            details_timeout: Duration::from_secs(timeout_secs),
            max_retries: 0,
            retry_backoff_base_ms: 0,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`PlacesClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        let mut client = Self::with_base_url(
            &config.api_key,
            config.request_timeout_secs,
            &config.base_url,
        )?;
        client.language.clone_from(&config.language);
        client.region.clone_from(&config.region);
        client.details_timeout = Duration::from_secs(config.details_timeout_secs);
        client.max_retries = config.max_retries;
        client.retry_backoff_base_ms = config.retry_backoff_base_ms;
        Ok(client)
    }

    /// Places of `category` around `location`, ranked by distance.
    ///
    /// Returns an empty list on `ZERO_RESULTS`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::ApiError`] / [`PlacesError::QuotaExceeded`] on a
    ///   failing API status.
    /// - [`PlacesError::Deserialize`] if the body does not match the expected shape.
    pub async fn nearby_search(
        &self,
        location: LatLng,
        category: &str,
    ) -> Result<Vec<NearbyPlace>, PlacesError> {
        let location_param = location.to_string();
        let url = self.build_url(
            NEARBY_SEARCH_PATH,
            &[
                ("location", location_param.as_str()),
                ("type", category),
                ("rankby", "distance"),
                ("language", self.language.as_str()),
                ("region", self.region.as_str()),
            ],
        );
        let body = self.request_json(&url, None).await?;
        Self::check_api_status(&body)?;

        let response: NearbySearchResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("nearbysearch(location={location_param}, type={category})"),
                source: e,
            })?;

        Ok(response.results)
    }

    /// Opening hours of a single place, requesting only the `opening_hours` field.
    ///
    /// Returns `Ok(None)` when the place has no published hours.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::nearby_search`]; uses the shorter details timeout.
    pub async fn place_details(&self, place_id: &str) -> Result<Option<OpeningHours>, PlacesError> {
        let url = self.build_url(
            DETAILS_PATH,
            &[
                ("place_id", place_id),
                ("fields", "opening_hours"),
                ("language", self.language.as_str()),
                ("region", self.region.as_str()),
            ],
        );
        let body = self.request_json(&url, Some(self.details_timeout)).await?;
        Self::check_api_status(&body)?;

        let response: DetailsResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;

        Ok(response.result.and_then(|r| r.opening_hours))
    }

    /// `"city/state"` for a coordinate, from the first geocoding result that
    /// carries both administrative levels. `Ok(None)` when none does.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::nearby_search`].
    pub async fn reverse_geocode(&self, location: LatLng) -> Result<Option<String>, PlacesError> {
        let latlng = location.to_string();
        let url = self.build_url(
            GEOCODE_PATH,
            &[("latlng", latlng.as_str()), ("language", self.language.as_str())],
        );
        let body = self.request_json(&url, None).await?;
        Self::check_api_status(&body)?;

        let response: GeocodeResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("geocode(latlng={latlng})"),
                source: e,
            })?;

        Ok(response.results.iter().find_map(|r| r.city_state()))
    }

    /// Walking distance matrix from one origin to `destinations`, metric units.
    ///
    /// The raw JSON is returned untouched so callers can keep it for problem
    /// reports; use [`crate::parse_distance_matrix`] to interpret it.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the body is not JSON.
    pub async fn distance_matrix(
        &self,
        origin: LatLng,
        destinations: &[LatLng],
    ) -> Result<serde_json::Value, PlacesError> {
        let origins = origin.to_string();
        let destinations = destinations
            .iter()
            .map(LatLng::to_string)
            .collect::<Vec<_>>()
            .join("|");
        let url = self.build_url(
            DISTANCE_MATRIX_PATH,
            &[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("mode", "walking"),
                ("units", "metric"),
                ("language", self.language.as_str()),
            ],
        );
        self.request_json(&url, None).await
    }

    /// Builds the full request URL with percent-encoded query parameters,
    /// `key` first.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Url {
        // Endpoint paths are constants; joining them onto a normalised base
        // cannot fail.
        let mut url = self
            .base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn request_json(
        &self,
        url: &Url,
        timeout: Option<Duration>,
    ) -> Result<serde_json::Value, PlacesError> {
        retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, move || {
            self.request_json_once(url, timeout)
        })
        .await
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body as JSON.
    async fn request_json_once(
        &self,
        url: &Url,
        timeout: Option<Duration>,
    ) -> Result<serde_json::Value, PlacesError> {
        let mut request = self.client.get(url.clone());
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: redact_key(url),
            source: e,
        })
    }

    /// Maps the envelope `status` to an error unless it is `OK` or `ZERO_RESULTS`.
    fn check_api_status(body: &serde_json::Value) -> Result<(), PlacesError> {
        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("MISSING_STATUS");
        let message = || {
            body.get("error_message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("no error message")
                .to_string()
        };
        match status {
            "OK" | "ZERO_RESULTS" => Ok(()),
            "OVER_QUERY_LIMIT" => Err(PlacesError::QuotaExceeded(message())),
            other => Err(PlacesError::ApiError {
                status: other.to_string(),
                message: message(),
            }),
        }
    }
}

/// URL without its query string, safe to log.
fn redact_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}
