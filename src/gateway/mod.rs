//! Google Maps gateway
//!
//! One call per tool invocation: build the request, send it under a fixed
//! timeout, classify the status, normalize the body. There are no retries and
//! no caching; a failure surfaces straight to the tool caller.

pub mod error;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use error::MapsError;
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};

use crate::normalize::{normalize_routes_response, simplify_place_details, summarize_places};
use crate::request::{
    build_nearby_search_body, build_routes_body, build_text_search_body, geocode_params,
    place_details_params, place_id_from_resource, reverse_geocode_params, routes_field_mask,
    DirectionsOptions, GeocodeRequest, NearbySearchOptions, ReverseGeocodeRequest,
    TextSearchOptions, PLACES_FIELD_MASK_DETAILS, PLACES_FIELD_MASK_SEARCH_NEARBY,
    PLACES_FIELD_MASK_SEARCH_TEXT,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const ROUTES_ENDPOINT: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";
pub const PLACES_TEXT_SEARCH_ENDPOINT: &str = "https://places.googleapis.com/v1/places:searchText";
pub const PLACES_NEARBY_SEARCH_ENDPOINT: &str =
    "https://places.googleapis.com/v1/places:searchNearby";
/// Place Details base; the place id is appended as a path segment
pub const PLACES_DETAILS_ENDPOINT: &str = "https://places.googleapis.com/v1/places";

/// Timeout applied to every outbound call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const GEOCODING_API: &str = "Geocoding API";
const ROUTES_API: &str = "Routes API";
const PLACES_API: &str = "Places API";
const PLACE_DETAILS_API: &str = "Place Details API";

/// Outcome of a Place Details lookup. A missing place is an expected answer,
/// not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceDetails {
    Found(Value),
    NotFound,
}

impl PlaceDetails {
    /// Tool payload; a missing place becomes `{error: {code: "NOT_FOUND", ...}}`
    pub fn into_value(self) -> Value {
        match self {
            PlaceDetails::Found(details) => details,
            PlaceDetails::NotFound => json!({
                "error": {
                    "code": "NOT_FOUND",
                    "message": "Place not found",
                }
            }),
        }
    }
}

/// Client for the Google Maps web service endpoints used by the tools.
///
/// Holds one credential set; share it behind an `Arc` between tools.
pub struct MapsGateway {
    api_key: String,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl MapsGateway {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: api_key.into(),
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> Result<&str, MapsError> {
        if self.api_key.trim().is_empty() {
            Err(MapsError::MissingApiKey)
        } else {
            Ok(&self.api_key)
        }
    }

    /// Headers shared by the Routes and Places (New) endpoints
    fn google_request(&self, request: HttpRequest, field_mask: &str) -> Result<HttpRequest, MapsError> {
        Ok(request
            .header("X-Goog-Api-Key", self.api_key()?)
            .header("X-Goog-FieldMask", field_mask)
            .header("Content-Type", "application/json"))
    }

    async fn send(&self, endpoint: &'static str, request: HttpRequest) -> Result<HttpResponse, MapsError> {
        let started = Instant::now();
        debug!(endpoint, url = %request.url, "sending Google Maps request");

        let response = match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(source)) => {
                warn!(endpoint, error = %source, "Google Maps request failed");
                return Err(MapsError::Request { endpoint, source });
            }
            Err(_) => {
                warn!(endpoint, timeout = ?self.timeout, "Google Maps request timed out");
                return Err(MapsError::Request {
                    endpoint,
                    source: TransportError::Timeout(self.timeout),
                });
            }
        };

        debug!(
            endpoint,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Google Maps response received"
        );
        Ok(response)
    }

    fn ensure_ok(endpoint: &'static str, response: &HttpResponse) -> Result<(), MapsError> {
        match response.status {
            200 => Ok(()),
            401 | 403 => Err(MapsError::Auth { endpoint }),
            status => Err(MapsError::http(endpoint, status, &response.body)),
        }
    }

    fn decode(endpoint: &'static str, response: &HttpResponse) -> Result<Value, MapsError> {
        serde_json::from_str(&response.body).map_err(|source| MapsError::Decode { endpoint, source })
    }

    /// Forward geocode an address or component filter (raw provider response)
    pub async fn geocode(&self, request: &GeocodeRequest) -> Result<Value, MapsError> {
        self.legacy_geocoding(geocode_params(request)).await
    }

    /// Reverse geocode a coordinate (raw provider response)
    pub async fn reverse_geocode(&self, request: &ReverseGeocodeRequest) -> Result<Value, MapsError> {
        self.legacy_geocoding(reverse_geocode_params(request)).await
    }

    async fn legacy_geocoding(&self, mut params: Vec<(String, String)>) -> Result<Value, MapsError> {
        params.push(("key".to_string(), self.api_key()?.to_string()));
        let request = HttpRequest::get(GEOCODE_ENDPOINT).query(params);

        let response = self.send(GEOCODING_API, request).await?;
        Self::ensure_ok(GEOCODING_API, &response)?;
        let data = Self::decode(GEOCODING_API, &response)?;

        // the legacy API reports failures inside a 200 body
        match data.get("status").and_then(Value::as_str) {
            Some("OK") | Some("ZERO_RESULTS") => Ok(data),
            status => {
                let message = data
                    .get("error_message")
                    .and_then(Value::as_str)
                    .or(status)
                    .unwrap_or("missing status")
                    .to_string();
                Err(MapsError::Api { message })
            }
        }
    }

    /// Call Routes `computeRoutes` and return the normalized response.
    ///
    /// Polylines are stripped, localized text promoted and single key objects
    /// collapsed; a response without `routes` is malformed.
    pub async fn directions(
        &self,
        origin: &str,
        destination: &str,
        options: &DirectionsOptions,
    ) -> Result<Value, MapsError> {
        let body = build_routes_body(origin, destination, options);
        let request =
            self.google_request(HttpRequest::post(ROUTES_ENDPOINT, body), &routes_field_mask())?;

        let response = self.send(ROUTES_API, request).await?;
        Self::ensure_ok(ROUTES_API, &response)?;
        let data = normalize_routes_response(Self::decode(ROUTES_API, &response)?);

        if data.get("routes").is_none() {
            return Err(MapsError::Malformed {
                endpoint: ROUTES_API,
                message: "missing routes".to_string(),
            });
        }
        debug!(response = %data, "Routes API response");
        Ok(data)
    }

    /// Places Text Search, flattened to `{places, raw_count}`
    pub async fn places_search_text(&self, options: &TextSearchOptions) -> Result<Value, MapsError> {
        let body = build_text_search_body(options);
        let data = self
            .places_post(PLACES_TEXT_SEARCH_ENDPOINT, body, PLACES_FIELD_MASK_SEARCH_TEXT)
            .await?;
        Ok(summarize_places(&data))
    }

    /// Places Nearby Search, flattened to `{places, raw_count}`
    pub async fn places_search_nearby(
        &self,
        options: &NearbySearchOptions,
    ) -> Result<Value, MapsError> {
        let body = build_nearby_search_body(options);
        let data = self
            .places_post(PLACES_NEARBY_SEARCH_ENDPOINT, body, PLACES_FIELD_MASK_SEARCH_NEARBY)
            .await?;
        Ok(summarize_places(&data))
    }

    async fn places_post(&self, url: &str, body: Value, field_mask: &str) -> Result<Value, MapsError> {
        let request = self.google_request(HttpRequest::post(url, body), field_mask)?;
        let response = self.send(PLACES_API, request).await?;
        Self::ensure_ok(PLACES_API, &response)?;
        Self::decode(PLACES_API, &response)
    }

    /// Fetch simplified details for `place_id` (bare id or `places/<id>`)
    pub async fn place_details(
        &self,
        place_id: &str,
        language: Option<&str>,
        region: Option<&str>,
    ) -> Result<PlaceDetails, MapsError> {
        let url = format!(
            "{}/{}",
            PLACES_DETAILS_ENDPOINT,
            place_id_from_resource(place_id)
        );
        let request = self.google_request(
            HttpRequest::get(url).query(place_details_params(language, region)),
            PLACES_FIELD_MASK_DETAILS,
        )?;

        let response = self.send(PLACE_DETAILS_API, request).await?;
        if response.status == 404 {
            debug!(place_id, "place not found");
            return Ok(PlaceDetails::NotFound);
        }
        Self::ensure_ok(PLACE_DETAILS_API, &response)?;
        let data = Self::decode(PLACE_DETAILS_API, &response)?;
        Ok(PlaceDetails::Found(simplify_place_details(&data)))
    }
}
