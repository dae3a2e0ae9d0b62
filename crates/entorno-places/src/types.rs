//! Response types for the Google Maps web service endpoints.
//!
//! Every endpoint wraps its payload in an object carrying a `status` string
//! (`"OK"`, `"ZERO_RESULTS"`, `"OVER_QUERY_LIMIT"`, ...) and an optional
//! `error_message`. The client checks those before deserializing into the
//! types below.

use entorno_core::{LatLng, Viewport};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// place/nearbysearch
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<NearbyPlace>,
}

/// One entry of a nearby-search result list.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Street-level address.
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub business_status: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

// ---------------------------------------------------------------------------
// place/details
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    #[serde(default)]
    pub result: Option<DetailsResult>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResult {
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    /// Provider-formatted lines such as `"Monday: 9:00 AM – 5:00 PM"`.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

// ---------------------------------------------------------------------------
// geocode (reverse)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl GeocodeResult {
    /// `"city/state"` from the level-2 long name and level-1 short name, when
    /// both are present.
    #[must_use]
    pub fn city_state(&self) -> Option<String> {
        let mut city = None;
        let mut state = None;
        for component in &self.address_components {
            if component
                .types
                .iter()
                .any(|t| t == "administrative_area_level_2")
            {
                city = Some(component.long_name.as_str());
            }
            if component
                .types
                .iter()
                .any(|t| t == "administrative_area_level_1")
            {
                state = Some(component.short_name.as_str());
            }
        }
        Some(format!("{}/{}", city?, state?))
    }
}

// ---------------------------------------------------------------------------
// distancematrix
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    pub status: String,
    #[serde(default)]
    pub distance: Option<MatrixValue>,
    #[serde(default)]
    pub duration: Option<MatrixValue>,
}

/// `{ "value": <number>, "text": "..." }` pair used for distances and durations.
#[derive(Debug, Deserialize)]
pub struct MatrixValue {
    pub value: f64,
    #[serde(default)]
    pub text: Option<String>,
}
