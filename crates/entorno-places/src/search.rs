//! One search task: reverse geocode, nearby search, and per-place details.

use entorno_core::{BusinessStatus, LatLng, PlaceRecord};

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::hours::normalize_weekday_text;
use crate::types::NearbyPlace;

/// `city_state` value used when reverse geocoding yields no city/state pair.
pub const UNKNOWN_CITY_STATE: &str = "Desconhecido";

/// Search places of `category` around `origin` and normalize them into records.
///
/// A failing details request degrades that place only: it is kept with no
/// weekly hours and `open_now = false`.
///
/// # Errors
///
/// Returns [`PlacesError`] if the reverse geocode or the nearby search fails.
pub async fn search_by_coordinates(
    client: &PlacesClient,
    origin: LatLng,
    category: &str,
) -> Result<Vec<PlaceRecord>, PlacesError> {
    let city_state = client
        .reverse_geocode(origin)
        .await?
        .unwrap_or_else(|| UNKNOWN_CITY_STATE.to_string());

    let places = client.nearby_search(origin, category).await?;
    tracing::debug!(
        origin = %origin,
        category,
        count = places.len(),
        "nearby search returned"
    );

    let mut records = Vec::with_capacity(places.len());
    for place in places {
        let record = build_record(client, place, &city_state, category).await;
        records.push(record);
    }
    Ok(records)
}

async fn build_record(
    client: &PlacesClient,
    place: NearbyPlace,
    city_state: &str,
    category: &str,
) -> PlaceRecord {
    let (weekly_hours, open_now) = match place.place_id.as_deref() {
        Some(place_id) => match client.place_details(place_id).await {
            Ok(Some(hours)) => {
                // An empty weekday_text means unknown hours, not closed all week.
                let weekly = (!hours.weekday_text.is_empty())
                    .then(|| normalize_weekday_text(&hours.weekday_text));
                (weekly, hours.open_now.unwrap_or(false))
            }
            Ok(None) => (None, false),
            Err(e) => {
                tracing::warn!(place_id, category, error = %e, "details request failed");
                (None, false)
            }
        },
        None => (None, false),
    };

    PlaceRecord {
        external_id: place.place_id,
        city_state: city_state.to_string(),
        name: place.name.unwrap_or_default(),
        address: place.vicinity.unwrap_or_default(),
        business_status: BusinessStatus::from_provider(place.business_status.as_deref()),
        open_now,
        location: place.geometry.location,
        weekly_hours,
        types: place.types,
        viewport: place.geometry.viewport,
        search_type: category.to_string(),
    }
}
