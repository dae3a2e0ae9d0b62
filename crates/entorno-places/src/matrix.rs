//! Interpretation of distance-matrix responses.

use entorno_core::TravelLeg;

use crate::error::PlacesError;
use crate::types::DistanceMatrixResponse;

const CONTEXT: &str = "distancematrix";

fn shape_error(reason: impl Into<String>) -> PlacesError {
    PlacesError::UnexpectedShape {
        context: CONTEXT.to_string(),
        reason: reason.into(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Extract one [`TravelLeg`] per destination from a single-origin response.
///
/// The response must carry `status == "OK"` and exactly `expected` elements
/// in its first row, each with `status == "OK"` and both a distance and a
/// duration.
///
/// # Errors
///
/// Returns [`PlacesError::UnexpectedShape`] naming the first violated
/// condition, or [`PlacesError::Deserialize`] if the JSON does not match the
/// response structure at all.
pub fn parse_distance_matrix(
    body: &serde_json::Value,
    expected: usize,
) -> Result<Vec<TravelLeg>, PlacesError> {
    let response: DistanceMatrixResponse =
        serde_json::from_value(body.clone()).map_err(|e| PlacesError::Deserialize {
            context: CONTEXT.to_string(),
            source: e,
        })?;

    if response.status != "OK" {
        return Err(shape_error(format!("status {}", response.status)));
    }

    let row = response
        .rows
        .first()
        .ok_or_else(|| shape_error("response has no rows"))?;

    if row.elements.len() != expected {
        return Err(shape_error(format!(
            "expected {expected} elements, got {}",
            row.elements.len()
        )));
    }

    row.elements
        .iter()
        .enumerate()
        .map(|(i, element)| {
            if element.status != "OK" {
                return Err(shape_error(format!(
                    "element {i} has status {}",
                    element.status
                )));
            }
            let distance = element
                .distance
                .as_ref()
                .ok_or_else(|| shape_error(format!("element {i} has no distance")))?;
            let duration = element
                .duration
                .as_ref()
                .ok_or_else(|| shape_error(format!("element {i} has no duration")))?;
            Ok(TravelLeg {
                distance_meters: distance.value,
                duration_minutes: round2(duration.value / 60.0),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn element(meters: f64, seconds: f64) -> serde_json::Value {
        json!({
            "status": "OK",
            "distance": { "value": meters, "text": "x" },
            "duration": { "value": seconds, "text": "y" }
        })
    }

    #[test]
    fn parses_legs_and_rounds_minutes() {
        let body = json!({
            "status": "OK",
            "rows": [{ "elements": [element(120.0, 100.0), element(2500.0, 1800.0)] }]
        });
        let legs = parse_distance_matrix(&body, 2).unwrap();
        assert_eq!(legs.len(), 2);
        assert!((legs[0].distance_meters - 120.0).abs() < f64::EPSILON);
        assert!((legs[0].duration_minutes - 1.67).abs() < 1e-9);
        assert!((legs[1].duration_minutes - 30.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_ok_status() {
        let body = json!({ "status": "REQUEST_DENIED", "rows": [] });
        let err = parse_distance_matrix(&body, 1).unwrap_err();
        assert!(matches!(err, PlacesError::UnexpectedShape { ref reason, .. } if reason.contains("REQUEST_DENIED")));
    }

    #[test]
    fn rejects_element_count_mismatch() {
        let body = json!({
            "status": "OK",
            "rows": [{ "elements": [element(1.0, 60.0)] }]
        });
        let err = parse_distance_matrix(&body, 3).unwrap_err();
        assert!(matches!(err, PlacesError::UnexpectedShape { ref reason, .. } if reason.contains("expected 3")));
    }

    #[test]
    fn rejects_failed_element() {
        let body = json!({
            "status": "OK",
            "rows": [{ "elements": [element(1.0, 60.0), { "status": "ZERO_RESULTS" }] }]
        });
        let err = parse_distance_matrix(&body, 2).unwrap_err();
        assert!(matches!(err, PlacesError::UnexpectedShape { ref reason, .. } if reason.contains("element 1")));
    }

    #[test]
    fn rejects_missing_rows() {
        let body = json!({ "status": "OK" });
        assert!(parse_distance_matrix(&body, 0).is_err());
    }

    #[test]
    fn malformed_json_is_a_deserialize_error() {
        let body = json!({ "rows": "nope" });
        assert!(matches!(
            parse_distance_matrix(&body, 1),
            Err(PlacesError::Deserialize { .. })
        ));
    }
}
