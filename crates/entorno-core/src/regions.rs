//! Brazilian state (UF) to macro-region lookup.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Norte,
    Nordeste,
    #[serde(rename = "Centro-Oeste")]
    CentroOeste,
    Sudeste,
    Sul,
}

impl Region {
    /// Folder name used under the results tree.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Norte => "Norte",
            Region::Nordeste => "Nordeste",
            Region::CentroOeste => "Centro-Oeste",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const UF_TO_REGION: &[(&str, Region)] = &[
    ("AC", Region::Norte),
    ("AP", Region::Norte),
    ("AM", Region::Norte),
    ("PA", Region::Norte),
    ("RO", Region::Norte),
    ("RR", Region::Norte),
    ("TO", Region::Norte),
    ("AL", Region::Nordeste),
    ("BA", Region::Nordeste),
    ("CE", Region::Nordeste),
    ("MA", Region::Nordeste),
    ("PB", Region::Nordeste),
    ("PE", Region::Nordeste),
    ("PI", Region::Nordeste),
    ("RN", Region::Nordeste),
    ("SE", Region::Nordeste),
    ("DF", Region::CentroOeste),
    ("GO", Region::CentroOeste),
    ("MT", Region::CentroOeste),
    ("MS", Region::CentroOeste),
    ("ES", Region::Sudeste),
    ("MG", Region::Sudeste),
    ("RJ", Region::Sudeste),
    ("SP", Region::Sudeste),
    ("PR", Region::Sul),
    ("RS", Region::Sul),
    ("SC", Region::Sul),
];

#[must_use]
pub fn region_for_state(state: &str) -> Option<Region> {
    let state = state.trim().to_uppercase();
    UF_TO_REGION
        .iter()
        .find(|(uf, _)| *uf == state)
        .map(|(_, region)| *region)
}

/// Extract a known state code from a `"city/state"` string.
///
/// Returns `None` when there is no `/` or the trailing token is not a known UF.
#[must_use]
pub fn state_from_city_state(city_state: &str) -> Option<String> {
    let (_, state) = city_state.rsplit_once('/')?;
    let state = state.trim().to_uppercase();
    region_for_state(&state).map(|_| state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sao_paulo_is_sudeste() {
        assert_eq!(region_for_state("SP"), Some(Region::Sudeste));
        assert_eq!(region_for_state("sp"), Some(Region::Sudeste));
    }

    #[test]
    fn invalid_state_has_no_region() {
        assert_eq!(region_for_state("ZZ"), None);
        assert_eq!(state_from_city_state("Nowhere/ZZ"), None);
    }

    #[test]
    fn every_region_is_reachable() {
        for (uf, expected) in [
            ("AM", Region::Norte),
            ("BA", Region::Nordeste),
            ("DF", Region::CentroOeste),
            ("RJ", Region::Sudeste),
            ("RS", Region::Sul),
        ] {
            assert_eq!(region_for_state(uf), Some(expected));
        }
        assert_eq!(UF_TO_REGION.len(), 27);
    }

    #[test]
    fn state_is_taken_from_trailing_token() {
        assert_eq!(
            state_from_city_state("São Paulo/SP").as_deref(),
            Some("SP")
        );
        assert_eq!(
            state_from_city_state("Belo Horizonte / mg ").as_deref(),
            Some("MG")
        );
        assert_eq!(state_from_city_state("Desconhecido"), None);
    }
}
