//! Canonical place record produced by one search task.

use serde::{Deserialize, Serialize};

use crate::geo::{LatLng, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessStatus {
    Operational,
    ClosedTemporarily,
    ClosedPermanently,
    Unknown,
}

impl BusinessStatus {
    /// Map the provider's status string; anything unrecognised is `Unknown`.
    #[must_use]
    pub fn from_provider(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("OPERATIONAL") => BusinessStatus::Operational,
            Some("CLOSED_TEMPORARILY") => BusinessStatus::ClosedTemporarily,
            Some("CLOSED_PERMANENTLY") => BusinessStatus::ClosedPermanently,
            _ => BusinessStatus::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BusinessStatus::Operational => "OPERATIONAL",
            BusinessStatus::ClosedTemporarily => "CLOSED_TEMPORARILY",
            BusinessStatus::ClosedPermanently => "CLOSED_PERMANENTLY",
            BusinessStatus::Unknown => "",
        }
    }
}

impl std::fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Portuguese display label used in the result files.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Segunda-feira",
            Weekday::Tuesday => "Terça-feira",
            Weekday::Wednesday => "Quarta-feira",
            Weekday::Thursday => "Quinta-feira",
            Weekday::Friday => "Sexta-feira",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }

    /// Parse an English or Portuguese day name, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let day = match raw.trim().to_lowercase().as_str() {
            "monday" | "segunda-feira" | "segunda" => Weekday::Monday,
            "tuesday" | "terça-feira" | "terca-feira" | "terça" => Weekday::Tuesday,
            "wednesday" | "quarta-feira" | "quarta" => Weekday::Wednesday,
            "thursday" | "quinta-feira" | "quinta" => Weekday::Thursday,
            "friday" | "sexta-feira" | "sexta" => Weekday::Friday,
            "saturday" | "sábado" | "sabado" => Weekday::Saturday,
            "sunday" | "domingo" => Weekday::Sunday,
            _ => return None,
        };
        Some(day)
    }
}

/// Opening hours of a single day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DayHours {
    #[default]
    Closed,
    Open24Hours,
    /// One or more `HH:MM – HH:MM` ranges, already in 24-hour notation.
    Ranges(Vec<String>),
}

impl std::fmt::Display for DayHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayHours::Closed => f.write_str("Fechado"),
            DayHours::Open24Hours => f.write_str("Aberto 24 horas"),
            DayHours::Ranges(ranges) => f.write_str(&ranges.join(", ")),
        }
    }
}

/// Seven days of opening hours, Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyHours {
    pub days: [DayHours; 7],
}

impl WeeklyHours {
    #[must_use]
    pub fn day(&self, day: Weekday) -> &DayHours {
        &self.days[day.index()]
    }

    pub fn set(&mut self, day: Weekday, hours: DayHours) {
        self.days[day.index()] = hours;
    }

    /// `"<Dia>: <horário>"` lines, one per weekday.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        Weekday::ALL
            .iter()
            .map(|day| format!("{}: {}", day.label(), self.day(*day)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    /// Provider place id, when the search result carried one.
    pub external_id: Option<String>,
    pub city_state: String,
    pub name: String,
    /// Street-level address ("vicinity"); empty when the provider omitted it.
    pub address: String,
    pub business_status: BusinessStatus,
    pub open_now: bool,
    pub location: LatLng,
    /// `None` when no details were available for the place.
    pub weekly_hours: Option<WeeklyHours>,
    pub types: Vec<String>,
    pub viewport: Option<Viewport>,
    /// Category that produced this record.
    pub search_type: String,
}
