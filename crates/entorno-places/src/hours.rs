//! Normalization of provider `weekday_text` lines into [`WeeklyHours`].
//!
//! Google returns lines such as `"Monday: 9:00\u{202f}AM\u{2009}–\u{2009}5:00\u{202f}PM"`
//! (English) or `"segunda-feira: 09:00–17:00"` (Portuguese), with narrow and
//! thin spaces around the meridiem and the dash. Everything is folded into
//! 24-hour `HH:MM – HH:MM` ranges keyed by weekday.

use chrono::NaiveTime;
use entorno_core::{DayHours, Weekday, WeeklyHours};

const RANGE_SEPARATOR: &str = " – ";

/// Replace the Unicode spaces Google emits with plain ASCII spaces.
fn normalize_spaces(raw: &str) -> String {
    raw.replace(['\u{202f}', '\u{2009}', '\u{a0}'], " ")
}

fn has_meridiem(token: &str) -> bool {
    let upper = token.trim().to_uppercase();
    upper.ends_with("AM") || upper.ends_with("PM")
}

/// Convert a 12-hour clock token to `HH:MM`.
///
/// Tokens already in 24-hour form, or that do not parse, are returned trimmed
/// and otherwise unchanged, so applying the conversion twice is a no-op.
#[must_use]
pub fn to_24h(token: &str) -> String {
    let cleaned = normalize_spaces(token);
    let cleaned = cleaned.trim();
    let upper = cleaned.to_uppercase();

    for format in ["%I:%M %p", "%I:%M%p"] {
        if let Ok(time) = NaiveTime::parse_from_str(&upper, format) {
            return time.format("%H:%M").to_string();
        }
    }
    cleaned.to_string()
}

/// Suffix (`AM`/`PM`) of a token, if any.
fn meridiem_of(token: &str) -> Option<&'static str> {
    let upper = token.trim().to_uppercase();
    if upper.ends_with("AM") {
        Some("AM")
    } else if upper.ends_with("PM") {
        Some("PM")
    } else {
        None
    }
}

/// Convert one `start – end` range. A start without meridiem inherits the
/// end's (`"9:00 – 11:30 AM"`).
fn convert_range(range: &str) -> String {
    let Some((start, end)) = range
        .split_once('–')
        .or_else(|| range.split_once('-'))
    else {
        return to_24h(range);
    };

    let start = start.trim();
    let end = end.trim();
    let start = match meridiem_of(end) {
        Some(meridiem) if !has_meridiem(start) && start.contains(':') => {
            to_24h(&format!("{start} {meridiem}"))
        }
        _ => to_24h(start),
    };
    format!("{start}{RANGE_SEPARATOR}{}", to_24h(end))
}

/// Interpret the part after `"<day>:"` of one weekday line.
#[must_use]
pub fn parse_day_hours(raw: &str) -> DayHours {
    let text = normalize_spaces(raw);
    let text = text.trim();
    let lower = text.to_lowercase();

    if text.is_empty() || lower == "closed" || lower == "fechado" {
        return DayHours::Closed;
    }
    if lower.contains("24 hours") || lower.contains("24 horas") {
        return DayHours::Open24Hours;
    }

    let ranges: Vec<String> = text
        .split(',')
        .flat_map(|part| part.split(" / "))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(convert_range)
        .collect();

    if ranges.is_empty() {
        DayHours::Closed
    } else {
        DayHours::Ranges(ranges)
    }
}

/// Build a full week from provider lines. Days absent from `lines` stay
/// [`DayHours::Closed`]; lines without a recognizable day label are ignored.
#[must_use]
pub fn normalize_weekday_text(lines: &[String]) -> WeeklyHours {
    let mut week = WeeklyHours::default();
    for line in lines {
        let Some((label, rest)) = line.split_once(':') else {
            tracing::debug!(line = %line, "weekday line without day separator, ignoring");
            continue;
        };
        match Weekday::parse(label) {
            Some(day) => week.set(day, parse_day_hours(rest)),
            None => tracing::debug!(label = %label, "unrecognized weekday label, ignoring"),
        }
    }
    week
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_24h_converts_midnight_noon_and_afternoon() {
        assert_eq!(to_24h("12:00 AM"), "00:00");
        assert_eq!(to_24h("12:00 PM"), "12:00");
        assert_eq!(to_24h("1:30 PM"), "13:30");
        assert_eq!(to_24h("9:05\u{202f}am"), "09:05");
    }

    #[test]
    fn to_24h_is_idempotent() {
        for token in ["12:00 AM", "1:30 PM", "11:59 PM", "07:15", "garbage"] {
            let once = to_24h(token);
            assert_eq!(to_24h(&once), once, "token {token}");
        }
    }

    #[test]
    fn to_24h_passes_unparseable_tokens_through() {
        assert_eq!(to_24h("  17:00 "), "17:00");
        assert_eq!(to_24h("noon-ish"), "noon-ish");
    }

    #[test]
    fn parse_day_hours_handles_markers() {
        assert_eq!(parse_day_hours(" Closed"), DayHours::Closed);
        assert_eq!(parse_day_hours("Fechado"), DayHours::Closed);
        assert_eq!(parse_day_hours(" Open 24 hours"), DayHours::Open24Hours);
        assert_eq!(parse_day_hours("Atendimento 24 horas"), DayHours::Open24Hours);
    }

    #[test]
    fn parse_day_hours_splits_multiple_ranges() {
        let hours = parse_day_hours(
            " 9:00\u{2009}AM\u{2009}–\u{2009}12:00\u{202f}PM, 1:00\u{2009}–\u{2009}5:00\u{202f}PM",
        );
        assert_eq!(
            hours,
            DayHours::Ranges(vec!["09:00 – 12:00".into(), "13:00 – 17:00".into()])
        );
    }

    #[test]
    fn parse_day_hours_accepts_portuguese_24h_ranges() {
        assert_eq!(
            parse_day_hours(" 08:00–12:00 / 14:00–18:00"),
            DayHours::Ranges(vec!["08:00 – 12:00".into(), "14:00 – 18:00".into()])
        );
    }

    #[test]
    fn normalize_weekday_text_translates_and_fills_missing_days() {
        let lines = vec![
            "Monday: 9:00 AM – 5:00 PM".to_string(),
            "Saturday: Closed".to_string(),
            "Sunday: Open 24 hours".to_string(),
        ];
        let week = normalize_weekday_text(&lines);
        let rendered = week.lines();
        assert_eq!(rendered[0], "Segunda-feira: 09:00 – 17:00");
        assert_eq!(rendered[1], "Terça-feira: Fechado");
        assert_eq!(rendered[5], "Sábado: Fechado");
        assert_eq!(rendered[6], "Domingo: Aberto 24 horas");
    }

    #[test]
    fn normalize_weekday_text_ignores_unknown_labels() {
        let lines = vec!["Holiday: 10:00 AM – 2:00 PM".to_string()];
        assert_eq!(normalize_weekday_text(&lines), WeeklyHours::default());
    }
}
