//! Reading search origins from a user-supplied coordinate table.
//!
//! Two layouts are understood:
//!
//! - separate `lat`/`lng` columns (any of `lat`, `latitude` and `lng`, `long`,
//!   `lon`, `longitude`), one origin per row;
//! - "pair" columns whose cells hold both numbers as text, e.g. a header
//!   `Centro da Cidade (Lat, Long)` with cells like `(-23,5505, -46,6333)`.
//!   Every filled cell of every pair column yields one origin.

use std::path::Path;
use std::sync::LazyLock;

use csv::StringRecord;
use entorno_core::Origin;
use regex::Regex;

use crate::error::InputError;

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+(?:[.,]\d+)?").expect("valid number regex"));

const LAT_HEADERS: &[&str] = &["lat", "latitude"];
const LNG_HEADERS: &[&str] = &["lng", "long", "lon", "longitude"];
const NAME_HINTS: &[&str] = &["nome", "empreendimento", "name"];

/// Cells sampled per column when no header looks like a pair column.
const CONTENT_SAMPLE: usize = 5;

struct Table {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

fn parse_table(text: &str, delimiter: u8, path: &Path) -> Result<Table, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let to_err = |source: csv::Error| InputError::Csv {
        path: path.display().to_string(),
        source,
    };

    let headers = reader
        .headers()
        .map_err(to_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_err)?;

    Ok(Table { headers, rows })
}

/// Parse one numeric token. A token with `,` but no `.` uses the comma as
/// decimal separator; surrounding parentheses are ignored.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let token = raw.trim().trim_matches(|c| c == '(' || c == ')').trim();
    if token.is_empty() {
        return None;
    }
    if token.contains(',') && !token.contains('.') {
        token.replace(',', ".").parse().ok()
    } else {
        token.parse().ok()
    }
}

/// Number of numeric substrings in a cell.
fn count_numbers(cell: &str) -> usize {
    NUMBER_RE.find_iter(cell).count()
}

/// Extract `(lat, lng)` from a pair cell: the first two numeric substrings.
#[must_use]
pub fn parse_pair_cell(cell: &str) -> Option<(f64, f64)> {
    let mut numbers = NUMBER_RE.find_iter(cell);
    let lat = parse_number(numbers.next()?.as_str())?;
    let lng = parse_number(numbers.next()?.as_str())?;
    Some((lat, lng))
}

fn cell(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("").trim()
}

fn find_header(headers: &[String], accepted: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| accepted.contains(&h.trim().to_lowercase().as_str()))
}

fn find_name_column(headers: &[String]) -> Option<usize> {
    headers.iter().position(|h| {
        let lower = h.to_lowercase();
        NAME_HINTS.iter().any(|hint| lower.contains(hint))
    })
}

fn looks_like_pair_header(header: &str) -> bool {
    let lower = header.to_lowercase();
    lower.contains("lat") && lower.contains("long")
}

/// Pair columns by header, falling back to content sampling.
fn detect_pair_columns(table: &Table) -> Vec<usize> {
    let by_header: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| looks_like_pair_header(h))
        .map(|(i, _)| i)
        .collect();
    if !by_header.is_empty() {
        return by_header;
    }

    (0..table.headers.len())
        .filter(|&i| !table.headers[i].to_lowercase().contains("unnamed"))
        .filter(|&i| {
            table
                .rows
                .iter()
                .map(|row| cell(row, i))
                .filter(|c| !c.is_empty())
                .take(CONTENT_SAMPLE)
                .any(|c| count_numbers(c) >= 2)
        })
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn origins_from_separate_columns(table: &Table, lat_col: usize, lng_col: usize) -> Vec<Origin> {
    let name_col = find_name_column(&table.headers);
    let source = format!(
        "{} & {}",
        table.headers[lat_col].trim(),
        table.headers[lng_col].trim()
    );

    table
        .rows
        .iter()
        .filter_map(|row| {
            let lat = parse_number(cell(row, lat_col))?;
            let lng = parse_number(cell(row, lng_col))?;
            let mut origin = Origin::new(lat, lng);
            origin.name = name_col.and_then(|i| non_empty(cell(row, i)));
            origin.source = Some(source.clone());
            Some(origin)
        })
        .collect()
}

fn origins_from_pair_columns(table: &Table, pair_cols: &[usize]) -> Vec<Origin> {
    let name_col = find_name_column(&table.headers);
    let mut origins = Vec::new();
    for row in &table.rows {
        let name = name_col.and_then(|i| non_empty(cell(row, i)));
        for &col in pair_cols {
            let Some((lat, lng)) = parse_pair_cell(cell(row, col)) else {
                continue;
            };
            let mut origin = Origin::new(lat, lng);
            origin.name.clone_from(&name);
            origin.source = Some(table.headers[col].clone());
            origins.push(origin);
        }
    }
    origins
}

/// Read the origin table at `path`.
///
/// The file is parsed with `;` first and re-parsed with `,` when that yields a
/// single column. `pair_filter` restricts pair-column mode to the named
/// headers (trimmed, case-insensitive).
///
/// # Errors
///
/// - [`InputError::Io`] / [`InputError::Csv`] if the file cannot be read or parsed.
/// - [`InputError::NoGeoColumns`] if neither layout is recognized.
/// - [`InputError::NoPairs`] if geographic columns exist but no coordinate could be read.
pub fn read_origins(path: &Path, pair_filter: Option<&[String]>) -> Result<Vec<Origin>, InputError> {
    let text = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let text = text.trim_start_matches('\u{feff}');

    let mut table = parse_table(text, b';', path)?;
    if table.headers.len() <= 1 {
        table = parse_table(text, b',', path)?;
    }

    if let (Some(lat), Some(lng)) = (
        find_header(&table.headers, LAT_HEADERS),
        find_header(&table.headers, LNG_HEADERS),
    ) {
        let origins = origins_from_separate_columns(&table, lat, lng);
        tracing::debug!(path = %path.display(), count = origins.len(), "read origins from lat/lng columns");
        if origins.is_empty() {
            return Err(InputError::NoPairs {
                path: path.display().to_string(),
                columns: vec![table.headers[lat].clone(), table.headers[lng].clone()],
            });
        }
        return Ok(origins);
    }

    let mut pair_cols = detect_pair_columns(&table);
    if let Some(filter) = pair_filter.filter(|f| !f.is_empty()) {
        pair_cols.retain(|&i| {
            let header = table.headers[i].trim().to_lowercase();
            filter.iter().any(|f| f.trim().to_lowercase() == header)
        });
    }

    if pair_cols.is_empty() {
        return Err(InputError::NoGeoColumns {
            path: path.display().to_string(),
            columns: table.headers.clone(),
        });
    }

    let origins = origins_from_pair_columns(&table, &pair_cols);
    if origins.is_empty() {
        return Err(InputError::NoPairs {
            path: path.display().to_string(),
            columns: pair_cols.iter().map(|&i| table.headers[i].clone()).collect(),
        });
    }

    tracing::debug!(
        path = %path.display(),
        columns = pair_cols.len(),
        count = origins.len(),
        "read origins from pair columns"
    );
    Ok(origins)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_input(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_number_handles_comma_decimals_and_parentheses() {
        assert_eq!(parse_number("-23,5505"), Some(-23.5505));
        assert_eq!(parse_number("(-46.6333)"), Some(-46.6333));
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn parse_pair_cell_reads_first_two_numbers() {
        assert_eq!(
            parse_pair_cell("( -23.55 , -46.63 )"),
            Some((-23.55, -46.63))
        );
        assert_eq!(
            parse_pair_cell("-23,5505, -46,6333"),
            Some((-23.5505, -46.6333))
        );
        assert_eq!(parse_pair_cell("-23.55"), None);
    }

    #[test]
    fn reads_separate_columns_with_semicolons() {
        let file = write_input("Nome;Latitude;Longitude\nCentro;-23,5505;-46,6333\nVazio;;\n");
        let origins = read_origins(file.path(), None).unwrap();
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].position.lat, -23.5505);
        assert_eq!(origins[0].name.as_deref(), Some("Centro"));
        assert_eq!(origins[0].source.as_deref(), Some("Latitude & Longitude"));
    }

    #[test]
    fn falls_back_to_comma_delimiter() {
        let file = write_input("name,lat,lng\nA,-22.9,-43.2\nB,-19.9,-43.9\n");
        let origins = read_origins(file.path(), None).unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1].position.lng, -43.9);
    }

    #[test]
    fn reads_every_pair_column_by_header() {
        let file = write_input(
            "Empreendimento;Centro (Lat, Long);Escola (Lat, Long)\n\
             Res. Alfa;-23.5505, -46.6333;-23.56, -46.64\n\
             Res. Beta;-22.9, -43.2;\n",
        );
        let origins = read_origins(file.path(), None).unwrap();
        assert_eq!(origins.len(), 3);
        assert_eq!(origins[0].source.as_deref(), Some("Centro (Lat, Long)"));
        assert_eq!(origins[1].source.as_deref(), Some("Escola (Lat, Long)"));
        assert_eq!(origins[2].name.as_deref(), Some("Res. Beta"));
    }

    #[test]
    fn pair_filter_restricts_columns() {
        let file = write_input(
            "Centro (Lat, Long);Escola (Lat, Long)\n-23.5505, -46.6333;-23.56, -46.64\n",
        );
        let filter = vec!["escola (lat, long)".to_string()];
        let origins = read_origins(file.path(), Some(&filter)).unwrap();
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].position.lat, -23.56);
    }

    #[test]
    fn detects_pair_columns_by_content() {
        let file = write_input("Ponto;Unnamed: 0;Obs\n-23.5, -46.6;1 2;x\n");
        let origins = read_origins(file.path(), None).unwrap();
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].source.as_deref(), Some("Ponto"));
    }

    #[test]
    fn no_geographic_columns_is_an_error() {
        let file = write_input("a;b\nfoo;bar\n");
        let err = read_origins(file.path(), None).unwrap_err();
        assert!(matches!(err, InputError::NoGeoColumns { .. }));
    }

    #[test]
    fn pair_columns_without_pairs_is_an_error() {
        let file = write_input("Centro (Lat, Long);x\nsem dados;1\n");
        let err = read_origins(file.path(), None).unwrap_err();
        assert!(matches!(err, InputError::NoPairs { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_origins(Path::new("/nonexistent/entorno/input.csv"), None).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }
}
