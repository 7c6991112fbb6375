use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use serde_json::Value;

use crate::pipeline::ingestion::RawTable;
use crate::pipeline::schema::{columns, ColumnIndex};

/// Fallback label when a posting's category list is absent or unusable.
pub const UNKNOWN_CATEGORY: &str = "Unknown";
/// Fallback label for postings without a position level.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// A typed-but-unvalidated posting: numbers coerced, enrichment pending.
///
/// Salary bounds stay optional here; a missing bound is only fatal once the
/// derivation step needs it.
#[derive(Debug, Clone, Default)]
pub struct StagedPosting {
    pub title: String,
    pub salary_minimum: Option<f64>,
    pub salary_maximum: Option<f64>,
    pub salary_type: Option<String>,
    /// Serialized category list, exactly as found in the cell.
    pub categories: Option<String>,
    pub position_levels: Option<String>,
    pub minimum_years_experience: Option<f64>,
    pub company_name: Option<String>,
    pub expiry_date_raw: Option<String>,
    pub new_posting_date_raw: Option<String>,
    pub original_posting_date_raw: Option<String>,
    /// Filled by [`enrich`].
    pub primary_category: Option<String>,
    pub expiry_date: Option<NaiveDateTime>,
    pub new_posting_date: Option<NaiveDateTime>,
    pub original_posting_date: Option<NaiveDateTime>,
}

/// Counts of per-row fallbacks taken during enrichment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnrichStats {
    pub unknown_categories: usize,
    pub unparsed_dates: usize,
}

/// Types each raw record into a [`StagedPosting`] using the header index.
///
/// Empty cells and cells in absent columns both become `None`; numeric
/// cells that do not parse stay `None` as well.
pub fn extract(raw: &RawTable, index: &ColumnIndex) -> Vec<StagedPosting> {
    raw.rows.iter().map(|record| stage_record(record, index)).collect()
}

fn stage_record(record: &StringRecord, index: &ColumnIndex) -> StagedPosting {
    let cell = |name: &str| -> Option<String> {
        index
            .get(name)
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let numeric = |name: &str| -> Option<f64> { cell(name).and_then(|s| s.parse::<f64>().ok()) };

    StagedPosting {
        title: cell(columns::TITLE).unwrap_or_default(),
        salary_minimum: numeric(columns::SALARY_MINIMUM),
        salary_maximum: numeric(columns::SALARY_MAXIMUM),
        salary_type: cell(columns::SALARY_TYPE),
        categories: cell(columns::CATEGORIES),
        position_levels: cell(columns::POSITION_LEVELS),
        minimum_years_experience: numeric(columns::MINIMUM_YEARS_EXPERIENCE),
        company_name: cell(columns::COMPANY_NAME),
        expiry_date_raw: cell(columns::EXPIRY_DATE),
        new_posting_date_raw: cell(columns::NEW_POSTING_DATE),
        original_posting_date_raw: cell(columns::ORIGINAL_POSTING_DATE),
        ..StagedPosting::default()
    }
}

/// Fills `primary_category` and the parsed date fields on every staged row.
pub fn enrich(staged: &mut [StagedPosting]) -> EnrichStats {
    let mut stats = EnrichStats::default();

    for row in staged.iter_mut() {
        let category = primary_category(row.categories.as_deref());
        if category == UNKNOWN_CATEGORY {
            stats.unknown_categories += 1;
        }
        row.primary_category = Some(category);

        row.expiry_date = parse_date_cell(row.expiry_date_raw.as_deref(), &mut stats);
        row.new_posting_date = parse_date_cell(row.new_posting_date_raw.as_deref(), &mut stats);
        row.original_posting_date =
            parse_date_cell(row.original_posting_date_raw.as_deref(), &mut stats);
    }

    stats
}

fn parse_date_cell(raw: Option<&str>, stats: &mut EnrichStats) -> Option<NaiveDateTime> {
    let raw = raw?;
    let parsed = parse_datetime(raw);
    if parsed.is_none() {
        stats.unparsed_dates += 1;
    }
    parsed
}

/// Extracts the first category label from a serialized category list.
///
/// The cell is expected to hold JSON like
/// `[{"category": "Engineering", ...}, ...]`. Any shape that does not match
/// (absent cell, malformed JSON, empty list, missing or null `category`
/// field) yields [`UNKNOWN_CATEGORY`]; no input can make this fail.
pub fn primary_category(raw: Option<&str>) -> String {
    raw.and_then(|s| serde_json::from_str::<Vec<Value>>(s).ok())
        .and_then(|list| list.into_iter().next())
        .and_then(|first| first.get("category").cloned())
        .and_then(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s),
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Best-effort datetime parsing over the formats seen in the export.
/// Returns `None` rather than an error for anything unrecognized.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}
