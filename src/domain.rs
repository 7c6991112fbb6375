use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One cleaned job posting row.
///
/// Salary bounds are guaranteed ordered and inside the configured band once
/// a row has passed the quality gate; `salary_average` and `salary_range`
/// are always consistent with the bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub salary_minimum: f64,
    pub salary_maximum: f64,
    pub salary_average: f64,
    pub salary_range: f64,
    /// Pay cadence label, when the source carried one.
    pub salary_type: Option<String>,
    /// First category label attached to the posting, or "Unknown".
    pub primary_category: String,
    pub position_levels: String,
    pub minimum_years_experience: f64,
    pub expiry_date: Option<NaiveDateTime>,
    pub new_posting_date: Option<NaiveDateTime>,
    pub original_posting_date: Option<NaiveDateTime>,
    pub company_name: Option<String>,
}

/// The immutable cleaned table produced by a single load.
#[derive(Debug, Clone)]
pub struct JobTable {
    pub rows: Vec<JobPosting>,
    pub report: LoadReport,
}

impl JobTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-load accounting: what came in, what was dropped, and why.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    /// Data rows present in the source before any filtering.
    pub source_rows: usize,
    /// Rows dropped because salary_minimum exceeded salary_maximum.
    pub invalid_ranges_dropped: usize,
    /// Rows dropped by the salary floor/ceiling outlier filter.
    pub outliers_removed: usize,
    /// Whether the pay-cadence filter ran (false when the column is absent).
    pub cadence_filter_applied: bool,
    /// Category cells that fell back to "Unknown".
    pub unknown_categories: usize,
    /// Date cells that could not be parsed.
    pub unparsed_dates: usize,
    /// Human-readable notes on non-fatal anomalies, in occurrence order.
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}
