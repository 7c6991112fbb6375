// Data cleaning pipeline: ingestion, schema validation, normalization,
// derivation, and quality gating, with per-source memoization.

pub mod cache;
pub mod derive;
pub mod ingestion;
pub mod normalize;
pub mod quality_gate;
pub mod schema;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::QualityConfig;
use crate::domain::{JobTable, LoadReport};
use crate::error::Result;
use crate::observability::metrics;
use crate::pipeline::cache::TableCache;
use crate::pipeline::schema::{columns, ColumnIndex};

/// Loads, validates, and cleans job posting data, memoizing the result per
/// source.
///
/// One instance is meant to live as long as the process; repeated `load`
/// calls for the same source return the cached table without touching the
/// file again.
pub struct DataPipeline {
    quality: QualityConfig,
    cache: TableCache,
}

impl DataPipeline {
    pub fn new(quality: QualityConfig) -> Self {
        Self {
            quality,
            cache: TableCache::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(QualityConfig::default())
    }

    /// Returns the cleaned table for `path`, reading and processing the file
    /// only on the first call per source.
    pub fn load(&mut self, path: &Path) -> Result<Arc<JobTable>> {
        let key = cache::source_fingerprint(path);
        if let Some(table) = self.cache.get(&key) {
            debug!(path = %path.display(), "Returning cached table");
            metrics::pipeline::cache_hit();
            return Ok(table);
        }

        let table = match self.load_uncached(path) {
            Ok(table) => table,
            Err(e) => {
                metrics::pipeline::load_error();
                return Err(e);
            }
        };

        metrics::pipeline::load_success();
        metrics::pipeline::rows_loaded(table.len() as u64);

        let table = Arc::new(table);
        self.cache.insert(key, table.clone());
        Ok(table)
    }

    fn load_uncached(&self, path: &Path) -> Result<JobTable> {
        let mut report = LoadReport::default();

        // Existence, BOM handling, CSV parse, empty-source check
        let raw = ingestion::read_table(path)?;
        report.source_rows = raw.rows.len();

        // Schema validation: every missing required column reported at once
        let index = ColumnIndex::new(&raw.headers);
        if let Err(e) = schema::validate(&index) {
            if let Some(missing) = e.missing_columns() {
                metrics::schema::missing_columns(missing.len() as u64);
            }
            return Err(e);
        }
        info!(rows = report.source_rows, "Data validation passed");

        let mut staged = normalize::extract(&raw, &index);

        // Inverted salary ranges are dropped, never fatal
        let dropped = quality_gate::drop_invalid_ranges(&mut staged);
        if dropped > 0 {
            warn!(dropped, "Found rows with invalid salary ranges; filtering them");
            metrics::quality_gate::invalid_ranges_dropped(dropped as u64);
            report.invalid_ranges_dropped = dropped;
            report.warn(format!(
                "{} rows with salary_minimum above salary_maximum were dropped",
                dropped
            ));
        }

        // Category extraction and best-effort date parsing
        let enrich_stats = normalize::enrich(&mut staged);
        report.unknown_categories = enrich_stats.unknown_categories;
        report.unparsed_dates = enrich_stats.unparsed_dates;
        if enrich_stats.unknown_categories > 0 {
            debug!(
                count = enrich_stats.unknown_categories,
                "Category cells fell back to Unknown"
            );
            metrics::enrich::unknown_categories(enrich_stats.unknown_categories as u64);
        }
        if enrich_stats.unparsed_dates > 0 {
            warn!(count = enrich_stats.unparsed_dates, "Date values could not be parsed");
            metrics::enrich::date_parse_failures(enrich_stats.unparsed_dates as u64);
            report.warn(format!(
                "{} date values could not be parsed and were left empty",
                enrich_stats.unparsed_dates
            ));
        }
        info!("Date conversion completed");

        // Salary metrics and defaults; the only remaining fatal stage
        let mut rows = derive::finalize(staged)?;

        // Cadence filter only runs when the column exists in the source
        if index.contains(columns::SALARY_TYPE) {
            let removed = quality_gate::apply_cadence_filter(&mut rows, &self.quality);
            debug!(removed, cadence = %self.quality.pay_cadence, "Cadence filter applied");
            report.cadence_filter_applied = true;
        } else {
            warn!("'salary_type' column not found, using all data");
            metrics::quality_gate::cadence_filter_skipped();
            report.warn("'salary_type' column not found; keeping all pay cadences".to_string());
        }

        let outliers = quality_gate::remove_outliers(&mut rows, &self.quality);
        report.outliers_removed = outliers;
        metrics::quality_gate::outliers_removed(outliers as u64);

        info!(
            rows = rows.len(),
            outliers_removed = outliers,
            "Data loaded successfully"
        );

        Ok(JobTable { rows, report })
    }

    pub fn quality_config(&self) -> &QualityConfig {
        &self.quality
    }

    pub fn cached_sources(&self) -> usize {
        self.cache.len()
    }
}
