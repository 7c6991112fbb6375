//! Metrics for the salary data pipeline.
//!
//! Counters follow Prometheus naming conventions; names live in one catalog
//! so no stage module spells out a magic string.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::info;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    PipelineLoadsSuccess,
    PipelineLoadsError,
    PipelineCacheHits,
    PipelineRowsLoaded,

    SchemaMissingColumns,

    EnrichUnknownCategories,
    EnrichDateParseFailures,

    QualityGateInvalidRangesDropped,
    QualityGateOutliersRemoved,
    QualityGateCadenceFilterSkipped,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::PipelineLoadsSuccess => "salarybench_pipeline_loads_success_total",
            MetricName::PipelineLoadsError => "salarybench_pipeline_loads_error_total",
            MetricName::PipelineCacheHits => "salarybench_pipeline_cache_hits_total",
            MetricName::PipelineRowsLoaded => "salarybench_pipeline_rows_loaded_total",

            MetricName::SchemaMissingColumns => "salarybench_schema_missing_columns_total",

            MetricName::EnrichUnknownCategories => "salarybench_enrich_unknown_categories_total",
            MetricName::EnrichDateParseFailures => "salarybench_enrich_date_parse_failures_total",

            MetricName::QualityGateInvalidRangesDropped => {
                "salarybench_quality_gate_invalid_ranges_dropped_total"
            }
            MetricName::QualityGateOutliersRemoved => {
                "salarybench_quality_gate_outliers_removed_total"
            }
            MetricName::QualityGateCadenceFilterSkipped => {
                "salarybench_quality_gate_cadence_filter_skipped_total"
            }
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static METRICS_HANDLE: OnceLock<Arc<metrics_exporter_prometheus::PrometheusHandle>> =
    OnceLock::new();

/// Installs the Prometheus recorder so counters accumulate in-process.
/// Safe to call once per process; callers that skip it get no-op metrics.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE.set(Arc::new(handle)).ok();
    info!("Metrics system initialized");
    Ok(())
}

/// Renders the accumulated metrics in Prometheus text format, if the
/// recorder was installed.
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

pub mod pipeline {
    use super::MetricName;

    pub fn load_success() {
        ::metrics::counter!(MetricName::PipelineLoadsSuccess.as_str()).increment(1);
    }

    pub fn load_error() {
        ::metrics::counter!(MetricName::PipelineLoadsError.as_str()).increment(1);
    }

    pub fn cache_hit() {
        ::metrics::counter!(MetricName::PipelineCacheHits.as_str()).increment(1);
    }

    pub fn rows_loaded(count: u64) {
        ::metrics::counter!(MetricName::PipelineRowsLoaded.as_str()).increment(count);
    }
}

pub mod schema {
    use super::MetricName;

    pub fn missing_columns(count: u64) {
        ::metrics::counter!(MetricName::SchemaMissingColumns.as_str()).increment(count);
    }
}

pub mod enrich {
    use super::MetricName;

    pub fn unknown_categories(count: u64) {
        ::metrics::counter!(MetricName::EnrichUnknownCategories.as_str()).increment(count);
    }

    pub fn date_parse_failures(count: u64) {
        ::metrics::counter!(MetricName::EnrichDateParseFailures.as_str()).increment(count);
    }
}

pub mod quality_gate {
    use super::MetricName;

    pub fn invalid_ranges_dropped(count: u64) {
        ::metrics::counter!(MetricName::QualityGateInvalidRangesDropped.as_str()).increment(count);
    }

    pub fn outliers_removed(count: u64) {
        ::metrics::counter!(MetricName::QualityGateOutliersRemoved.as_str()).increment(count);
    }

    pub fn cadence_filter_skipped() {
        ::metrics::counter!(MetricName::QualityGateCadenceFilterSkipped.as_str()).increment(1);
    }
}
