use crate::config::QualityConfig;
use crate::domain::JobPosting;
use crate::pipeline::normalize::StagedPosting;

/// Drops staged rows whose salary bounds are inverted (minimum above
/// maximum). Returns the dropped count. Rows with a missing bound pass
/// through; they surface later as a derivation failure.
pub fn drop_invalid_ranges(staged: &mut Vec<StagedPosting>) -> usize {
    let before = staged.len();
    staged.retain(|row| match (row.salary_minimum, row.salary_maximum) {
        (Some(min), Some(max)) => min <= max,
        _ => true,
    });
    before - staged.len()
}

/// Keeps only rows whose pay cadence matches the configured label.
/// Returns the removed count. Callers should only invoke this when the
/// source actually carries a salary_type column.
pub fn apply_cadence_filter(rows: &mut Vec<JobPosting>, config: &QualityConfig) -> usize {
    let before = rows.len();
    rows.retain(|row| row.salary_type.as_deref() == Some(config.pay_cadence.as_str()));
    before - rows.len()
}

/// Removes rows outside the plausible salary band. Returns the removed count.
pub fn remove_outliers(rows: &mut Vec<JobPosting>, config: &QualityConfig) -> usize {
    let before = rows.len();
    rows.retain(|row| {
        row.salary_minimum >= config.salary_floor && row.salary_maximum <= config.salary_ceiling
    });
    before - rows.len()
}
