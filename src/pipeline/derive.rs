use tracing::info;

use crate::domain::JobPosting;
use crate::error::{PipelineError, Result};
use crate::pipeline::normalize::{StagedPosting, NOT_SPECIFIED, UNKNOWN_CATEGORY};

/// Turns staged rows into final [`JobPosting`]s: derives the salary metrics
/// and fills the documented defaults.
///
/// Fails with [`PipelineError::Derivation`] when a salary bound never made
/// it through numeric coercion; everything downstream depends on the
/// derived metrics, so there is no per-row recovery here.
pub fn finalize(staged: Vec<StagedPosting>) -> Result<Vec<JobPosting>> {
    let mut rows = Vec::with_capacity(staged.len());

    for (i, row) in staged.into_iter().enumerate() {
        let salary_minimum = row.salary_minimum.ok_or_else(|| {
            PipelineError::Derivation(format!("salary_minimum is not numeric (data row {})", i + 1))
        })?;
        let salary_maximum = row.salary_maximum.ok_or_else(|| {
            PipelineError::Derivation(format!("salary_maximum is not numeric (data row {})", i + 1))
        })?;

        rows.push(JobPosting {
            title: row.title,
            salary_minimum,
            salary_maximum,
            salary_average: (salary_minimum + salary_maximum) / 2.0,
            salary_range: salary_maximum - salary_minimum,
            salary_type: row.salary_type,
            primary_category: row
                .primary_category
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            position_levels: row
                .position_levels
                .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            minimum_years_experience: row.minimum_years_experience.unwrap_or(0.0),
            expiry_date: row.expiry_date,
            new_posting_date: row.new_posting_date,
            original_posting_date: row.original_posting_date,
            company_name: row.company_name,
        });
    }

    info!(rows = rows.len(), "Salary metrics derived");
    Ok(rows)
}
