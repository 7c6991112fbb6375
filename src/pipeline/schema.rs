use std::collections::HashMap;

use crate::error::{PipelineError, Result};

/// Column names as they appear in the MyCareersFuture export.
pub mod columns {
    pub const TITLE: &str = "title";
    pub const SALARY_MINIMUM: &str = "salary_minimum";
    pub const SALARY_MAXIMUM: &str = "salary_maximum";
    pub const CATEGORIES: &str = "categories";
    pub const SALARY_TYPE: &str = "salary_type";
    pub const POSITION_LEVELS: &str = "positionLevels";
    pub const MINIMUM_YEARS_EXPERIENCE: &str = "minimumYearsExperience";
    pub const EXPIRY_DATE: &str = "metadata_expiryDate";
    pub const NEW_POSTING_DATE: &str = "metadata_newPostingDate";
    pub const ORIGINAL_POSTING_DATE: &str = "metadata_originalPostingDate";
    pub const COMPANY_NAME: &str = "postedCompany_name";
}

/// Columns the pipeline refuses to run without.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    columns::SALARY_MINIMUM,
    columns::SALARY_MAXIMUM,
    columns::CATEGORIES,
    columns::TITLE,
];

/// Columns the pipeline reads when present. Absent values fall back to the
/// documented defaults ("Not Specified", 0, None) during derivation.
pub const OPTIONAL_COLUMNS: [&str; 7] = [
    columns::SALARY_TYPE,
    columns::POSITION_LEVELS,
    columns::MINIMUM_YEARS_EXPERIENCE,
    columns::EXPIRY_DATE,
    columns::NEW_POSTING_DATE,
    columns::ORIGINAL_POSTING_DATE,
    columns::COMPANY_NAME,
];

/// Header-name → field-index lookup for one source file.
#[derive(Debug)]
pub struct ColumnIndex {
    by_name: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(headers: &[String]) -> Self {
        let by_name = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

/// Checks every required column at once so the error names all of them,
/// not just the first.
pub fn validate(index: &ColumnIndex) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !index.contains(name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::Schema(missing))
    }
}
