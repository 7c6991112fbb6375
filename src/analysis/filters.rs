use crate::domain::JobPosting;

/// Optional constraints applied to the cleaned table; an unset field means
/// no constraint. Intervals are inclusive on both ends.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub category: Option<String>,
    pub position_level: Option<String>,
    pub min_experience: Option<f64>,
    pub max_experience: Option<f64>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn position_level(mut self, level: impl Into<String>) -> Self {
        self.position_level = Some(level.into());
        self
    }

    pub fn experience_between(mut self, min: f64, max: f64) -> Self {
        self.min_experience = Some(min);
        self.max_experience = Some(max);
        self
    }

    pub fn salary_between(mut self, min: f64, max: f64) -> Self {
        self.min_salary = Some(min);
        self.max_salary = Some(max);
        self
    }

    pub fn matches(&self, row: &JobPosting) -> bool {
        if let Some(category) = &self.category {
            if row.primary_category != *category {
                return false;
            }
        }
        if let Some(level) = &self.position_level {
            if row.position_levels != *level {
                return false;
            }
        }
        if let Some(min) = self.min_experience {
            if row.minimum_years_experience < min {
                return false;
            }
        }
        if let Some(max) = self.max_experience {
            if row.minimum_years_experience > max {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            if row.salary_average < min {
                return false;
            }
        }
        if let Some(max) = self.max_salary {
            if row.salary_average > max {
                return false;
            }
        }
        true
    }

    /// Borrowed view of the matching rows; the base table is never mutated.
    pub fn apply<'a>(&self, rows: &'a [JobPosting]) -> Vec<&'a JobPosting> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}
