use std::collections::HashMap;

use rand::seq::SliceRandom;
use serde::Serialize;

use crate::analysis::stats;
use crate::domain::JobPosting;

/// Headline figures for a set of postings, computed over `salary_average`.
#[derive(Debug, Clone, Serialize)]
pub struct SalarySummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: Option<f64>,
}

impl SalarySummary {
    pub fn from_rows(rows: &[&JobPosting]) -> Option<Self> {
        let salaries: Vec<f64> = rows.iter().map(|r| r.salary_average).collect();
        if salaries.is_empty() {
            return None;
        }

        Some(Self {
            count: salaries.len(),
            mean: stats::mean(&salaries)?,
            median: stats::median(&salaries)?,
            p25: stats::quantile(&salaries, 0.25)?,
            p75: stats::quantile(&salaries, 0.75)?,
            min: salaries.iter().copied().fold(f64::INFINITY, f64::min),
            max: salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std_dev: stats::std_dev(&salaries),
        })
    }
}

/// Per-group salary statistics (position level, category).
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
    pub mean_salary: f64,
    pub median_salary: f64,
    pub std_dev: Option<f64>,
}

fn group_salaries<'a, F>(rows: &[&'a JobPosting], key_of: F) -> HashMap<String, Vec<f64>>
where
    F: Fn(&'a JobPosting) -> &'a str,
{
    let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
    for row in rows {
        groups
            .entry(key_of(row).to_string())
            .or_default()
            .push(row.salary_average);
    }
    groups
}

fn summarize_groups(groups: HashMap<String, Vec<f64>>, min_count: usize) -> Vec<GroupSummary> {
    let mut summaries: Vec<GroupSummary> = groups
        .into_iter()
        .filter(|(_, salaries)| salaries.len() >= min_count)
        .filter_map(|(key, salaries)| {
            Some(GroupSummary {
                count: salaries.len(),
                mean_salary: stats::mean(&salaries)?,
                median_salary: stats::median(&salaries)?,
                std_dev: stats::std_dev(&salaries),
                key,
            })
        })
        .collect();

    summaries.sort_by(|a, b| b.median_salary.total_cmp(&a.median_salary));
    summaries
}

/// Salary statistics per position level, highest median first.
pub fn by_position_level(rows: &[&JobPosting]) -> Vec<GroupSummary> {
    summarize_groups(group_salaries(rows, |r| &r.position_levels), 1)
}

/// Salary statistics per primary category, highest median first. Groups
/// below `min_count` postings are omitted; at most `top` groups returned.
pub fn by_category(rows: &[&JobPosting], min_count: usize, top: usize) -> Vec<GroupSummary> {
    let mut summaries = summarize_groups(group_salaries(rows, |r| &r.primary_category), min_count);
    summaries.truncate(top);
    summaries
}

/// Posting volume against median pay per category, busiest categories first.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDemand {
    pub category: String,
    pub postings: usize,
    pub median_salary: f64,
}

pub fn demand_vs_pay(rows: &[&JobPosting], min_count: usize, top: usize) -> Vec<CategoryDemand> {
    let mut demand: Vec<CategoryDemand> = group_salaries(rows, |r| &r.primary_category)
        .into_iter()
        .filter(|(_, salaries)| salaries.len() >= min_count)
        .filter_map(|(category, salaries)| {
            Some(CategoryDemand {
                category,
                postings: salaries.len(),
                median_salary: stats::median(&salaries)?,
            })
        })
        .collect();

    demand.sort_by(|a, b| b.postings.cmp(&a.postings));
    demand.truncate(top);
    demand
}

/// The `n` highest-paying postings by average salary.
pub fn top_paying<'a>(rows: &[&'a JobPosting], n: usize) -> Vec<&'a JobPosting> {
    let mut sorted: Vec<&JobPosting> = rows.to_vec();
    sorted.sort_by(|a, b| b.salary_average.total_cmp(&a.salary_average));
    sorted.truncate(n);
    sorted
}

/// Mean and median of the advertised salary spread (max − min).
#[derive(Debug, Clone, Serialize)]
pub struct SpreadSummary {
    pub mean_range: f64,
    pub median_range: f64,
}

pub fn salary_spread(rows: &[&JobPosting]) -> Option<SpreadSummary> {
    let ranges: Vec<f64> = rows.iter().map(|r| r.salary_range).collect();
    Some(SpreadSummary {
        mean_range: stats::mean(&ranges)?,
        median_range: stats::median(&ranges)?,
    })
}

/// Pearson correlation between required experience and average salary.
pub fn experience_correlation(rows: &[&JobPosting]) -> Option<f64> {
    let years: Vec<f64> = rows.iter().map(|r| r.minimum_years_experience).collect();
    let salaries: Vec<f64> = rows.iter().map(|r| r.salary_average).collect();
    stats::correlation(&years, &salaries)
}

/// Salary statistics for one required-experience level.
#[derive(Debug, Clone, Serialize)]
pub struct ExperiencePoint {
    pub years: u32,
    pub count: usize,
    pub mean_salary: f64,
    pub median_salary: f64,
}

/// Mean/median salary per year of required experience, ascending, capped at
/// `max_years` to keep the long tail out.
pub fn experience_trend(rows: &[&JobPosting], max_years: u32) -> Vec<ExperiencePoint> {
    let mut groups: HashMap<u32, Vec<f64>> = HashMap::new();
    for row in rows {
        let years = row.minimum_years_experience.round().max(0.0) as u32;
        if years <= max_years {
            groups.entry(years).or_default().push(row.salary_average);
        }
    }

    let mut points: Vec<ExperiencePoint> = groups
        .into_iter()
        .filter_map(|(years, salaries)| {
            Some(ExperiencePoint {
                years,
                count: salaries.len(),
                mean_salary: stats::mean(&salaries)?,
                median_salary: stats::median(&salaries)?,
            })
        })
        .collect();

    points.sort_by_key(|p| p.years);
    points
}

/// Fixed grouping of required experience into career stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExperienceBracket {
    Entry,
    Junior,
    Mid,
    Senior,
    Expert,
}

impl ExperienceBracket {
    pub const ALL: [ExperienceBracket; 5] = [
        ExperienceBracket::Entry,
        ExperienceBracket::Junior,
        ExperienceBracket::Mid,
        ExperienceBracket::Senior,
        ExperienceBracket::Expert,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExperienceBracket::Entry => "Entry (0-2y)",
            ExperienceBracket::Junior => "Junior (3-5y)",
            ExperienceBracket::Mid => "Mid (6-10y)",
            ExperienceBracket::Senior => "Senior (11-20y)",
            ExperienceBracket::Expert => "Expert (20+y)",
        }
    }

    pub fn for_years(years: f64) -> Self {
        if years <= 2.0 {
            ExperienceBracket::Entry
        } else if years <= 5.0 {
            ExperienceBracket::Junior
        } else if years <= 10.0 {
            ExperienceBracket::Mid
        } else if years <= 20.0 {
            ExperienceBracket::Senior
        } else {
            ExperienceBracket::Expert
        }
    }
}

/// Median salary per experience bracket, in bracket order. Brackets with no
/// postings are omitted.
pub fn bracket_medians(rows: &[&JobPosting]) -> Vec<(ExperienceBracket, f64, usize)> {
    let mut groups: HashMap<ExperienceBracket, Vec<f64>> = HashMap::new();
    for row in rows {
        groups
            .entry(ExperienceBracket::for_years(row.minimum_years_experience))
            .or_default()
            .push(row.salary_average);
    }

    ExperienceBracket::ALL
        .iter()
        .filter_map(|bracket| {
            let salaries = groups.get(bracket)?;
            Some((*bracket, stats::median(salaries)?, salaries.len()))
        })
        .collect()
}

/// Uniform random downsample to at most `n` rows, for plotting-sized output.
pub fn sample<'a>(rows: &[&'a JobPosting], n: usize) -> Vec<&'a JobPosting> {
    let mut rng = rand::thread_rng();
    rows.choose_multiple(&mut rng, n.min(rows.len()))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(category: &str, position: &str, years: f64, average: f64) -> JobPosting {
        JobPosting {
            title: format!("{} role", category),
            salary_minimum: average - 500.0,
            salary_maximum: average + 500.0,
            salary_average: average,
            salary_range: 1000.0,
            salary_type: Some("Monthly".to_string()),
            primary_category: category.to_string(),
            position_levels: position.to_string(),
            minimum_years_experience: years,
            expiry_date: None,
            new_posting_date: None,
            original_posting_date: None,
            company_name: None,
        }
    }

    fn refs(rows: &[JobPosting]) -> Vec<&JobPosting> {
        rows.iter().collect()
    }

    #[test]
    fn summary_over_known_rows() {
        let rows = vec![
            posting("Engineering", "Executive", 2.0, 4000.0),
            posting("Engineering", "Executive", 3.0, 6000.0),
            posting("Banking", "Manager", 5.0, 8000.0),
        ];
        let summary = SalarySummary::from_rows(&refs(&rows)).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.mean, 6000.0);
        assert_eq!(summary.median, 6000.0);
        assert_eq!(summary.min, 4000.0);
        assert_eq!(summary.max, 8000.0);
    }

    #[test]
    fn empty_rows_have_no_summary() {
        assert!(SalarySummary::from_rows(&[]).is_none());
    }

    #[test]
    fn category_grouping_applies_threshold_and_order() {
        let rows = vec![
            posting("Engineering", "Executive", 2.0, 4000.0),
            posting("Engineering", "Executive", 2.0, 5000.0),
            posting("Banking", "Manager", 5.0, 9000.0),
        ];
        let groups = by_category(&refs(&rows), 2, 10);
        // Banking has only one posting and is filtered out
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Engineering");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].median_salary, 4500.0);
    }

    #[test]
    fn position_groups_sorted_by_median_desc() {
        let rows = vec![
            posting("Engineering", "Junior Executive", 1.0, 3000.0),
            posting("Engineering", "Senior Management", 12.0, 15000.0),
        ];
        let groups = by_position_level(&refs(&rows));
        assert_eq!(groups[0].key, "Senior Management");
        assert_eq!(groups[1].key, "Junior Executive");
    }

    #[test]
    fn top_paying_orders_and_truncates() {
        let rows = vec![
            posting("A", "x", 1.0, 3000.0),
            posting("B", "x", 1.0, 9000.0),
            posting("C", "x", 1.0, 6000.0),
        ];
        let top = top_paying(&refs(&rows), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].primary_category, "B");
        assert_eq!(top[1].primary_category, "C");
    }

    #[test]
    fn correlation_rises_with_experience() {
        let rows = vec![
            posting("A", "x", 1.0, 3000.0),
            posting("A", "x", 5.0, 5000.0),
            posting("A", "x", 10.0, 8000.0),
        ];
        let r = experience_correlation(&refs(&rows)).unwrap();
        assert!(r > 0.9);
    }

    #[test]
    fn brackets_cover_edges() {
        assert_eq!(ExperienceBracket::for_years(0.0), ExperienceBracket::Entry);
        assert_eq!(ExperienceBracket::for_years(2.0), ExperienceBracket::Entry);
        assert_eq!(ExperienceBracket::for_years(3.0), ExperienceBracket::Junior);
        assert_eq!(ExperienceBracket::for_years(10.0), ExperienceBracket::Mid);
        assert_eq!(ExperienceBracket::for_years(20.0), ExperienceBracket::Senior);
        assert_eq!(ExperienceBracket::for_years(21.0), ExperienceBracket::Expert);
    }

    #[test]
    fn bracket_medians_in_bracket_order() {
        let rows = vec![
            posting("A", "x", 1.0, 3000.0),
            posting("A", "x", 4.0, 5000.0),
            posting("A", "x", 25.0, 12000.0),
        ];
        let medians = bracket_medians(&refs(&rows));
        assert_eq!(medians.len(), 3);
        assert_eq!(medians[0].0, ExperienceBracket::Entry);
        assert_eq!(medians[1].0, ExperienceBracket::Junior);
        assert_eq!(medians[2].0, ExperienceBracket::Expert);
    }

    #[test]
    fn experience_trend_caps_years() {
        let rows = vec![
            posting("A", "x", 2.0, 3000.0),
            posting("A", "x", 2.0, 4000.0),
            posting("A", "x", 30.0, 20000.0),
        ];
        let trend = experience_trend(&refs(&rows), 20);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].years, 2);
        assert_eq!(trend[0].count, 2);
        assert_eq!(trend[0].mean_salary, 3500.0);
    }

    #[test]
    fn sample_is_bounded() {
        let rows = vec![
            posting("A", "x", 1.0, 3000.0),
            posting("B", "x", 1.0, 4000.0),
            posting("C", "x", 1.0, 5000.0),
        ];
        let view = refs(&rows);
        assert_eq!(sample(&view, 2).len(), 2);
        assert_eq!(sample(&view, 10).len(), 3);
    }
}
