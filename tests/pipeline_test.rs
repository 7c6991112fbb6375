use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use salarybench::config::QualityConfig;
use salarybench::error::PipelineError;
use salarybench::pipeline::DataPipeline;
use tempfile::NamedTempFile;

const FULL_HEADER: &str = "title,salary_minimum,salary_maximum,categories,salary_type,positionLevels,minimumYearsExperience,metadata_expiryDate,metadata_newPostingDate,metadata_originalPostingDate,postedCompany_name";

fn write_csv(lines: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    file.flush()?;
    Ok(file)
}

#[test]
fn cleaned_table_upholds_invariants() -> Result<()> {
    let file = write_csv(&[
        FULL_HEADER,
        r#"Data Engineer,4000,7000,"[{""category"": ""Information Technology""}]",Monthly,Executive,3,2023-05-01,2023-03-01,2023-02-15,Acme Pte Ltd"#,
        r#"Nurse,3000,4500,"[{""category"": ""Healthcare""}]",Monthly,Senior Executive,2,2023-06-01,2023-03-02,2023-02-20,City Hospital"#,
        // inverted salary range, dropped
        r#"Broken Row,9000,2000,"[{""category"": ""Engineering""}]",Monthly,Executive,1,2023-06-01,2023-03-02,2023-02-20,Acme Pte Ltd"#,
        // annual cadence, filtered
        r#"Director,120000,180000,"[{""category"": ""Banking and Finance""}]",Annual,Senior Management,10,2023-06-01,2023-03-02,2023-02-20,Big Bank"#,
        // below the salary floor, removed as outlier
        r#"Intern,500,800,"[{""category"": ""Admin""}]",Monthly,Fresh/entry level,0,2023-06-01,2023-03-02,2023-02-20,Startup"#,
    ])?;

    let mut pipeline = DataPipeline::with_defaults();
    let table = pipeline.load(file.path())?;

    assert_eq!(table.len(), 2);
    for row in &table.rows {
        assert!(row.salary_minimum <= row.salary_maximum);
        assert!(row.salary_minimum >= 1000.0);
        assert!(row.salary_maximum <= 50000.0);
        assert_eq!(row.salary_average, (row.salary_minimum + row.salary_maximum) / 2.0);
        assert_eq!(row.salary_range, row.salary_maximum - row.salary_minimum);
        assert_eq!(row.salary_type.as_deref(), Some("Monthly"));
        assert!(!row.primary_category.is_empty());
    }

    let report = &table.report;
    assert_eq!(report.source_rows, 5);
    assert_eq!(report.invalid_ranges_dropped, 1);
    assert_eq!(report.outliers_removed, 1);
    assert!(report.cadence_filter_applied);
    Ok(())
}

#[test]
fn categories_and_dates_are_enriched() -> Result<()> {
    let file = write_csv(&[
        FULL_HEADER,
        r#"Engineer,4000,7000,"[{""category"": ""Engineering""}]",Monthly,Executive,3,2023-05-01,not a date,,Acme"#,
        r#"Clerk,2000,3000,"[]",Monthly,Executive,0,2023-05-01,2023-03-01,2023-02-15,Acme"#,
        r#"Typist,2000,3000,not json,Monthly,Executive,0,2023-05-01,2023-03-01,2023-02-15,Acme"#,
    ])?;

    let mut pipeline = DataPipeline::with_defaults();
    let table = pipeline.load(file.path())?;

    assert_eq!(table.rows[0].primary_category, "Engineering");
    assert_eq!(table.rows[1].primary_category, "Unknown");
    assert_eq!(table.rows[2].primary_category, "Unknown");

    assert!(table.rows[0].expiry_date.is_some());
    assert!(table.rows[0].new_posting_date.is_none());
    assert!(table.rows[0].original_posting_date.is_none());

    // one unparsable date counted; the empty cell is absent, not a failure
    assert_eq!(table.report.unparsed_dates, 1);
    assert_eq!(table.report.unknown_categories, 2);
    Ok(())
}

#[test]
fn missing_required_columns_are_all_named() -> Result<()> {
    let file = write_csv(&[
        "salary_minimum,categories",
        "4000,\"[]\"",
    ])?;

    let mut pipeline = DataPipeline::with_defaults();
    let err = pipeline.load(file.path()).unwrap_err();

    match err {
        PipelineError::Schema(missing) => {
            assert_eq!(missing, vec!["salary_maximum".to_string(), "title".to_string()]);
        }
        other => panic!("expected Schema error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn missing_title_is_schema_error() -> Result<()> {
    let file = write_csv(&[
        "salary_minimum,salary_maximum,categories",
        "4000,7000,\"[]\"",
    ])?;

    let mut pipeline = DataPipeline::with_defaults();
    let err = pipeline.load(file.path()).unwrap_err();
    assert!(err.to_string().contains("title"));
    Ok(())
}

#[test]
fn header_only_source_is_empty() -> Result<()> {
    let file = write_csv(&[FULL_HEADER])?;

    let mut pipeline = DataPipeline::with_defaults();
    let err = pipeline.load(file.path()).unwrap_err();
    assert!(matches!(err, PipelineError::EmptySource(_)));
    Ok(())
}

#[test]
fn missing_file_is_source_not_found() {
    let mut pipeline = DataPipeline::with_defaults();
    let err = pipeline
        .load(std::path::Path::new("no/such/SGJobData.csv"))
        .unwrap_err();
    assert!(matches!(err, PipelineError::SourceNotFound(_)));
}

#[test]
fn absent_cadence_column_keeps_all_rows_with_warning() -> Result<()> {
    let file = write_csv(&[
        "title,salary_minimum,salary_maximum,categories",
        r#"Engineer,4000,7000,"[{""category"": ""Engineering""}]""#,
        r#"Director,8000,12000,"[{""category"": ""Banking""}]""#,
    ])?;

    let mut pipeline = DataPipeline::with_defaults();
    let table = pipeline.load(file.path())?;

    assert_eq!(table.len(), 2);
    assert!(!table.report.cadence_filter_applied);
    assert!(table
        .report
        .warnings
        .iter()
        .any(|w| w.contains("salary_type")));
    Ok(())
}

#[test]
fn non_numeric_salary_is_derivation_error() -> Result<()> {
    let file = write_csv(&[
        "title,salary_minimum,salary_maximum,categories",
        r#"Engineer,lots,7000,"[]""#,
    ])?;

    let mut pipeline = DataPipeline::with_defaults();
    let err = pipeline.load(file.path()).unwrap_err();
    assert!(matches!(err, PipelineError::Derivation(_)));
    Ok(())
}

#[test]
fn bom_prefixed_source_loads() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(file, "\u{feff}title,salary_minimum,salary_maximum,categories\n")?;
    writeln!(file, r#"Engineer,4000,7000,"[{{""category"": ""Engineering""}}]""#)?;
    file.flush()?;

    let mut pipeline = DataPipeline::with_defaults();
    let table = pipeline.load(file.path())?;
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].primary_category, "Engineering");
    Ok(())
}

#[test]
fn second_load_hits_the_cache() -> Result<()> {
    let file = write_csv(&[
        "title,salary_minimum,salary_maximum,categories",
        r#"Engineer,4000,7000,"[{""category"": ""Engineering""}]""#,
    ])?;

    let mut pipeline = DataPipeline::with_defaults();
    let first = pipeline.load(file.path())?;
    let second = pipeline.load(file.path())?;

    // Same Arc, no re-parse
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), second.len());
    assert_eq!(pipeline.cached_sources(), 1);
    Ok(())
}

#[test]
fn custom_quality_band_is_honored() -> Result<()> {
    let file = write_csv(&[
        "title,salary_minimum,salary_maximum,categories",
        r#"Engineer,500,900,"[]""#,
        r#"Director,2000,3000,"[]""#,
    ])?;

    let quality = QualityConfig {
        salary_floor: 400.0,
        salary_ceiling: 1000.0,
        pay_cadence: "Monthly".to_string(),
    };
    let mut pipeline = DataPipeline::new(quality);
    let table = pipeline.load(file.path())?;

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].title, "Engineer");
    assert_eq!(table.report.outliers_removed, 1);
    Ok(())
}
