use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_DATA_PATH: &str = "data/SGJobData.csv";
pub const DATA_PATH_ENV: &str = "SALARYBENCH_DATA";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub quality: QualityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

/// Bounds and labels applied by the quality gate.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Lowest plausible monthly salary_minimum; rows below are outliers.
    pub salary_floor: f64,
    /// Highest plausible monthly salary_maximum; rows above are outliers.
    pub salary_ceiling: f64,
    /// Pay cadence retained when the source carries a salary_type column.
    pub pay_cadence: String,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            salary_floor: 1000.0,
            salary_ceiling: 50000.0,
            pay_cadence: "Monthly".to_string(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `config.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load_or_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolves the data file path: explicit flag, then environment, then
    /// the configured path.
    pub fn resolve_data_path(&self, flag: Option<PathBuf>) -> PathBuf {
        if let Some(path) = flag {
            return path;
        }
        if let Ok(path) = std::env::var(DATA_PATH_ENV) {
            return PathBuf::from(path);
        }
        self.data.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_quality_gate_bounds() {
        let config = Config::default();
        assert_eq!(config.quality.salary_floor, 1000.0);
        assert_eq!(config.quality.salary_ceiling, 50000.0);
        assert_eq!(config.quality.pay_cadence, "Monthly");
    }

    #[test]
    fn parses_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[data]").unwrap();
        writeln!(file, "path = \"postings.csv\"").unwrap();
        writeln!(file, "[quality]").unwrap();
        writeln!(file, "salary_ceiling = 40000.0").unwrap();
        file.flush().unwrap();

        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.data.path, PathBuf::from("postings.csv"));
        assert_eq!(config.quality.salary_ceiling, 40000.0);
        // Unset keys keep their defaults
        assert_eq!(config.quality.salary_floor, 1000.0);
    }
}
