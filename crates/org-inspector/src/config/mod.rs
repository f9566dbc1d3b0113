use std::env;
use std::fmt;
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// How recipe outputs are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(ConfigError::InvalidOutputFormat {
                value: value.to_string(),
            }),
        }
    }
}

/// Top-level configuration for the inspector.
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    pub environment: AppEnvironment,
    pub datasets: DatasetConfig,
    pub output: OutputFormat,
    pub telemetry: TelemetryConfig,
}

impl InspectorConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let directory = env::var("INSPECTOR_DATASET_DIR").unwrap_or_else(|_| "datasets".to_string());
        if directory.trim().is_empty() {
            return Err(ConfigError::EmptyDatasetDir);
        }

        let output = OutputFormat::parse(
            &env::var("INSPECTOR_OUTPUT").unwrap_or_else(|_| "json".to_string()),
        )?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            datasets: DatasetConfig {
                directory: PathBuf::from(directory),
            },
            output,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where JSON dataset files are read from.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub directory: PathBuf,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyDatasetDir,
    InvalidOutputFormat { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyDatasetDir => {
                write!(f, "INSPECTOR_DATASET_DIR must not be empty")
            }
            ConfigError::InvalidOutputFormat { value } => {
                write!(f, "INSPECTOR_OUTPUT must be 'json' or 'csv', got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("INSPECTOR_DATASET_DIR");
        env::remove_var("INSPECTOR_OUTPUT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = InspectorConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.datasets.directory, PathBuf::from("datasets"));
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_overrides_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("INSPECTOR_DATASET_DIR", "/tmp/org-export");
        env::set_var("INSPECTOR_OUTPUT", "CSV");
        let config = InspectorConfig::load().expect("config loads");
        reset_env();
        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.datasets.directory, PathBuf::from("/tmp/org-export"));
        assert_eq!(config.output, OutputFormat::Csv);
    }

    #[test]
    fn rejects_unknown_output_format() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INSPECTOR_OUTPUT", "xml");
        let err = InspectorConfig::load().expect_err("xml is not supported");
        reset_env();
        assert!(matches!(err, ConfigError::InvalidOutputFormat { value } if value == "xml"));
    }

    #[test]
    fn rejects_blank_dataset_dir() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("INSPECTOR_DATASET_DIR", "  ");
        let err = InspectorConfig::load().expect_err("blank dir is rejected");
        reset_env();
        assert!(matches!(err, ConfigError::EmptyDatasetDir));
    }
}
