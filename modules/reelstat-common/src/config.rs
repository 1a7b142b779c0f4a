use std::env;
use std::path::{Path, PathBuf};

/// Run configuration loaded from environment variables.
/// Analysis parameters (thresholds, tiers, file names) live in the TOML
/// `AnalysisConfig`; this only says where things are.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the platform exports.
    pub data_dir: PathBuf,
    /// Directory the JSON outputs are written to; the data directory when unset.
    pub output_dir: Option<PathBuf>,
    /// Optional TOML analysis config.
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = env::var("REELSTAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let output_dir = env::var("REELSTAT_OUTPUT_DIR").ok().filter(|s| !s.is_empty()).map(PathBuf::from);
        let config_path = env::var("REELSTAT_CONFIG").ok().filter(|s| !s.is_empty()).map(PathBuf::from);

        Self {
            data_dir,
            output_dir,
            config_path,
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.data_dir)
    }

    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  REELSTAT_DATA_DIR: {}", self.data_dir.display());
        tracing::info!("  REELSTAT_OUTPUT_DIR: {}", self.output_dir().display());
        tracing::info!(
            "  REELSTAT_CONFIG: {}",
            self.config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<not set>".to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(data_dir: &str) -> Config {
        Config {
            data_dir: PathBuf::from(data_dir),
            output_dir: None,
            config_path: None,
        }
    }

    #[test]
    fn output_dir_follows_data_dir_until_set() {
        let config = config("exports").with_data_dir("other");
        assert_eq!(config.output_dir(), Path::new("other"));
        let config = config.with_output_dir("out");
        assert_eq!(config.output_dir(), Path::new("out"));
    }
}
