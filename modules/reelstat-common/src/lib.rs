pub mod config;
pub mod error;
pub mod file_config;
pub mod types;

pub use config::Config;
pub use error::{ReelstatError, Result};
pub use file_config::{load_config, AnalysisConfig, FilesConfig, ThresholdsConfig, TiersConfig};
pub use types::*;
