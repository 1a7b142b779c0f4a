use thiserror::Error;

use crate::types::Platform;

pub type Result<T> = std::result::Result<T, ReelstatError>;

#[derive(Error, Debug)]
pub enum ReelstatError {
    /// A required identifier is missing. Identifiers are the dedup key, so
    /// the whole source is rejected rather than the row dropped.
    #[error("{platform} export entry #{index} has no id")]
    MissingId { platform: Platform, index: usize },

    #[error("Export error: {0}")]
    Export(#[from] export_reader::ExportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
