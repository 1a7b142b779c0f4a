pub mod error;
pub mod types;

pub use error::{ExportError, Result};
pub use types::{DouyinApiEntry, DouyinScrapedEntry, NumericField, PrimaryExport, RawId, ShortVideoEntry};

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Load the combined TikTok / YouTube export. The file is required.
pub fn load_primary(path: &Path) -> Result<PrimaryExport> {
    let export: PrimaryExport = read_json(path)?;
    info!(
        path = %path.display(),
        tiktok = export.tiktok.len(),
        youtube = export.youtube.len(),
        "Loaded primary export"
    );
    Ok(export)
}

/// Load the Douyin API-batch export. Returns `None` when the file does not exist.
pub fn load_douyin_api(path: &Path) -> Result<Option<Vec<DouyinApiEntry>>> {
    read_optional(path, "douyin api")
}

/// Load the browser-scraped Douyin export. Returns `None` when the file does not exist.
pub fn load_douyin_scraped(path: &Path) -> Result<Option<Vec<DouyinScrapedEntry>>> {
    read_optional(path, "douyin scraped")
}

fn read_optional<T: DeserializeOwned>(path: &Path, label: &str) -> Result<Option<Vec<T>>> {
    if !path.exists() {
        debug!(path = %path.display(), source = label, "Optional export not present, skipping");
        return Ok(None);
    }
    let entries: Vec<T> = read_json(path)?;
    info!(path = %path.display(), source = label, entries = entries.len(), "Loaded export");
    Ok(Some(entries))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ExportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_optional_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_douyin_scraped(&dir.path().join("douyin_stats.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn missing_primary_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_primary(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn malformed_optional_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "douyin_full_stats.json", "{not json");
        let err = load_douyin_api(&path).unwrap_err();
        assert!(matches!(err, ExportError::Parse { .. }));
    }

    #[test]
    fn loads_douyin_api_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "douyin_full_stats.json",
            r#"[{"id": 42, "desc": "hello", "likes": "1.2万", "plays": 99}]"#,
        );
        let entries = load_douyin_api(&path).unwrap().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].desc.as_deref(), Some("hello"));
        assert_eq!(entries[0].likes, Some(NumericField::text("1.2万")));
    }
}
