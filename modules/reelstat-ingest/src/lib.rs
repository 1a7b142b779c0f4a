pub mod counts;
pub mod merger;
pub mod tagger;
pub mod timestamps;

pub use counts::{parse_count, parse_localized_count};
pub use merger::{merge_douyin, normalize_short_videos, DouyinMerge, MergeReport};
pub use tagger::detect_members;

use std::path::Path;

use export_reader::{DouyinApiEntry, DouyinScrapedEntry, PrimaryExport};
use reelstat_common::{FilesConfig, Platform, Result, VideoRecord};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::info;

/// The normalized, tagged record sets for every platform.
#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
pub struct Dataset {
    pub tiktok: Vec<VideoRecord>,
    pub youtube: Vec<VideoRecord>,
    /// Merged API + scraped exports, ordered by likes descending.
    pub douyin: Vec<VideoRecord>,
    pub douyin_merge: MergeReport,
}

impl Dataset {
    pub fn records(&self, platform: Platform) -> &[VideoRecord] {
        match platform {
            Platform::TikTok => &self.tiktok,
            Platform::YouTube => &self.youtube,
            Platform::Douyin => &self.douyin,
        }
    }

    pub fn total_records(&self) -> usize {
        Platform::ALL.iter().map(|p| self.records(*p).len()).sum()
    }
}

/// Normalize already-loaded exports. Absent Douyin sources are empty.
pub fn normalize(
    primary: &PrimaryExport,
    douyin_api: Option<&[DouyinApiEntry]>,
    douyin_scraped: Option<&[DouyinScrapedEntry]>,
) -> Result<Dataset> {
    let tiktok = normalize_short_videos(Platform::TikTok, &primary.tiktok)?;
    let youtube = normalize_short_videos(Platform::YouTube, &primary.youtube)?;
    let DouyinMerge { records, report } =
        merge_douyin(douyin_api.unwrap_or_default(), douyin_scraped.unwrap_or_default())?;

    Ok(Dataset {
        tiktok,
        youtube,
        douyin: records,
        douyin_merge: report,
    })
}

/// Load every export under `data_dir` and normalize it.
///
/// The primary export is required; either Douyin file may be missing.
pub fn load_dataset(data_dir: &Path, files: &FilesConfig) -> Result<Dataset> {
    let primary = export_reader::load_primary(&data_dir.join(&files.primary))?;
    let api = export_reader::load_douyin_api(&data_dir.join(&files.douyin_api))?;
    let scraped = export_reader::load_douyin_scraped(&data_dir.join(&files.douyin_scraped))?;

    if api.is_none() {
        info!(file = %files.douyin_api.display(), "No douyin api export, primary douyin set is empty");
    }

    let dataset = normalize(&primary, api.as_deref(), scraped.as_deref())?;
    info!(
        tiktok = dataset.tiktok.len(),
        youtube = dataset.youtube.len(),
        douyin = dataset.douyin.len(),
        "Dataset normalized"
    );
    Ok(dataset)
}
