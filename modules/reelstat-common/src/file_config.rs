use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::{Platform, Tier};

/// TOML-backed analysis parameters. Every section is optional and falls
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AnalysisConfig {
    pub files: FilesConfig,
    pub thresholds: ThresholdsConfig,
    pub tiers: TiersConfig,
}

/// Export file names, relative to the data directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FilesConfig {
    pub primary: PathBuf,
    pub douyin_api: PathBuf,
    pub douyin_scraped: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            primary: PathBuf::from("ive_all_stats.json"),
            douyin_api: PathBuf::from("douyin_full_stats.json"),
            douyin_scraped: PathBuf::from("douyin_stats.json"),
        }
    }
}

/// Viral hit-rate thresholds per platform, in report order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ThresholdsConfig {
    pub tiktok: Vec<u64>,
    pub youtube: Vec<u64>,
    pub douyin: Vec<u64>,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            tiktok: vec![5_000_000, 10_000_000, 20_000_000],
            youtube: vec![2_000_000, 5_000_000, 10_000_000],
            douyin: vec![200_000, 500_000, 1_000_000],
        }
    }
}

impl ThresholdsConfig {
    pub fn for_platform(&self, platform: Platform) -> &[u64] {
        match platform {
            Platform::TikTok => &self.tiktok,
            Platform::YouTube => &self.youtube,
            Platform::Douyin => &self.douyin,
        }
    }
}

/// Value bands for the tier distribution, per platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TiersConfig {
    pub tiktok: Vec<Tier>,
    pub youtube: Vec<Tier>,
    pub douyin: Vec<Tier>,
}

impl Default for TiersConfig {
    fn default() -> Self {
        Self {
            tiktok: vec![
                Tier::new("<1M", 0, Some(1_000_000)),
                Tier::new("1-5M", 1_000_000, Some(5_000_000)),
                Tier::new("5-10M", 5_000_000, Some(10_000_000)),
                Tier::new("10-20M", 10_000_000, Some(20_000_000)),
                Tier::new("20M+", 20_000_000, None),
            ],
            youtube: vec![
                Tier::new("<500K", 0, Some(500_000)),
                Tier::new("500K-2M", 500_000, Some(2_000_000)),
                Tier::new("2-5M", 2_000_000, Some(5_000_000)),
                Tier::new("5-10M", 5_000_000, Some(10_000_000)),
                Tier::new("10M+", 10_000_000, None),
            ],
            douyin: vec![
                Tier::new("<50K", 0, Some(50_000)),
                Tier::new("50-200K", 50_000, Some(200_000)),
                Tier::new("200-500K", 200_000, Some(500_000)),
                Tier::new("500K-1M", 500_000, Some(1_000_000)),
                Tier::new("1M+", 1_000_000, None),
            ],
        }
    }
}

impl TiersConfig {
    pub fn for_platform(&self, platform: Platform) -> &[Tier] {
        match platform {
            Platform::TikTok => &self.tiktok,
            Platform::YouTube => &self.youtube,
            Platform::Douyin => &self.douyin,
        }
    }
}

/// Load and parse a TOML analysis config file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: AnalysisConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}
