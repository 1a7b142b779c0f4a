use std::collections::BTreeMap;

use reelstat_common::{AnalysisConfig, Member, MetricKey, Platform, VideoRecord};
use reelstat_ingest::{Dataset, MergeReport};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::info;

use crate::insights::{compute_consistency, compute_power_rankings, compute_tiers, Consistency, MemberTiers, PowerRanking};
use crate::solo::filter_solo;
use crate::stats::{compute_stats, StatsMap};
use crate::trends::{compute_trends, TrendSeries};
use crate::viral::{compute_viral, ViralResult};

/// Every aggregate computed for one run.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Analysis {
    pub platforms: BTreeMap<Platform, PlatformAnalysis>,
    pub douyin_merge: MergeReport,
}

impl Analysis {
    pub fn platform(&self, platform: Platform) -> Option<&PlatformAnalysis> {
        self.platforms.get(&platform)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlatformAnalysis {
    pub platform: Platform,
    pub record_count: usize,
    pub primary_metric: MetricKey,
    /// Primary metric first, then the platform's engagement metrics.
    pub rankings: BTreeMap<MetricKey, StatsMap>,
    pub viral: ViralResult,
    /// Only for platforms whose records carry dates.
    pub trends: Option<TrendSeries>,
    pub tiers: BTreeMap<Member, MemberTiers>,
    pub consistency: BTreeMap<Member, Consistency>,
    pub power_rankings: BTreeMap<Member, PowerRanking>,
    pub solo: SoloAnalysis,
}

impl PlatformAnalysis {
    pub fn primary_rankings(&self) -> Option<&StatsMap> {
        self.rankings.get(&self.primary_metric)
    }
}

/// The same aggregates, restricted to single-performer videos.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SoloAnalysis {
    pub solo_count: usize,
    pub rankings: BTreeMap<MetricKey, StatsMap>,
    pub viral: ViralResult,
    pub trends: Option<TrendSeries>,
}

/// Run every aggregate over the normalized dataset, platforms in report order.
pub fn analyze(dataset: &Dataset, config: &AnalysisConfig) -> Analysis {
    let platforms = Platform::ALL
        .into_iter()
        .map(|platform| (platform, analyze_platform(platform, dataset.records(platform), config)))
        .collect();

    Analysis {
        platforms,
        douyin_merge: dataset.douyin_merge.clone(),
    }
}

pub fn analyze_platform(platform: Platform, records: &[VideoRecord], config: &AnalysisConfig) -> PlatformAnalysis {
    let metric = platform.primary_metric();
    let thresholds = config.thresholds.for_platform(platform);

    let rankings = rank_metrics(platform, records);
    let primary = rankings.get(&metric).cloned().unwrap_or_default();
    let viral = compute_viral(records, metric, thresholds);

    let solo_records = filter_solo(records);
    let solo = SoloAnalysis {
        solo_count: solo_records.len(),
        rankings: rank_metrics(platform, &solo_records),
        viral: compute_viral(&solo_records, metric, thresholds),
        trends: platform.has_dates().then(|| compute_trends(&solo_records, metric)),
    };

    info!(
        %platform,
        records = records.len(),
        solo = solo.solo_count,
        members = primary.len(),
        "Platform analyzed"
    );

    PlatformAnalysis {
        platform,
        record_count: records.len(),
        primary_metric: metric,
        trends: platform.has_dates().then(|| compute_trends(records, metric)),
        tiers: compute_tiers(records, metric, config.tiers.for_platform(platform)),
        consistency: compute_consistency(&primary),
        power_rankings: compute_power_rankings(&primary, &viral),
        rankings,
        viral,
        solo,
    }
}

fn rank_metrics(platform: Platform, records: &[VideoRecord]) -> BTreeMap<MetricKey, StatsMap> {
    std::iter::once(platform.primary_metric())
        .chain(platform.secondary_metrics().iter().copied())
        .map(|metric| (metric, compute_stats(records, metric)))
        .collect()
}
