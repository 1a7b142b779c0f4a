pub mod analysis;
pub mod charts;
pub mod insights;
pub mod solo;
pub mod stats;
pub mod trends;
pub mod viral;

pub use analysis::{analyze, Analysis, PlatformAnalysis, SoloAnalysis};
pub use charts::{distribution_histogram, percentile_curve, ChartIds, Histogram, PercentileCurve};
pub use insights::{compute_consistency, compute_power_rankings, compute_tiers};
pub use solo::filter_solo;
pub use stats::{compute_stats, MemberStats, StatsMap};
pub use trends::{compute_trends, TrendPoint, TrendSeries};
pub use viral::{compute_viral, HitRate, TopVideo, ViralResult};
