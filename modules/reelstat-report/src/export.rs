//! JSON outputs: the full analysis, the chart-ready series and the
//! normalized video records behind them.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use reelstat_analysis::{
    distribution_histogram, filter_solo, percentile_curve, Analysis, ChartIds, Histogram, PercentileCurve,
};
use reelstat_common::{MetricKey, Platform, VideoRecord};
use reelstat_ingest::Dataset;
use serde::Serialize;
use tracing::info;

use crate::summary::fmt_num;

pub const ANALYSIS_FILE: &str = "analysis.json";
pub const CHART_DATA_FILE: &str = "chart_data.json";
pub const VIDEOS_FILE: &str = "videos.json";

#[derive(Debug, Serialize)]
pub struct ChartData {
    pub platforms: BTreeMap<Platform, Vec<MetricCharts>>,
}

/// Charts for one metric panel. `scope` is `all` or `solo`.
#[derive(Debug, Serialize)]
pub struct MetricCharts {
    pub scope: &'static str,
    pub metric: MetricKey,
    pub bar_id: String,
    pub histogram: Option<HistogramChart>,
    pub percentile: PercentileChart,
}

#[derive(Debug, Serialize)]
pub struct HistogramChart {
    pub id: String,
    pub bin_labels: Vec<String>,
    #[serde(flatten)]
    pub data: Histogram,
}

#[derive(Debug, Serialize)]
pub struct PercentileChart {
    pub id: String,
    #[serde(flatten)]
    pub data: PercentileCurve,
}

/// Build every chart panel, numbering chart ids in report order.
pub fn build_chart_data(dataset: &Dataset, analysis: &Analysis) -> ChartData {
    let mut ids = ChartIds::new();
    let mut platforms = BTreeMap::new();

    for (platform, pa) in &analysis.platforms {
        let records = dataset.records(*platform);
        let solo = filter_solo(records);
        let mut panels = Vec::new();
        for (scope, records, rankings) in [("all", records, &pa.rankings), ("solo", solo.as_slice(), &pa.solo.rankings)] {
            for (metric, stats) in rankings {
                panels.push(metric_charts(&mut ids, scope, records, *metric, stats));
            }
        }
        platforms.insert(*platform, panels);
    }

    ChartData { platforms }
}

fn metric_charts(
    ids: &mut ChartIds,
    scope: &'static str,
    records: &[VideoRecord],
    metric: MetricKey,
    stats: &reelstat_analysis::StatsMap,
) -> MetricCharts {
    let bar_id = ids.next_id("mchart");
    let histogram = distribution_histogram(records, metric, stats).map(|data| HistogramChart {
        id: ids.next_id("dchart"),
        bin_labels: data.edges[..data.edges.len() - 1]
            .iter()
            .map(|e| fmt_num(*e as f64, 1))
            .collect(),
        data,
    });
    let percentile = PercentileChart {
        id: ids.next_id("pchart"),
        data: percentile_curve(records, metric, stats),
    };
    MetricCharts {
        scope,
        metric,
        bar_id,
        histogram,
        percentile,
    }
}

pub fn write_outputs(dir: &Path, dataset: &Dataset, analysis: &Analysis) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    write_json(&dir.join(ANALYSIS_FILE), analysis)?;
    write_json(&dir.join(CHART_DATA_FILE), &build_chart_data(dataset, analysis))?;
    write_json(&dir.join(VIDEOS_FILE), dataset)?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    std::fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Saved JSON");
    Ok(())
}
