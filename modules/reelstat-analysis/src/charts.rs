//! Chart-ready binning of metric values. Pure data; markup is the report
//! layer's business.

use reelstat_common::{Member, MetricKey, VideoRecord};
use schemars::JsonSchema;
use serde::Serialize;

use crate::stats::{member_values, StatsMap};

pub const HISTOGRAM_BINS: usize = 20;
pub const CURVE_POINTS: [usize; 9] = [1, 5, 10, 25, 50, 75, 90, 95, 99];

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HistogramSeries {
    pub member: Member,
    /// Percent of the performer's videos per bin, one decimal.
    pub percents: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Histogram {
    /// `HISTOGRAM_BINS + 1` rounded bin edges; the last is the p95 cap.
    pub edges: Vec<u64>,
    pub members: Vec<HistogramSeries>,
}

/// Share of each performer's videos per value range.
///
/// The range is capped at the 95th percentile (ascending) of all positive
/// values so a few outliers do not flatten the chart; anything above the
/// cap falls into the last bin. `None` when no value is positive.
pub fn distribution_histogram(records: &[VideoRecord], metric: MetricKey, stats: &StatsMap) -> Option<Histogram> {
    let mut positive: Vec<u64> = records
        .iter()
        .filter_map(|r| r.value(metric))
        .filter(|&v| v > 0)
        .collect();
    if positive.is_empty() {
        return None;
    }
    positive.sort_unstable();

    let p95 = positive[(positive.len() * 95 / 100).min(positive.len() - 1)];
    let cap = p95.max(1) as f64;
    let width = cap / HISTOGRAM_BINS as f64;
    let edges: Vec<u64> = (0..=HISTOGRAM_BINS)
        .map(|i| (i as f64 * width).round_ties_even() as u64)
        .collect();

    let values = member_values(records, metric);
    let members = stats
        .keys()
        .filter_map(|member| {
            let vals = values.get(member)?;
            let mut counts = [0usize; HISTOGRAM_BINS];
            for &v in vals {
                let bin = (0..HISTOGRAM_BINS)
                    .find(|&i| v < edges[i + 1])
                    .unwrap_or(HISTOGRAM_BINS - 1);
                counts[bin] += 1;
            }
            let percents = counts
                .iter()
                .map(|&c| round1(c as f64 / vals.len() as f64 * 100.0))
                .collect();
            Some(HistogramSeries {
                member: *member,
                percents,
            })
        })
        .collect();

    Some(Histogram { edges, members })
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CurveSeries {
    pub member: Member,
    /// Value at each of `CURVE_POINTS`, floored to 1 for log scales.
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PercentileCurve {
    pub labels: Vec<String>,
    pub members: Vec<CurveSeries>,
}

/// Per-performer value at P1..P99, read from the ascending sort at
/// `min(floor(n * p / 100), n - 1)`. This is the classical convention and
/// is independent of the inverted percentiles in `MemberStats`.
pub fn percentile_curve(records: &[VideoRecord], metric: MetricKey, stats: &StatsMap) -> PercentileCurve {
    let values = member_values(records, metric);
    let members = stats
        .keys()
        .filter_map(|member| {
            let mut vals = values.get(member)?.clone();
            vals.sort_unstable();
            let n = vals.len();
            let points = CURVE_POINTS
                .iter()
                .map(|&p| vals[(n * p / 100).min(n - 1)].max(1))
                .collect();
            Some(CurveSeries {
                member: *member,
                values: points,
            })
        })
        .collect();

    PercentileCurve {
        labels: CURVE_POINTS.iter().map(|p| format!("P{p}")).collect(),
        members,
    }
}

/// Unique chart element ids for one report. Each builder owns its own
/// counter, so two reports never share numbering.
#[derive(Debug, Default)]
pub struct ChartIds {
    next: u32,
}

impl ChartIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// `prefix` followed by the next number, e.g. `mchart1`, `dchart2`.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{prefix}{}", self.next)
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_stats;
    use reelstat_common::{Members, Platform};

    fn record(members: &[Member], views: u64) -> VideoRecord {
        VideoRecord::new(Platform::TikTok, "1", "", Members::from_tags(members.iter().copied()))
            .with_metric(MetricKey::Views, views)
    }

    #[test]
    fn histogram_caps_at_p95_and_overflows_into_last_bin() {
        let mut records: Vec<VideoRecord> = (1..=20).map(|v| record(&[Member::Rei], v * 10)).collect();
        records.push(record(&[Member::Rei], 1_000_000));
        let stats = compute_stats(&records, MetricKey::Views);
        let hist = distribution_histogram(&records, MetricKey::Views, &stats).unwrap();

        // 21 positive values, index floor(21 * 0.95) = 19 -> 200
        assert_eq!(hist.edges.len(), HISTOGRAM_BINS + 1);
        assert_eq!(*hist.edges.last().unwrap(), 200);
        assert_eq!(hist.edges[1], 10);

        let rei = &hist.members[0];
        // last bin is [190, 200) plus everything at or above the cap
        assert_eq!(rei.percents[HISTOGRAM_BINS - 1], round1(3.0 / 21.0 * 100.0));
        let sum: f64 = rei.percents.iter().sum();
        assert!((sum - 100.0).abs() < 1.0);
    }

    #[test]
    fn histogram_includes_zero_values_but_not_in_cap() {
        let records = vec![record(&[Member::Liz], 0), record(&[Member::Liz], 40)];
        let stats = compute_stats(&records, MetricKey::Views);
        let hist = distribution_histogram(&records, MetricKey::Views, &stats).unwrap();
        assert_eq!(*hist.edges.last().unwrap(), 40);
        assert_eq!(hist.members[0].percents[0], 50.0);
    }

    #[test]
    fn histogram_needs_a_positive_value() {
        let records = vec![record(&[Member::Liz], 0)];
        let stats = compute_stats(&records, MetricKey::Views);
        assert!(distribution_histogram(&records, MetricKey::Views, &stats).is_none());
    }

    #[test]
    fn percentile_curve_reads_ascending_and_floors_to_one() {
        let records: Vec<VideoRecord> = (0..100).map(|v| record(&[Member::Gaeul], v)).collect();
        let stats = compute_stats(&records, MetricKey::Views);
        let curve = percentile_curve(&records, MetricKey::Views, &stats);
        assert_eq!(curve.labels[0], "P1");
        assert_eq!(curve.members[0].values, vec![1, 5, 10, 25, 50, 75, 90, 95, 99]);

        let single = vec![record(&[Member::Rei], 0)];
        let curve = percentile_curve(&single, MetricKey::Views, &compute_stats(&single, MetricKey::Views));
        assert!(curve.members[0].values.iter().all(|&v| v == 1));
    }

    #[test]
    fn chart_ids_count_per_builder() {
        let mut ids = ChartIds::new();
        assert_eq!(ids.next_id("mchart"), "mchart1");
        assert_eq!(ids.next_id("dchart"), "dchart2");
        assert_eq!(ChartIds::new().next_id("pchart"), "pchart1");
    }
}
