//! Aggregation engine: descriptive statistics per performer per metric.

use std::collections::BTreeMap;

use reelstat_common::{Member, MetricKey, VideoRecord};
use schemars::JsonSchema;
use serde::Serialize;

/// Per-performer result map. `Member` ordering makes iteration follow the
/// roster declaration order.
pub type StatsMap = BTreeMap<Member, MemberStats>;

/// Descriptive statistics over one performer's values for one metric.
///
/// Percentiles use the inverted convention: values are sorted descending
/// and `pN` is read at index `floor(n * (100 - N) / 100)`. So `p25` is the
/// value at least 75% of the performer's videos meet or exceed, and for any
/// performer `min <= p25 <= median <= p75 <= p90 <= p99 <= max`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct MemberStats {
    pub count: usize,
    /// Widened so a handful of extreme counts cannot overflow.
    pub total: u128,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; 0 for a single value.
    pub stdev: f64,
    pub min: u64,
    pub max: u64,
    pub p25: u64,
    pub p75: u64,
    pub p90: u64,
    pub p99: u64,
    /// Mean of the five largest values (all values when fewer than five).
    pub top5_avg: f64,
}

/// Group known metric values by performer. A record naming several
/// performers contributes its value to each of them; records without a
/// value for `metric` contribute nothing.
pub fn member_values(records: &[VideoRecord], metric: MetricKey) -> BTreeMap<Member, Vec<u64>> {
    let mut by_member: BTreeMap<Member, Vec<u64>> = BTreeMap::new();
    for record in records {
        let Some(value) = record.value(metric) else {
            continue;
        };
        for member in record.members.iter() {
            by_member.entry(member).or_default().push(value);
        }
    }
    by_member
}

/// Statistics for every performer with at least one known value.
/// Performers without values are absent, not zero-filled.
pub fn compute_stats(records: &[VideoRecord], metric: MetricKey) -> StatsMap {
    member_values(records, metric)
        .into_iter()
        .filter_map(|(member, values)| summarize(&values).map(|stats| (member, stats)))
        .collect()
}

/// `None` for an empty multiset.
pub fn summarize(values: &[u64]) -> Option<MemberStats> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let total: u128 = values.iter().map(|&v| u128::from(v)).sum();
    let mean = total as f64 / count as f64;

    let mut desc = values.to_vec();
    desc.sort_unstable_by(|a, b| b.cmp(a));

    let top = &desc[..count.min(5)];
    let top5_avg = top.iter().map(|&v| u128::from(v)).sum::<u128>() as f64 / top.len() as f64;

    Some(MemberStats {
        count,
        total,
        mean,
        median: median(&desc),
        stdev: sample_stdev(values, mean),
        min: desc[count - 1],
        max: desc[0],
        p25: inverted_percentile(&desc, 25),
        p75: inverted_percentile(&desc, 75),
        p90: inverted_percentile(&desc, 90),
        p99: inverted_percentile(&desc, 99),
        top5_avg,
    })
}

/// Read `desc` (sorted descending, non-empty) at `floor(n * (100 - p) / 100)`.
pub fn inverted_percentile(desc: &[u64], p: usize) -> u64 {
    let index = desc.len() * (100 - p.min(100)) / 100;
    desc[index.min(desc.len() - 1)]
}

/// Median of a sorted slice; the mean of the two middle values for even n.
fn median(sorted: &[u64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    }
}

fn sample_stdev(values: &[u64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let sum_sq: f64 = values
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}
