//! Derived views over the aggregates: tier distribution, consistency
//! ratios and cross-metric power rankings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use reelstat_common::{Member, MetricKey, Tier, VideoRecord};
use schemars::JsonSchema;
use serde::Serialize;

use crate::stats::{MemberStats, StatsMap};
use crate::viral::ViralResult;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TierCount {
    pub label: String,
    pub count: usize,
    /// Percent of the performer's videos, 0-100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct MemberTiers {
    pub total: usize,
    pub tiers: Vec<TierCount>,
}

/// Count each performer's videos per value band. A value lands in the
/// first band containing it; values outside every band count toward the
/// total only. Unknown values are skipped.
pub fn compute_tiers(records: &[VideoRecord], metric: MetricKey, tiers: &[Tier]) -> BTreeMap<Member, MemberTiers> {
    let mut counts: BTreeMap<Member, (usize, Vec<usize>)> = BTreeMap::new();

    for record in records {
        let Some(value) = record.value(metric) else {
            continue;
        };
        let band = tiers.iter().position(|t| t.contains(value));
        for member in record.members.iter() {
            let (total, per_tier) = counts.entry(member).or_insert_with(|| (0, vec![0; tiers.len()]));
            *total += 1;
            if let Some(i) = band {
                per_tier[i] += 1;
            }
        }
    }

    counts
        .into_iter()
        .map(|(member, (total, per_tier))| {
            let tiers = tiers
                .iter()
                .zip(per_tier)
                .map(|(tier, count)| TierCount {
                    label: tier.label.clone(),
                    count,
                    percent: count as f64 / total as f64 * 100.0,
                })
                .collect();
            (member, MemberTiers { total, tiers })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Consistency {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub stdev: f64,
    /// Coefficient of variation, stdev / mean.
    pub cv: f64,
    pub median_to_mean: f64,
    pub max_to_mean: f64,
    pub p25_to_p75: f64,
}

/// Spread ratios per performer. A ratio with a zero denominator is 0.
pub fn compute_consistency(stats: &StatsMap) -> BTreeMap<Member, Consistency> {
    stats
        .iter()
        .map(|(member, s)| {
            let consistency = Consistency {
                count: s.count,
                mean: s.mean,
                median: s.median,
                stdev: s.stdev,
                cv: ratio(s.stdev, s.mean),
                median_to_mean: ratio(s.median, s.mean),
                max_to_mean: ratio(s.max as f64, s.mean),
                p25_to_p75: ratio(s.p25 as f64, s.p75 as f64),
            };
            (*member, consistency)
        })
        .collect()
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct PowerRanking {
    pub total: usize,
    pub mean: usize,
    pub median: usize,
    pub max: usize,
    pub top5_avg: usize,
    pub viral_rate: usize,
    pub avg_rank: f64,
}

/// Rank performers (1 = best) on six measures and average the ranks.
/// Ties keep roster order.
pub fn compute_power_rankings(stats: &StatsMap, viral: &ViralResult) -> BTreeMap<Member, PowerRanking> {
    let active: Vec<Member> = stats.keys().copied().collect();

    let rank_by = |score: &dyn Fn(Member, &MemberStats) -> f64| -> BTreeMap<Member, usize> {
        let mut order = active.clone();
        order.sort_by(|a, b| {
            let sa = score(*a, &stats[a]);
            let sb = score(*b, &stats[b]);
            sb.partial_cmp(&sa).unwrap_or(Ordering::Equal)
        });
        order.into_iter().enumerate().map(|(i, m)| (m, i + 1)).collect()
    };

    let total = rank_by(&|_, s| s.total as f64);
    let mean = rank_by(&|_, s| s.mean);
    let median = rank_by(&|_, s| s.median);
    let max = rank_by(&|_, s| s.max as f64);
    let top5 = rank_by(&|_, s| s.top5_avg);
    let viral_rate = rank_by(&|m, _| viral.first_rate(m));

    active
        .iter()
        .map(|m| {
            let ranks = [total[m], mean[m], median[m], max[m], top5[m], viral_rate[m]];
            let ranking = PowerRanking {
                total: ranks[0],
                mean: ranks[1],
                median: ranks[2],
                max: ranks[3],
                top5_avg: ranks[4],
                viral_rate: ranks[5],
                avg_rank: ranks.iter().sum::<usize>() as f64 / ranks.len() as f64,
            };
            (*m, ranking)
        })
        .collect()
}
