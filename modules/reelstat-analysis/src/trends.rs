//! Monthly time series per performer.

use std::collections::{BTreeMap, BTreeSet};

use reelstat_common::{Member, MetricKey, VideoRecord};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TrendPoint {
    /// `YYYY-MM`.
    pub month: String,
    pub count: usize,
    pub total: u128,
    pub avg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct TrendSeries {
    /// Every month present in the data, ascending.
    pub months: Vec<String>,
    /// One point per entry of `months`, per performer with any activity.
    pub trends: BTreeMap<Member, Vec<TrendPoint>>,
}

impl TrendSeries {
    /// The month with the largest total (earliest on ties).
    pub fn peak(&self, member: Member) -> Option<&TrendPoint> {
        self.trends.get(&member)?.iter().fold(None, |best, point| match best {
            Some(b) if b.total >= point.total => Some(b),
            _ => Some(point),
        })
    }

    pub fn range(&self) -> Option<(&str, &str)> {
        Some((self.months.first()?.as_str(), self.months.last()?.as_str()))
    }
}

/// Bucket records by month. Records without a month, or without a value
/// for `metric`, are skipped entirely. Series are aligned to the global
/// month list with zero-filled gaps.
pub fn compute_trends(records: &[VideoRecord], metric: MetricKey) -> TrendSeries {
    let mut buckets: BTreeMap<(Member, &str), (usize, u128)> = BTreeMap::new();
    let mut months: BTreeSet<&str> = BTreeSet::new();

    for record in records {
        let (Some(month), Some(value)) = (record.month.as_deref(), record.value(metric)) else {
            continue;
        };
        months.insert(month);
        for member in record.members.iter() {
            let slot = buckets.entry((member, month)).or_default();
            slot.0 += 1;
            slot.1 += u128::from(value);
        }
    }

    let members: BTreeSet<Member> = buckets.keys().map(|(member, _)| *member).collect();
    let trends = members
        .into_iter()
        .map(|member| {
            let series = months
                .iter()
                .map(|&month| {
                    let (count, total) = buckets.get(&(member, month)).copied().unwrap_or_default();
                    TrendPoint {
                        month: month.to_string(),
                        count,
                        total,
                        avg: if count == 0 { 0.0 } else { total as f64 / count as f64 },
                    }
                })
                .collect();
            (member, series)
        })
        .collect();

    TrendSeries {
        months: months.into_iter().map(str::to_string).collect(),
        trends,
    }
}
