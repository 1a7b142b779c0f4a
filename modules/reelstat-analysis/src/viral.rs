//! Viral hit-rates and top-N video rankings.

use std::collections::BTreeMap;

use reelstat_common::{Member, Members, MetricKey, VideoRecord};
use schemars::JsonSchema;
use serde::Serialize;

pub const MEMBER_TOP_N: usize = 10;
pub const OVERALL_TOP_N: usize = 20;
pub const TITLE_MAX_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct HitRate {
    pub threshold: u64,
    /// Videos with value >= threshold.
    pub count: usize,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TopVideo {
    pub id: String,
    /// Truncated to 80 characters.
    pub title: String,
    pub value: u64,
    pub members: Members,
    pub url: String,
}

impl TopVideo {
    fn from_record(record: &VideoRecord, value: u64) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.chars().take(TITLE_MAX_CHARS).collect(),
            value,
            members: record.members.clone(),
            url: record.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ViralResult {
    pub metric: MetricKey,
    /// In the order the caller supplied them.
    pub thresholds: Vec<u64>,
    pub hit_rates: BTreeMap<Member, Vec<HitRate>>,
    pub top_videos: BTreeMap<Member, Vec<TopVideo>>,
    pub overall_top20: Vec<TopVideo>,
}

impl ViralResult {
    /// Rate at the first threshold, the headline "viral rate".
    pub fn first_rate(&self, member: Member) -> f64 {
        self.hit_rates
            .get(&member)
            .and_then(|rates| rates.first())
            .map_or(0.0, |r| r.rate)
    }
}

/// Hit-rates for each threshold and top videos per performer, plus the
/// platform-wide top 20. All rankings are stable sorts by value descending,
/// so ties keep encounter order. Records with an unknown value for `metric`
/// are left out of every ranking.
pub fn compute_viral(records: &[VideoRecord], metric: MetricKey, thresholds: &[u64]) -> ViralResult {
    let mut by_member: BTreeMap<Member, Vec<(&VideoRecord, u64)>> = BTreeMap::new();
    let mut known: Vec<(&VideoRecord, u64)> = Vec::with_capacity(records.len());

    for record in records {
        let Some(value) = record.value(metric) else {
            continue;
        };
        known.push((record, value));
        for member in record.members.iter() {
            by_member.entry(member).or_default().push((record, value));
        }
    }

    let mut hit_rates = BTreeMap::new();
    let mut top_videos = BTreeMap::new();

    for (member, mut entries) in by_member {
        let total = entries.len();
        let rates = thresholds
            .iter()
            .map(|&threshold| {
                let count = entries.iter().filter(|(_, v)| *v >= threshold).count();
                HitRate {
                    threshold,
                    count,
                    rate: count as f64 / total as f64,
                }
            })
            .collect();
        hit_rates.insert(member, rates);

        entries.sort_by(|a, b| b.1.cmp(&a.1));
        let top = entries
            .iter()
            .take(MEMBER_TOP_N)
            .map(|(record, value)| TopVideo::from_record(record, *value))
            .collect();
        top_videos.insert(member, top);
    }

    known.sort_by(|a, b| b.1.cmp(&a.1));
    let overall_top20 = known
        .iter()
        .take(OVERALL_TOP_N)
        .map(|(record, value)| TopVideo::from_record(record, *value))
        .collect();

    ViralResult {
        metric,
        thresholds: thresholds.to_vec(),
        hit_rates,
        top_videos,
        overall_top20,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelstat_common::Platform;

    fn record(id: &str, members: &[Member], views: Option<u64>) -> VideoRecord {
        let mut r = VideoRecord::new(Platform::YouTube, id, format!("video {id}"), Members::from_tags(members.iter().copied()));
        r.metrics.views = views;
        r
    }

    #[test]
    fn thresholds_keep_caller_order() {
        let records = vec![record("1", &[Member::Rei], Some(15))];
        let viral = compute_viral(&records, MetricKey::Views, &[20, 10]);
        assert_eq!(viral.thresholds, vec![20, 10]);
        let rates = &viral.hit_rates[&Member::Rei];
        assert_eq!((rates[0].threshold, rates[0].count), (20, 0));
        assert_eq!((rates[1].threshold, rates[1].count), (10, 1));
    }

    #[test]
    fn threshold_is_inclusive() {
        let records = vec![record("1", &[Member::Liz], Some(10)), record("2", &[Member::Liz], Some(9))];
        let viral = compute_viral(&records, MetricKey::Views, &[10]);
        assert_eq!(viral.hit_rates[&Member::Liz][0].count, 1);
        assert_eq!(viral.hit_rates[&Member::Liz][0].rate, 0.5);
    }

    #[test]
    fn member_top_ten_is_stable_on_ties() {
        let records: Vec<VideoRecord> = (0..12)
            .map(|i| record(&i.to_string(), &[Member::Yujin], Some(if i == 11 { 50 } else { 7 })))
            .collect();
        let viral = compute_viral(&records, MetricKey::Views, &[]);
        let ids: Vec<&str> = viral.top_videos[&Member::Yujin].iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["11", "0", "1", "2", "3", "4", "5", "6", "7", "8"]);
    }

    #[test]
    fn overall_top_twenty_spans_performers_and_skips_unknown() {
        let mut records: Vec<VideoRecord> = (0..25)
            .map(|i| record(&i.to_string(), &[Member::Gaeul], Some(i)))
            .collect();
        records.push(record("x", &[Member::Rei], None));
        let viral = compute_viral(&records, MetricKey::Views, &[1]);
        assert_eq!(viral.overall_top20.len(), 20);
        assert_eq!(viral.overall_top20[0].id, "24");
        assert!(viral.overall_top20.iter().all(|v| v.id != "x"));
        assert!(!viral.hit_rates.contains_key(&Member::Rei));
    }

    #[test]
    fn long_titles_are_truncated_by_characters() {
        let mut r = record("1", &[Member::Wonyoung], Some(1));
        r.title = "장".repeat(100);
        let viral = compute_viral(&[r], MetricKey::Views, &[]);
        assert_eq!(viral.overall_top20[0].title.chars().count(), 80);
    }

    #[test]
    fn first_rate_defaults_to_zero() {
        let viral = compute_viral(&[], MetricKey::Views, &[5]);
        assert_eq!(viral.first_rate(Member::Leeseo), 0.0);
    }
}
