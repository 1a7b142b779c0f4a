//! Normalization of raw export entries into `VideoRecord`s, and the
//! two-source Douyin merge.

use std::collections::HashMap;

use export_reader::{DouyinApiEntry, DouyinScrapedEntry, NumericField, RawId, ShortVideoEntry};
use reelstat_common::{Members, MetricKey, Metrics, Platform, ReelstatError, Result, VideoRecord};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::counts::{resolve_count, resolve_views};
use crate::tagger::{detect_members, members_from_tags};
use crate::timestamps::{douyin_create_date, tiktok_id_date};

/// Bookkeeping for one Douyin merge, logged and exported with the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MergeReport {
    /// Rows in the API-batch export.
    pub api_rows: usize,
    /// API rows whose id appeared earlier in the same export (later row wins).
    pub api_duplicates: usize,
    /// Rows in the scraped export.
    pub scraped_rows: usize,
    /// Scraped rows contributing an id the API export lacked.
    pub scraped_added: usize,
    /// Scraped rows ignored because the API export already had the id.
    pub scraped_shadowed: usize,
    /// Scraped rows ignored for lacking a usable id.
    pub scraped_skipped: usize,
    /// Records after merging.
    pub merged: usize,
}

#[derive(Debug)]
pub struct DouyinMerge {
    pub records: Vec<VideoRecord>,
    pub report: MergeReport,
}

/// Normalize pre-tagged TikTok or YouTube entries.
///
/// A missing id aborts the whole source: ids are the dedup key and silently
/// dropping rows would hide a broken export.
pub fn normalize_short_videos(platform: Platform, entries: &[ShortVideoEntry]) -> Result<Vec<VideoRecord>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let id = require_id(entry.id.as_ref(), platform, index)?;
            let members = members_from_tags(entry.members.as_deref(), &id);

            let mut metrics = Metrics::default();
            metrics.set(MetricKey::Views, resolve_views(entry.views.as_ref()));
            metrics.set(MetricKey::Likes, resolve_count(entry.likes.as_ref()));
            metrics.set(MetricKey::Comments, resolve_count(entry.comments.as_ref()));
            metrics.set(MetricKey::Shares, resolve_count(entry.shares.as_ref()));

            let date = match platform {
                Platform::TikTok => tiktok_id_date(&id),
                _ => None,
            };

            let mut record = VideoRecord::new(platform, id, entry.title.clone().unwrap_or_default(), members)
                .with_url(entry.url.clone().unwrap_or_default())
                .with_date(date);
            record.metrics = metrics;
            record.views_display = entry.views.as_ref().map(display_value);
            Ok(record)
        })
        .collect()
}

/// Merge the Douyin API-batch export with the browser-scraped one.
///
/// The API export is authoritative: a scraped row only contributes an id the
/// API export does not contain, and never overrides it. Titles are tagged
/// after merging, and the result is ordered by likes descending (stable, so
/// ties keep encounter order; unknown likes sort last).
pub fn merge_douyin(api: &[DouyinApiEntry], scraped: &[DouyinScrapedEntry]) -> Result<DouyinMerge> {
    let mut report = MergeReport {
        api_rows: api.len(),
        scraped_rows: scraped.len(),
        ..Default::default()
    };
    let mut records: Vec<VideoRecord> = Vec::with_capacity(api.len() + scraped.len());
    let mut index_by_id: HashMap<String, usize> = HashMap::new();

    for (index, entry) in api.iter().enumerate() {
        let id = require_id(entry.id.as_ref(), Platform::Douyin, index)?;
        let record = douyin_api_record(id, entry);
        match index_by_id.get(&record.id) {
            Some(&slot) => {
                report.api_duplicates += 1;
                records[slot] = record;
            }
            None => {
                index_by_id.insert(record.id.clone(), records.len());
                records.push(record);
            }
        }
    }

    for (index, entry) in scraped.iter().enumerate() {
        let Some(id) = entry.video_id.as_ref().and_then(RawId::as_key) else {
            warn!(index, "Skipping scraped douyin row without video_id");
            report.scraped_skipped += 1;
            continue;
        };
        if index_by_id.contains_key(&id) {
            debug!(video_id = id.as_str(), "Scraped douyin row shadowed by api export");
            report.scraped_shadowed += 1;
            continue;
        }
        let record = douyin_scraped_record(id, entry);
        index_by_id.insert(record.id.clone(), records.len());
        records.push(record);
        report.scraped_added += 1;
    }

    for record in &mut records {
        record.members = detect_members(&record.title);
    }

    records.sort_by(|a, b| b.value(MetricKey::Likes).cmp(&a.value(MetricKey::Likes)));
    report.merged = records.len();

    info!(
        api_rows = report.api_rows,
        scraped_added = report.scraped_added,
        scraped_shadowed = report.scraped_shadowed,
        merged = report.merged,
        "Merged douyin sources"
    );
    Ok(DouyinMerge { records, report })
}

pub fn douyin_url(id: &str) -> String {
    format!("https://www.douyin.com/video/{id}")
}

fn douyin_api_record(id: String, entry: &DouyinApiEntry) -> VideoRecord {
    let url = douyin_url(&id);
    let mut record = VideoRecord::new(Platform::Douyin, id, entry.desc.clone().unwrap_or_default(), Members::unknown())
        .with_url(url)
        .with_date(douyin_create_date(entry.create_time.as_ref()));
    record.metrics = Metrics {
        views: None,
        likes: resolve_count(entry.likes.as_ref()),
        comments: resolve_count(entry.comments.as_ref()),
        favorites: resolve_count(entry.favorites.as_ref()),
        shares: resolve_count(entry.shares.as_ref()),
        plays: resolve_count(entry.plays.as_ref()),
    };
    record
}

fn douyin_scraped_record(id: String, entry: &DouyinScrapedEntry) -> VideoRecord {
    let url = entry
        .url
        .clone()
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| douyin_url(&id));
    let mut record = VideoRecord::new(Platform::Douyin, id, entry.title.clone().unwrap_or_default(), Members::unknown())
        .with_url(url);
    record.metrics = Metrics {
        views: None,
        likes: resolve_count(entry.likes.as_ref()),
        comments: resolve_count(entry.comments.as_ref()),
        favorites: resolve_count(entry.favorites.as_ref()),
        shares: resolve_count(entry.shares.as_ref()),
        plays: None,
    };
    record
}

fn require_id(id: Option<&RawId>, platform: Platform, index: usize) -> Result<String> {
    id.and_then(RawId::as_key).ok_or_else(|| {
        warn!(%platform, index, "Export entry without id, rejecting source");
        ReelstatError::MissingId { platform, index }
    })
}

fn display_value(field: &NumericField) -> String {
    match field {
        NumericField::Number(n) => n.to_string(),
        NumericField::Text(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelstat_common::Member;

    fn api(id: u64, desc: &str, likes: &str) -> DouyinApiEntry {
        DouyinApiEntry {
            id: Some(RawId::Number(id.into())),
            desc: Some(desc.to_string()),
            likes: Some(NumericField::text(likes)),
            ..Default::default()
        }
    }

    fn scraped(id: &str, title: &str, likes: u64) -> DouyinScrapedEntry {
        DouyinScrapedEntry {
            video_id: Some(RawId::Text(id.to_string())),
            title: Some(title.to_string()),
            likes: Some(NumericField::number(likes)),
            ..Default::default()
        }
    }

    #[test]
    fn api_source_wins_over_scraped_for_same_id() {
        let merged = merge_douyin(
            &[api(7, "张元英 直拍", "1万")],
            &[scraped("7", "completely different title", 999_999)],
        )
        .unwrap();
        assert_eq!(merged.records.len(), 1);
        assert_eq!(merged.records[0].title, "张元英 直拍");
        assert_eq!(merged.records[0].value(MetricKey::Likes), Some(10_000));
        assert_eq!(merged.report.scraped_shadowed, 1);
    }

    #[test]
    fn scraped_fills_gaps_only() {
        let merged = merge_douyin(&[api(1, "a", "5")], &[scraped("2", "b", 50)]).unwrap();
        let ids: Vec<&str> = merged.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(merged.report.scraped_added, 1);
        // the scraped export has no play counts at all
        assert_eq!(merged.records[0].value(MetricKey::Plays), None);
    }

    #[test]
    fn sorted_by_likes_descending_with_stable_ties() {
        let merged = merge_douyin(
            &[api(1, "first", "100"), api(2, "second", "300"), api(3, "third", "100")],
            &[],
        )
        .unwrap();
        let ids: Vec<&str> = merged.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn titles_are_tagged_after_merge() {
        let merged = merge_douyin(&[api(1, "安宥真 and 李瑞", "1")], &[scraped("2", "", 1)]).unwrap();
        let by_id: HashMap<&str, &VideoRecord> = merged.records.iter().map(|r| (r.id.as_str(), r)).collect();
        assert_eq!(by_id["1"].members.as_slice(), &[Member::Yujin, Member::Leeseo]);
        assert_eq!(by_id["2"].members.as_slice(), &[Member::GroupUnknown]);
    }

    #[test]
    fn api_row_without_id_is_fatal() {
        let mut entry = api(1, "x", "1");
        entry.id = None;
        let err = merge_douyin(&[entry], &[]).unwrap_err();
        assert!(matches!(err, ReelstatError::MissingId { platform: Platform::Douyin, index: 0 }));
    }

    #[test]
    fn scraped_row_without_id_is_skipped() {
        let mut entry = scraped("", "x", 1);
        entry.video_id = Some(RawId::Text(String::new()));
        let merged = merge_douyin(&[], &[entry, scraped("9", "y", 2)]).unwrap();
        assert_eq!(merged.records.len(), 1);
        assert_eq!(merged.report.scraped_skipped, 1);
    }

    #[test]
    fn duplicate_api_ids_keep_one_record() {
        let merged = merge_douyin(&[api(5, "old", "1"), api(5, "new", "2")], &[]).unwrap();
        assert_eq!(merged.records.len(), 1);
        assert_eq!(merged.records[0].title, "new");
        assert_eq!(merged.report.api_duplicates, 1);
    }

    #[test]
    fn short_video_entries_keep_display_views_and_unknowns() {
        let entry = ShortVideoEntry {
            id: Some(RawId::Text("1".to_string())),
            title: Some("Liz".to_string()),
            members: Some(vec!["LIZ".to_string()]),
            views: Some(NumericField::text("1.2M views")),
            ..Default::default()
        };
        let records = normalize_short_videos(Platform::YouTube, &[entry]).unwrap();
        let record = &records[0];
        assert_eq!(record.value(MetricKey::Views), Some(1_200_000));
        assert_eq!(record.value(MetricKey::Likes), None);
        assert_eq!(record.views_display.as_deref(), Some("1.2M views"));
        assert_eq!(record.date, None);
        assert_eq!(record.members.as_slice(), &[Member::Liz]);
    }

    #[test]
    fn short_video_without_id_is_fatal() {
        let entries = vec![
            ShortVideoEntry {
                id: Some(RawId::Text("1".to_string())),
                ..Default::default()
            },
            ShortVideoEntry::default(),
        ];
        let err = normalize_short_videos(Platform::TikTok, &entries).unwrap_err();
        assert!(matches!(err, ReelstatError::MissingId { platform: Platform::TikTok, index: 1 }));
    }
}
