use reelstat_common::VideoRecord;

/// Records tagged with exactly one identified performer.
pub fn filter_solo(records: &[VideoRecord]) -> Vec<VideoRecord> {
    records.iter().filter(|r| r.members.is_solo()).cloned().collect()
}
