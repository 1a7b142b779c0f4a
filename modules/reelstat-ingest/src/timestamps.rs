//! Upload-date recovery from platform-specific encodings.
//!
//! All conversions are UTC. Anything that cannot be converted, or converts to
//! an implausible instant, yields `None` (unknown date) rather than a default.

use chrono::{DateTime, NaiveDate};
use export_reader::NumericField;

/// Exclusive lower bound of the accepted TikTok timestamp window (mid-2017).
pub const TIKTOK_EPOCH_MIN: i64 = 1_500_000_000;
/// Exclusive upper bound of the accepted TikTok timestamp window (2033).
pub const TIKTOK_EPOCH_MAX: i64 = 2_000_000_000;

/// TikTok video ids carry the upload time, in epoch seconds, in their
/// upper 32 bits.
pub fn tiktok_id_date(id: &str) -> Option<NaiveDate> {
    let raw: u64 = id.trim().parse().ok()?;
    let secs = (raw >> 32) as i64;
    if secs <= TIKTOK_EPOCH_MIN || secs >= TIKTOK_EPOCH_MAX {
        return None;
    }
    epoch_date(secs)
}

/// Douyin's `createTime` field: epoch seconds, as a number or a digit string.
/// A zero timestamp means "not recorded".
pub fn douyin_create_date(field: Option<&NumericField>) -> Option<NaiveDate> {
    let secs = match field? {
        NumericField::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?,
        NumericField::Text(s) => s.trim().parse::<i64>().ok()?,
    };
    if secs == 0 {
        return None;
    }
    epoch_date(secs)
}

pub fn epoch_date(secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiktok_id_for(secs: u64) -> String {
        ((secs << 32) | 0x1234_5678).to_string()
    }

    #[test]
    fn recovers_date_from_tiktok_id_high_bits() {
        // 2024-01-15T12:00:00Z
        let id = tiktok_id_for(1_705_320_000);
        assert_eq!(tiktok_id_date(&id), NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn tiktok_window_is_exclusive() {
        assert_eq!(tiktok_id_date(&tiktok_id_for(1_500_000_000)), None);
        assert_eq!(tiktok_id_date(&tiktok_id_for(2_000_000_000)), None);
        assert!(tiktok_id_date(&tiktok_id_for(1_500_000_001)).is_some());
    }

    #[test]
    fn small_or_non_numeric_ids_have_no_date() {
        assert_eq!(tiktok_id_date("12345"), None);
        assert_eq!(tiktok_id_date("abc"), None);
        assert_eq!(tiktok_id_date(""), None);
    }

    #[test]
    fn douyin_create_time_converts_directly() {
        let field = NumericField::number(1_700_000_000);
        assert_eq!(douyin_create_date(Some(&field)), NaiveDate::from_ymd_opt(2023, 11, 14));
        let text = NumericField::text("1700000000");
        assert_eq!(douyin_create_date(Some(&text)), NaiveDate::from_ymd_opt(2023, 11, 14));
    }

    #[test]
    fn douyin_missing_or_zero_create_time_is_unknown() {
        assert_eq!(douyin_create_date(None), None);
        assert_eq!(douyin_create_date(Some(&NumericField::number(0))), None);
        assert_eq!(douyin_create_date(Some(&NumericField::text("soon"))), None);
    }

    #[test]
    fn out_of_range_epoch_is_unknown() {
        assert_eq!(epoch_date(i64::MAX), None);
    }
}
