use serde::Deserialize;

// --- Shared field types ---

/// A count field that exports write either as a JSON number or as a
/// human-formatted string (`"1.2M views"`, `"3.4万"`). Resolved to an integer
/// once, at normalization time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(serde_json::Number),
    Text(String),
}

impl NumericField {
    pub fn text(value: impl Into<String>) -> Self {
        NumericField::Text(value.into())
    }

    pub fn number(value: u64) -> Self {
        NumericField::Number(value.into())
    }
}

/// Video identifier as exported: platforms disagree on whether ids are
/// strings or (very large) JSON integers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl RawId {
    /// Canonical string key used for deduplication. `None` for blank ids.
    pub fn as_key(&self) -> Option<String> {
        match self {
            RawId::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawId::Number(n) => Some(n.to_string()),
        }
    }
}

// --- Primary export (TikTok + YouTube Shorts) ---

/// Top-level shape of the combined TikTok / YouTube export.
/// A platform key that is absent deserializes as an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimaryExport {
    #[serde(default)]
    pub tiktok: Vec<ShortVideoEntry>,
    #[serde(default)]
    pub youtube: Vec<ShortVideoEntry>,
}

/// One TikTok or YouTube Shorts entry. The upstream export is already
/// tagged with performer names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShortVideoEntry {
    pub id: Option<RawId>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub members: Option<Vec<String>>,
    pub views: Option<NumericField>,
    pub likes: Option<NumericField>,
    pub comments: Option<NumericField>,
    pub shares: Option<NumericField>,
}

// --- Douyin exports ---

/// One entry of the Douyin API-batch export (the authoritative source).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DouyinApiEntry {
    pub id: Option<RawId>,
    pub desc: Option<String>,
    /// Epoch seconds.
    #[serde(rename = "createTime")]
    pub create_time: Option<NumericField>,
    pub likes: Option<NumericField>,
    pub comments: Option<NumericField>,
    pub favorites: Option<NumericField>,
    pub shares: Option<NumericField>,
    pub plays: Option<NumericField>,
}

/// One entry of the browser-scraped Douyin export. Only fills gaps left by
/// the API export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DouyinScrapedEntry {
    pub video_id: Option<RawId>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub likes: Option<NumericField>,
    pub comments: Option<NumericField>,
    pub favorites: Option<NumericField>,
    pub shares: Option<NumericField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_field_accepts_number_or_string() {
        let fields: Vec<NumericField> = serde_json::from_str(r#"[12, "3.4万", 1.5]"#).unwrap();
        assert_eq!(fields[0], NumericField::number(12));
        assert_eq!(fields[1], NumericField::text("3.4万"));
        assert!(matches!(fields[2], NumericField::Number(_)));
    }

    #[test]
    fn raw_id_keys_numbers_and_strings_alike() {
        let ids: Vec<RawId> =
            serde_json::from_str(r#"["7301234567890123456", 7301234567890123456, "  "]"#).unwrap();
        assert_eq!(ids[0].as_key().as_deref(), Some("7301234567890123456"));
        assert_eq!(ids[1].as_key().as_deref(), Some("7301234567890123456"));
        assert_eq!(ids[2].as_key(), None);
    }

    #[test]
    fn missing_platform_key_is_empty() {
        let export: PrimaryExport = serde_json::from_str(r#"{"tiktok": [{"id": "1"}]}"#).unwrap();
        assert_eq!(export.tiktok.len(), 1);
        assert!(export.youtube.is_empty());
    }

    #[test]
    fn douyin_create_time_is_renamed() {
        let entry: DouyinApiEntry =
            serde_json::from_str(r#"{"id": 1, "desc": "x", "createTime": 1700000000}"#).unwrap();
        assert_eq!(entry.create_time, Some(NumericField::number(1_700_000_000)));
        assert!(entry.plays.is_none());
    }
}
