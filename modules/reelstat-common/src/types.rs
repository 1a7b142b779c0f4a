use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Platforms ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Platform {
    #[serde(rename = "tiktok")]
    TikTok,
    #[serde(rename = "youtube")]
    YouTube,
    #[serde(rename = "douyin")]
    Douyin,
}

impl Platform {
    /// Processing and report order.
    pub const ALL: [Platform; 3] = [Platform::TikTok, Platform::YouTube, Platform::Douyin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
            Platform::Douyin => "douyin",
        }
    }

    /// The metric a platform is ranked by: views where the export carries
    /// them, likes on Douyin.
    pub fn primary_metric(&self) -> MetricKey {
        match self {
            Platform::TikTok | Platform::YouTube => MetricKey::Views,
            Platform::Douyin => MetricKey::Likes,
        }
    }

    /// Engagement metrics ranked alongside the primary one.
    pub fn secondary_metrics(&self) -> &'static [MetricKey] {
        match self {
            Platform::TikTok | Platform::YouTube => {
                &[MetricKey::Likes, MetricKey::Comments, MetricKey::Shares]
            }
            Platform::Douyin => &[MetricKey::Comments, MetricKey::Favorites, MetricKey::Shares],
        }
    }

    /// Only TikTok ids and the Douyin API export carry a usable upload time.
    pub fn has_dates(&self) -> bool {
        !matches!(self, Platform::YouTube)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// --- Performers ---

/// Canonical performer tag. Declaration order is the report order and the
/// iteration order of every per-performer result map.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Member {
    #[serde(rename = "WONYOUNG")]
    Wonyoung,
    #[serde(rename = "YUJIN")]
    Yujin,
    #[serde(rename = "REI")]
    Rei,
    #[serde(rename = "GAEUL")]
    Gaeul,
    #[serde(rename = "LIZ")]
    Liz,
    #[serde(rename = "LEESEO")]
    Leeseo,
    /// Sentinel for ensemble content and titles naming nobody.
    #[serde(rename = "GROUP/UNKNOWN")]
    GroupUnknown,
}

impl Member {
    pub const ALL: [Member; 7] = [
        Member::Wonyoung,
        Member::Yujin,
        Member::Rei,
        Member::Gaeul,
        Member::Liz,
        Member::Leeseo,
        Member::GroupUnknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Member::Wonyoung => "WONYOUNG",
            Member::Yujin => "YUJIN",
            Member::Rei => "REI",
            Member::Gaeul => "GAEUL",
            Member::Liz => "LIZ",
            Member::Leeseo => "LEESEO",
            Member::GroupUnknown => "GROUP/UNKNOWN",
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Member::GroupUnknown)
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Member {
    type Err = String;

    /// Accepts the canonical tag in any case, with surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Member::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown member tag: {s}"))
    }
}

/// Ordered, de-duplicated, never-empty set of performer tags for one video.
/// Order is first-match order. `GROUP/UNKNOWN` only ever appears alone: an
/// empty input collapses to it, and it is dropped next to a named performer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Members(Vec<Member>);

impl Members {
    pub fn unknown() -> Self {
        Members(vec![Member::GroupUnknown])
    }

    pub fn from_tags(tags: impl IntoIterator<Item = Member>) -> Self {
        let mut found: Vec<Member> = Vec::new();
        for tag in tags {
            if tag != Member::GroupUnknown && !found.contains(&tag) {
                found.push(tag);
            }
        }
        if found.is_empty() {
            Self::unknown()
        } else {
            Members(found)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Member> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Member] {
        &self.0
    }

    pub fn contains(&self, member: Member) -> bool {
        self.0.contains(&member)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exactly one identified performer.
    pub fn is_solo(&self) -> bool {
        matches!(self.0.as_slice(), [only] if !only.is_sentinel())
    }

    /// First tag, used to colour/attribute multi-performer rows.
    pub fn lead(&self) -> Member {
        self.0.first().copied().unwrap_or(Member::GroupUnknown)
    }

    pub fn joined(&self, sep: &str) -> String {
        self.0.iter().map(Member::as_str).collect::<Vec<_>>().join(sep)
    }
}

// --- Metrics ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    Views,
    Likes,
    Comments,
    Shares,
    Favorites,
    Plays,
}

impl MetricKey {
    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::Views => "Views",
            MetricKey::Likes => "Likes",
            MetricKey::Comments => "Comments",
            MetricKey::Shares => "Shares",
            MetricKey::Favorites => "Favorites",
            MetricKey::Plays => "Plays",
        }
    }
}

impl std::fmt::Display for MetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKey::Views => write!(f, "views"),
            MetricKey::Likes => write!(f, "likes"),
            MetricKey::Comments => write!(f, "comments"),
            MetricKey::Shares => write!(f, "shares"),
            MetricKey::Favorites => write!(f, "favorites"),
            MetricKey::Plays => write!(f, "plays"),
        }
    }
}

/// Engagement counts. `None` means the source never reported the metric,
/// which is different from a reported zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Metrics {
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
    pub shares: Option<u64>,
    pub favorites: Option<u64>,
    pub plays: Option<u64>,
}

impl Metrics {
    pub fn get(&self, key: MetricKey) -> Option<u64> {
        match key {
            MetricKey::Views => self.views,
            MetricKey::Likes => self.likes,
            MetricKey::Comments => self.comments,
            MetricKey::Shares => self.shares,
            MetricKey::Favorites => self.favorites,
            MetricKey::Plays => self.plays,
        }
    }

    pub fn set(&mut self, key: MetricKey, value: Option<u64>) {
        let slot = match key {
            MetricKey::Views => &mut self.views,
            MetricKey::Likes => &mut self.likes,
            MetricKey::Comments => &mut self.comments,
            MetricKey::Shares => &mut self.shares,
            MetricKey::Favorites => &mut self.favorites,
            MetricKey::Plays => &mut self.plays,
        };
        *slot = value;
    }
}

// --- Records ---

/// One observed video on one platform, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct VideoRecord {
    pub id: String,
    pub platform: Platform,
    pub url: String,
    pub title: String,
    pub members: Members,
    pub metrics: Metrics,
    /// View count exactly as the export displayed it (TikTok / YouTube).
    pub views_display: Option<String>,
    pub date: Option<NaiveDate>,
    /// `YYYY-MM`, present exactly when `date` is.
    pub month: Option<String>,
}

impl VideoRecord {
    pub fn new(platform: Platform, id: impl Into<String>, title: impl Into<String>, members: Members) -> Self {
        Self {
            id: id.into(),
            platform,
            url: String::new(),
            title: title.into(),
            members,
            metrics: Metrics::default(),
            views_display: None,
            date: None,
            month: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_metric(mut self, key: MetricKey, value: u64) -> Self {
        self.metrics.set(key, Some(value));
        self
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.month = date.map(month_of);
        self.date = date;
        self
    }

    pub fn value(&self, key: MetricKey) -> Option<u64> {
        self.metrics.get(key)
    }
}

/// Year-month bucket key. Lexicographic order is chronological.
pub fn month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Half-open `[min, max)` value band; `max = None` is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tier {
    pub label: String,
    pub min: u64,
    pub max: Option<u64>,
}

impl Tier {
    pub fn new(label: impl Into<String>, min: u64, max: Option<u64>) -> Self {
        Self {
            label: label.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value < max)
    }
}
