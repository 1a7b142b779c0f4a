use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use reelstat_common::{Member, Members};
use tracing::warn;

/// Name patterns per performer: romanized, Korean, stage-name variants,
/// Chinese and Japanese. Short romanized names that are also common
/// substrings are word-boundary anchored; script-specific patterns are not.
const ROSTER: &[(Member, &[&str])] = &[
    (
        Member::Wonyoung,
        &["wonyoung", "원영", "장원영", "JANGWONYOUNG", "张元英", "ウォニョン"],
    ),
    (
        Member::Yujin,
        &["yujin", "유진", "안유진", "ANYUJIN", "安宥真", "ユジン"],
    ),
    (Member::Rei, &[r"\brei\b", "레이", "怜", "レイ"]),
    (Member::Gaeul, &["gaeul", "가을", "秋", "ガウル"]),
    (Member::Liz, &[r"\bliz\b", "리즈", "丽兹", "リズ"]),
    (Member::Leeseo, &["leeseo", "이서", "李瑞", "イソ"]),
];

/// Compiled once, in roster order.
static MEMBER_PATTERNS: LazyLock<Vec<(Member, Vec<Regex>)>> = LazyLock::new(|| {
    ROSTER
        .iter()
        .map(|(member, patterns)| {
            let compiled = patterns
                .iter()
                .map(|p| RegexBuilder::new(p).case_insensitive(true).build().unwrap())
                .collect();
            (*member, compiled)
        })
        .collect()
});

/// Tag a free-text title with every performer it names.
///
/// The result is the union of all matching performers in roster order; an
/// empty title or a title naming nobody yields `{GROUP/UNKNOWN}`.
pub fn detect_members(title: &str) -> Members {
    if title.is_empty() {
        return Members::unknown();
    }
    let found = MEMBER_PATTERNS
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|re| re.is_match(title)))
        .map(|(member, _)| *member);
    Members::from_tags(found)
}

/// Resolve a pre-tagged member list from an export. Names outside the
/// roster are dropped, as is a `GROUP/UNKNOWN` tag beside a named
/// performer; an absent or empty list becomes `{GROUP/UNKNOWN}`.
pub fn members_from_tags(tags: Option<&[String]>, video_id: &str) -> Members {
    let Some(tags) = tags else {
        return Members::unknown();
    };
    let parsed = tags.iter().filter_map(|tag| match tag.parse::<Member>() {
        Ok(member) => Some(member),
        Err(_) => {
            warn!(video_id, tag = tag.as_str(), "Dropping unknown member tag");
            None
        }
    });
    Members::from_tags(parsed)
}
