//! Count-string parsers.
//!
//! Exports write engagement counts as human-formatted strings ("1.2M views",
//! "850K", "3.4万"). Both parsers are total: anything malformed resolves to 0,
//! never an error. That fallback is for *malformed* values only; a field that
//! is absent altogether stays unknown (see [`resolve_views`] / [`resolve_count`]).

use std::sync::LazyLock;

use export_reader::NumericField;
use regex::Regex;

/// `<decimal> [K|M|B] [unit word]`, commas already removed.
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]*)(?:\.([0-9]*))?\s*([kmb])?(?:\s+\p{L}+)?$").unwrap()
});

/// Plain decimal with no suffix.
static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]*)(?:\.([0-9]*))?$").unwrap());

const TEN_THOUSAND: u64 = 10_000;

/// Parse a display count such as `"1.2M views"`, `"850K"` or `"12,345"`.
///
/// Thousands separators and a trailing unit word are stripped; K/M/B
/// multipliers are case-insensitive; fractional mantissas are allowed.
/// Returns 0 for empty or unparseable input.
pub fn parse_count(text: &str) -> u64 {
    let clean = text.replace(',', "");
    let Some(caps) = COUNT_RE.captures(clean.trim()) else {
        return 0;
    };
    let int_part = caps.get(1).map_or("", |m| m.as_str());
    let frac_part = caps.get(2).map_or("", |m| m.as_str());
    let multiplier = match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()).as_deref() {
        Some("b") => 1_000_000_000,
        Some("m") => 1_000_000,
        Some("k") => 1_000,
        _ => 1,
    };
    scale_decimal(int_part, frac_part, multiplier).unwrap_or(0)
}

/// Parse a count that may be a native number or a localized string
/// (`"3.4万"`, `"1.5K"`, `"2M"`, `"1,024"`). Returns 0 on failure.
pub fn parse_localized_count(value: &NumericField) -> u64 {
    match value {
        NumericField::Number(n) => number_to_count(n),
        NumericField::Text(s) => parse_localized_text(s),
    }
}

/// Resolve an optional view-count field. Absent stays unknown; present
/// strings go through [`parse_count`].
pub fn resolve_views(field: Option<&NumericField>) -> Option<u64> {
    field.map(|value| match value {
        NumericField::Number(n) => number_to_count(n),
        NumericField::Text(s) => parse_count(s),
    })
}

/// Resolve an optional engagement field. Absent stays unknown; present
/// values go through [`parse_localized_count`].
pub fn resolve_count(field: Option<&NumericField>) -> Option<u64> {
    field.map(parse_localized_count)
}

fn parse_localized_text(text: &str) -> u64 {
    let clean = text.replace(',', "");
    let clean = clean.trim();

    let (digits, multiplier) = if clean.contains('万') {
        (clean.replace('万', ""), TEN_THOUSAND)
    } else if clean.contains(['k', 'K']) {
        (clean.replace(['k', 'K'], ""), 1_000)
    } else if clean.contains(['m', 'M']) {
        (clean.replace(['m', 'M'], ""), 1_000_000)
    } else {
        (clean.to_string(), 1)
    };

    let Some(caps) = DECIMAL_RE.captures(digits.trim()) else {
        return 0;
    };
    let int_part = caps.get(1).map_or("", |m| m.as_str());
    let frac_part = caps.get(2).map_or("", |m| m.as_str());
    scale_decimal(int_part, frac_part, multiplier).unwrap_or(0)
}

/// Native JSON numbers: negatives and non-finite values clamp to 0,
/// fractions truncate.
fn number_to_count(n: &serde_json::Number) -> u64 {
    if let Some(v) = n.as_u64() {
        return v;
    }
    if n.as_i64().is_some() {
        return 0;
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// `int_part.frac_part × multiplier`, truncated toward zero, computed in
/// integer arithmetic so `"1.2M"` is exactly 1_200_000. `None` when there
/// are no digits at all or the result overflows.
fn scale_decimal(int_part: &str, frac_part: &str, multiplier: u64) -> Option<u64> {
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let multiplier = u128::from(multiplier);

    let int: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    let mut value = int.checked_mul(multiplier)?;

    // Digits beyond 18 cannot change the result for any supported multiplier.
    let frac_digits = &frac_part[..frac_part.len().min(18)];
    if !frac_digits.is_empty() {
        let frac: u128 = frac_digits.parse().ok()?;
        let scale = 10u128.pow(frac_digits.len() as u32);
        value = value.checked_add(frac * multiplier / scale)?;
    }

    u64::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_suffixed_view_strings() {
        assert_eq!(parse_count("1.2M views"), 1_200_000);
        assert_eq!(parse_count("850K"), 850_000);
        assert_eq!(parse_count("2B"), 2_000_000_000);
        assert_eq!(parse_count("3.5k views"), 3_500);
    }

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_count("12,345 views"), 12_345);
        assert_eq!(parse_count("1,234,567"), 1_234_567);
    }

    #[test]
    fn malformed_counts_fall_back_to_zero() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("   "), 0);
        assert_eq!(parse_count("No views"), 0);
        assert_eq!(parse_count("1.2.3M"), 0);
        assert_eq!(parse_count("-5K"), 0);
        assert_eq!(parse_count("99999999999999999999999B"), 0);
    }

    #[test]
    fn fractional_counts_truncate() {
        assert_eq!(parse_count("1.2345K"), 1_234);
        assert_eq!(parse_count(".5M"), 500_000);
        assert_eq!(parse_count("7."), 7);
    }

    #[test]
    fn decimal_arithmetic_is_exact() {
        // 0.29 * 1000 in binary floating point lands just under 290
        assert_eq!(parse_count("0.29K"), 290);
        assert_eq!(parse_localized_count(&NumericField::text("0.29K")), 290);
    }

    #[test]
    fn localized_wan_unit() {
        assert_eq!(parse_localized_count(&NumericField::text("3.4万")), 34_000);
        assert_eq!(parse_localized_count(&NumericField::text("12万")), 120_000);
    }

    #[test]
    fn localized_latin_suffixes_and_plain_numbers() {
        assert_eq!(parse_localized_count(&NumericField::text("1.5K")), 1_500);
        assert_eq!(parse_localized_count(&NumericField::text("2m")), 2_000_000);
        assert_eq!(parse_localized_count(&NumericField::text("1,024")), 1_024);
        assert_eq!(parse_localized_count(&NumericField::text("88.0")), 88);
        assert_eq!(parse_localized_count(&NumericField::text("赞")), 0);
        assert_eq!(parse_localized_count(&NumericField::text("")), 0);
    }

    #[test]
    fn native_numbers_pass_through() {
        assert_eq!(parse_localized_count(&NumericField::number(4_321)), 4_321);
        let float: NumericField = serde_json::from_str("12.9").unwrap();
        assert_eq!(parse_localized_count(&float), 12);
        let negative: NumericField = serde_json::from_str("-3").unwrap();
        assert_eq!(parse_localized_count(&negative), 0);
    }

    #[test]
    fn absent_field_stays_unknown() {
        assert_eq!(resolve_count(None), None);
        assert_eq!(resolve_views(None), None);
        assert_eq!(resolve_views(Some(&NumericField::text("garbage"))), Some(0));
        assert_eq!(resolve_views(Some(&NumericField::text("5M"))), Some(5_000_000));
    }
}
