//! Plain-text terminal summary of an `Analysis`.

use std::fmt::{self, Write};

use reelstat_analysis::{Analysis, PlatformAnalysis, StatsMap, TrendSeries, ViralResult};
use reelstat_common::{Member, Platform};

const RULE: usize = 80;

/// Human-scaled number: `1.2K`, `3.4M`, `5.0B`, or a rounded integer.
pub fn fmt_num(n: f64, decimals: usize) -> String {
    if n >= 1e9 {
        format!("{:.*}B", decimals, n / 1e9)
    } else if n >= 1e6 {
        format!("{:.*}M", decimals, n / 1e6)
    } else if n >= 1e3 {
        format!("{:.*}K", decimals, n / 1e3)
    } else {
        format!("{n:.0}")
    }
}

fn num(n: f64) -> String {
    fmt_num(n, 1)
}

pub fn render_summary(analysis: &Analysis) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_summary(&mut out, analysis)?;
    Ok(out)
}

fn write_summary(out: &mut impl Write, analysis: &Analysis) -> fmt::Result {
    writeln!(out, "\n{}", "=".repeat(RULE))?;
    writeln!(out, "  CROSS-PLATFORM MEMBER ANALYSIS")?;
    writeln!(out, "{}", "=".repeat(RULE))?;

    for p in analysis.platforms.values() {
        let metric = p.primary_metric;
        heading(out, &format!("{} - Member Rankings by {}", upper(p.platform), metric.label()))?;
        if let Some(rankings) = p.primary_rankings() {
            ranking_table(out, rankings)?;
        }
        hit_rate_table(out, &p.viral)?;
        top_five(out, p)?;
    }

    if let Some(douyin) = analysis.platform(Platform::Douyin) {
        heading(out, "DOUYIN - Rankings by Comments / Favorites / Shares")?;
        for metric in Platform::Douyin.secondary_metrics() {
            if let Some(rankings) = douyin.rankings.get(metric) {
                writeln!(out, "\n  {}:", metric.label())?;
                short_table(out, rankings)?;
            }
        }
    }

    writeln!(out, "\n{}", "=".repeat(RULE))?;
    writeln!(out, "  SINGLE-MEMBER VIDEO ANALYSIS")?;
    writeln!(out, "  (Only videos featuring exactly 1 identified member)")?;
    writeln!(out, "{}", "=".repeat(RULE))?;
    for p in analysis.platforms.values() {
        heading(
            out,
            &format!(
                "{} Solo Videos ({} total) - by {}",
                upper(p.platform),
                p.solo.solo_count,
                p.primary_metric.label()
            ),
        )?;
        if let Some(rankings) = p.solo.rankings.get(&p.primary_metric) {
            ranking_table(out, rankings)?;
        }
    }

    for p in analysis.platforms.values() {
        if let Some(trends) = &p.trends {
            trend_peaks(out, p.platform, trends)?;
        }
    }
    Ok(())
}

fn heading(out: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(out, "\n{}", "-".repeat(RULE))?;
    writeln!(out, "  {title}")?;
    writeln!(out, "{}", "-".repeat(RULE))
}

fn ranking_table(out: &mut impl Write, rankings: &StatsMap) -> fmt::Result {
    writeln!(
        out,
        "  {:<16} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Member", "Videos", "Total", "Average", "Median", "Max", "Top5 Avg"
    )?;
    for (member, s) in rankings {
        writeln!(
            out,
            "  {:<16} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10}",
            member.as_str(),
            s.count,
            num(s.total as f64),
            num(s.mean),
            num(s.median),
            num(s.max as f64),
            num(s.top5_avg)
        )?;
    }
    Ok(())
}

fn short_table(out: &mut impl Write, rankings: &StatsMap) -> fmt::Result {
    writeln!(out, "  {:<16} {:>7} {:>10} {:>10} {:>10}", "Member", "Videos", "Total", "Average", "Max")?;
    for (member, s) in rankings {
        writeln!(
            out,
            "  {:<16} {:>7} {:>10} {:>10} {:>10}",
            member.as_str(),
            s.count,
            num(s.total as f64),
            num(s.mean),
            num(s.max as f64)
        )?;
    }
    Ok(())
}

fn hit_rate_table(out: &mut impl Write, viral: &ViralResult) -> fmt::Result {
    writeln!(out, "\n  Viral Hit Rates:")?;
    write!(out, "  {:<16}", "Member")?;
    for t in &viral.thresholds {
        write!(out, " {:>12}", format!(">{}", fmt_num(*t as f64, 0)))?;
    }
    writeln!(out)?;
    for (member, rates) in &viral.hit_rates {
        write!(out, "  {:<16}", member.as_str())?;
        for r in rates {
            write!(out, " {:>4} ({:>5.1}%)", r.count, r.rate * 100.0)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn top_five(out: &mut impl Write, p: &PlatformAnalysis) -> fmt::Result {
    writeln!(out, "\n  Top 5 {} Videos:", upper(p.platform))?;
    for (i, v) in p.viral.overall_top20.iter().take(5).enumerate() {
        let title: String = v.title.chars().take(50).collect();
        writeln!(
            out,
            "  {}. {:>8} | {:<16} | {}",
            i + 1,
            num(v.value as f64),
            v.members.joined(", "),
            title
        )?;
    }
    Ok(())
}

fn trend_peaks(out: &mut impl Write, platform: Platform, trends: &TrendSeries) -> fmt::Result {
    let Some((first, last)) = trends.range() else {
        return Ok(());
    };
    heading(out, &format!("{} - Time Range: {first} to {last}", upper(platform)))?;
    for member in Member::ALL {
        let (Some(series), Some(peak)) = (trends.trends.get(&member), trends.peak(member)) else {
            continue;
        };
        if peak.total == 0 {
            continue;
        }
        let videos: usize = series.iter().map(|p| p.count).sum();
        writeln!(
            out,
            "  {:<16} {:>5} videos | Peak: {} ({} videos, {} total)",
            member.as_str(),
            videos,
            peak.month,
            peak.count,
            num(peak.total as f64)
        )?;
    }
    Ok(())
}

fn upper(platform: Platform) -> String {
    platform.as_str().to_uppercase()
}
