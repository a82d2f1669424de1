use std::fmt::Write;

use crate::models::{CollectionStats, CompanyNews, IndicatorSnapshot};
use crate::services::report_assembly::{DailyDigest, SelectionDigest};

const BILLION: f64 = 1e9;
/// Daily gainers above this get the rocket marker.
const BIG_MOVE_PCT: f64 = 5.0;

fn check(flag: bool) -> &'static str {
    if flag {
        "✅"
    } else {
        "❌"
    }
}

fn section(out: &mut String, title: &str, items: &[IndicatorSnapshot], line: impl Fn(&IndicatorSnapshot) -> String) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {} ({})\n", title, items.len());
    for s in items {
        let _ = writeln!(out, "{}", line(s));
    }
    out.push('\n');
}

pub fn daily_report(digest: &DailyDigest, timestamp: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# 📊 Data Center Stocks Daily Report\n");
    let _ = writeln!(out, "**Generated:** {}\n", timestamp);
    out.push_str("---\n\n");

    section(&mut out, "🔥 Gainers", &digest.up, |s| {
        let marker = if s.change_1d > BIG_MOVE_PCT { "🚀" } else { "📈" };
        format!("- {} **{}**: {:+.2}% ({:.2})", marker, s.name, s.change_1d, s.price)
    });
    section(&mut out, "📉 Decliners", &digest.down, |s| {
        format!("- 📉 **{}**: {:+.2}% ({:.2})", s.name, s.change_1d, s.price)
    });
    section(&mut out, "⭐ Golden Cross", &digest.golden_cross, |s| {
        format!("- **{}**: MA20 ({:.2}) > MA60 ({:.2})", s.name, s.ma_20, s.ma_60)
    });
    section(&mut out, "💀 Dead Cross", &digest.dead_cross, |s| format!("- **{}**", s.name));
    section(&mut out, "📊 Volume Spike", &digest.volume_spike, |s| {
        format!("- **{}**: {:.0}% of 20-day average", s.name, s.volume_ratio)
    });
    section(&mut out, "🔴 RSI Overbought", &digest.rsi_overbought, |s| {
        format!("- **{}**: RSI {:.1}", s.name, s.rsi)
    });
    section(&mut out, "🟢 RSI Oversold", &digest.rsi_oversold, |s| {
        format!("- **{}**: RSI {:.1}", s.name, s.rsi)
    });

    out.push_str("---\n\n## 📊 Summary\n\n");
    let _ = writeln!(out, "- 📈 Up: {}", digest.up.len());
    let _ = writeln!(out, "- 📉 Down: {}", digest.down.len());
    let _ = writeln!(out, "- ➖ Flat: {}", digest.flat.len());
    let _ = writeln!(out, "- 📊 Total: {} stocks", digest.all.len());
    out
}

/// Companies are listed alphabetically.
pub fn news_report(companies: &[CompanyNews], stats: &CollectionStats, timestamp: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# 📰 Datacenter News Report\n");
    let _ = writeln!(out, "**Generated:** {}\n", timestamp);
    out.push_str("## 📊 Statistics\n\n");
    let _ = writeln!(out, "- Google News: {}", stats.google);
    let _ = writeln!(out, "- Naver News: {}", stats.naver);
    let _ = writeln!(out, "- **Total:** {}\n", stats.total());
    out.push_str("---\n\n");

    let mut sorted: Vec<&CompanyNews> = companies.iter().filter(|c| !c.items.is_empty()).collect();
    sorted.sort_by(|a, b| a.company.cmp(&b.company));

    for company in sorted {
        let _ = writeln!(out, "## {} {}\n", company.country.flag(), company.company);

        for item in &company.items {
            let marker = if item.is_high_relevance() { "🔥" } else { "📈" };
            let _ = writeln!(out, "### {} {}\n", marker, item.display_title());

            let description = item.display_description();
            if !description.is_empty() {
                let _ = writeln!(out, "{}\n", description);
            }

            let _ = writeln!(out, "- **Publisher:** {}", item.publisher);
            let _ = writeln!(out, "- **Source:** {}", item.source);
            let _ = writeln!(out, "- **Date:** {}", item.published_at.to_rfc3339());
            let _ = writeln!(out, "- **Link:** [{}]({})\n", item.link, item.link);
        }

        out.push_str("---\n\n");
    }

    out
}

pub fn selection_report(digest: &SelectionDigest, timestamp: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# 🔍 Data Center Stock Selection Report\n");
    let _ = writeln!(out, "**Generated:** {}\n", timestamp);
    out.push_str("---\n\n## 📊 Selection\n\n");
    let _ = writeln!(out, "**{}** stocks selected\n", digest.selected.len());

    for stats in &digest.category_stats {
        let _ = writeln!(out, "### {} ({})\n", stats.category, stats.count);
        for r in digest.selected.iter().filter(|r| r.category == stats.category) {
            let _ = writeln!(out, "- **[{}] {}**", r.sub_sector, r.name);
            let _ = writeln!(out, "  - Score: {:.1}/100", r.score);
            let _ = writeln!(out, "  - Market cap: ${:.1}B", r.market_cap / BILLION);
            let _ = writeln!(out, "  - 3M return: {:+.2}%", r.return_3m);
            let _ = writeln!(out, "  - RSI: {:.1}", r.rsi);
            let _ = writeln!(out, "  - Golden cross: {}\n", check(r.golden_cross));
        }
    }

    let _ = writeln!(out, "---\n\n## 🏆 Top {} by Score\n", digest.top.len());
    for (idx, r) in digest.top.iter().enumerate() {
        let _ = writeln!(out, "{}. **{}** ({})", idx + 1, r.name, r.category);
        let _ = writeln!(out, "   - Score: {:.1}, 3M: {:+.2}%\n", r.score, r.return_3m);
    }

    // Ready to paste into a universe file as the next daily ticker list.
    out.push_str("---\n\n## 📝 Daily list (JSON)\n\n```json\n");
    let daily: Vec<serde_json::Value> = digest
        .selected
        .iter()
        .map(|r| serde_json::json!({ "name": r.name, "ticker": r.ticker, "sector": r.sector }))
        .collect();
    let _ = writeln!(
        out,
        "{}",
        serde_json::to_string_pretty(&daily).unwrap_or_else(|_| "[]".to_string())
    );
    out.push_str("```\n");
    out
}
