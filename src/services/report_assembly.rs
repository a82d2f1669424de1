//! Pure grouping, ordering and message composition for the three jobs.
//! Nothing here touches the network or the filesystem.

use std::path::{Path, PathBuf};

use crate::models::{
    CategoryStats, CollectionStats, IndicatorSnapshot, SectorSelection, SelectionResult,
};

pub const VOLUME_SPIKE_RATIO: f64 = 200.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;
pub const TOP_SCORES: usize = 10;
pub const SUMMARY_TOP: usize = 5;

/// Files a job managed to write. Missing entries are left out of the summary.
#[derive(Debug, Clone, Default)]
pub struct SavedFiles {
    pub json: Option<PathBuf>,
    pub excel: Option<PathBuf>,
    pub markdown: Option<PathBuf>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn saved_files_section(files: &SavedFiles) -> String {
    let mut out = String::from("💾 저장:\n");
    for (label, path) in [
        ("JSON", &files.json),
        ("Excel", &files.excel),
        ("Markdown", &files.markdown),
    ] {
        if let Some(path) = path {
            out.push_str(&format!("- {}: {}\n", label, file_name(path)));
        }
    }
    out
}

// ==============================================================================
// Daily indicator report
// ==============================================================================

/// Named views over one day's snapshots. `all` keeps collection order.
#[derive(Debug, Clone, Default)]
pub struct DailyDigest {
    pub all: Vec<IndicatorSnapshot>,
    /// `change_1d > 0`, biggest gain first.
    pub up: Vec<IndicatorSnapshot>,
    /// `change_1d < 0`, biggest loss first.
    pub down: Vec<IndicatorSnapshot>,
    pub flat: Vec<IndicatorSnapshot>,
    pub golden_cross: Vec<IndicatorSnapshot>,
    pub dead_cross: Vec<IndicatorSnapshot>,
    /// `volume_ratio > 200`, largest first.
    pub volume_spike: Vec<IndicatorSnapshot>,
    pub rsi_overbought: Vec<IndicatorSnapshot>,
    pub rsi_oversold: Vec<IndicatorSnapshot>,
    /// Overbought or oversold, collection order.
    pub rsi_extreme: Vec<IndicatorSnapshot>,
}

fn filtered<F>(snapshots: &[IndicatorSnapshot], keep: F) -> Vec<IndicatorSnapshot>
where
    F: Fn(&IndicatorSnapshot) -> bool,
{
    snapshots.iter().filter(|s| keep(s)).cloned().collect()
}

impl DailyDigest {
    pub fn build(snapshots: &[IndicatorSnapshot]) -> Self {
        let mut up = filtered(snapshots, |s| s.change_1d > 0.0);
        up.sort_by(|a, b| b.change_1d.total_cmp(&a.change_1d));

        let mut down = filtered(snapshots, |s| s.change_1d < 0.0);
        down.sort_by(|a, b| a.change_1d.total_cmp(&b.change_1d));

        let mut volume_spike = filtered(snapshots, |s| s.volume_ratio > VOLUME_SPIKE_RATIO);
        volume_spike.sort_by(|a, b| b.volume_ratio.total_cmp(&a.volume_ratio));

        Self {
            all: snapshots.to_vec(),
            up,
            down,
            flat: filtered(snapshots, |s| s.change_1d == 0.0),
            golden_cross: filtered(snapshots, |s| s.golden_cross),
            dead_cross: filtered(snapshots, |s| s.dead_cross),
            volume_spike,
            rsi_overbought: filtered(snapshots, |s| s.rsi > RSI_OVERBOUGHT),
            rsi_oversold: filtered(snapshots, |s| s.rsi < RSI_OVERSOLD),
            rsi_extreme: filtered(snapshots, |s| s.rsi > RSI_OVERBOUGHT || s.rsi < RSI_OVERSOLD),
        }
    }
}

pub fn daily_summary(digest: &DailyDigest, files: &SavedFiles) -> String {
    let mut msg = String::from("📊 데이터센터 종목 분석 완료\n\n");
    msg.push_str(&format!("📈 상승: {}개\n", digest.up.len()));
    msg.push_str(&format!("📉 하락: {}개\n", digest.down.len()));
    msg.push_str(&format!("➖ 보합: {}개\n", digest.flat.len()));
    msg.push_str(&format!("📊 총 {}개 종목\n\n", digest.all.len()));

    let signals: Vec<String> = [
        ("⭐ 골든크로스", digest.golden_cross.len()),
        ("💀 데드크로스", digest.dead_cross.len()),
        ("📊 거래량급증", digest.volume_spike.len()),
        ("🔴 RSI과매수", digest.rsi_overbought.len()),
        ("🟢 RSI과매도", digest.rsi_oversold.len()),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(label, count)| format!("{}: {}개", label, count))
    .collect();

    if !signals.is_empty() {
        msg.push_str("🎯 주요 시그널:\n");
        msg.push_str(&signals.join("\n"));
        msg.push_str("\n\n");
    }

    msg.push_str(&saved_files_section(files));
    msg
}

// ==============================================================================
// Monthly stock selection
// ==============================================================================

#[derive(Debug, Clone, Default)]
pub struct SelectionDigest {
    /// One entry per pool that produced a winner, pool order.
    pub selected: Vec<SelectionResult>,
    /// Every scored candidate, pool order, best first within a pool.
    pub all_candidates: Vec<SelectionResult>,
    pub category_stats: Vec<CategoryStats>,
    /// Best `TOP_SCORES` selected stocks; ties keep pool order.
    pub top: Vec<SelectionResult>,
    /// Selected stocks per category, most first; ties keep first appearance.
    pub category_counts: Vec<(String, usize)>,
}

/// Categories in order of first appearance.
fn categories_in_order(results: &[SelectionResult]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for r in results {
        if !categories.contains(&r.category) {
            categories.push(r.category.clone());
        }
    }
    categories
}

pub fn category_stats(selected: &[SelectionResult]) -> Vec<CategoryStats> {
    categories_in_order(selected)
        .into_iter()
        .map(|category| {
            let members: Vec<&SelectionResult> =
                selected.iter().filter(|r| r.category == category).collect();
            let count = members.len();
            let avg_score = members.iter().map(|r| r.score).sum::<f64>() / count as f64;
            let avg_return_3m = members.iter().map(|r| r.return_3m).sum::<f64>() / count as f64;
            CategoryStats {
                category,
                avg_score,
                avg_return_3m,
                count,
            }
        })
        .collect()
}

pub fn top_by_score(results: &[SelectionResult], limit: usize) -> Vec<SelectionResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted.truncate(limit);
    sorted
}

impl SelectionDigest {
    pub fn build(sectors: &[SectorSelection]) -> Self {
        let selected: Vec<SelectionResult> =
            sectors.iter().filter_map(|s| s.selected.clone()).collect();
        let all_candidates: Vec<SelectionResult> =
            sectors.iter().flat_map(|s| s.ranked.iter().cloned()).collect();

        let stats = category_stats(&selected);
        let mut category_counts: Vec<(String, usize)> = stats
            .iter()
            .map(|s| (s.category.clone(), s.count))
            .collect();
        category_counts.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            top: top_by_score(&selected, TOP_SCORES),
            category_stats: stats,
            category_counts,
            selected,
            all_candidates,
        }
    }
}

pub fn selection_summary(digest: &SelectionDigest, files: &SavedFiles) -> String {
    let mut msg = String::from("🔍 데이터센터 종목 선정 완료\n\n");
    msg.push_str(&format!("📊 총 {}개 종목 선정\n\n", digest.selected.len()));

    msg.push_str("📁 대분류별:\n");
    for (category, count) in &digest.category_counts {
        msg.push_str(&format!("  • {}: {}개\n", category, count));
    }

    msg.push_str(&format!("\n🏆 점수 상위 {}개:\n", SUMMARY_TOP));
    for (idx, r) in digest.top.iter().take(SUMMARY_TOP).enumerate() {
        msg.push_str(&format!("{}. {} ({:.1}점)\n", idx + 1, r.name, r.score));
    }

    msg.push('\n');
    msg.push_str(&saved_files_section(files));
    msg
}

// ==============================================================================
// News monitor
// ==============================================================================

pub fn news_summary(article_count: usize, stats: &CollectionStats, files: &SavedFiles) -> String {
    let mut msg = String::from("📰 데이터센터 뉴스 수집 완료\n\n");
    msg.push_str(&format!("📊 수집: {}개 기사\n", article_count));
    msg.push_str(&format!("Google: {} | Naver: {}\n\n", stats.google, stats.naver));
    msg.push_str(&saved_files_section(files));
    msg
}
