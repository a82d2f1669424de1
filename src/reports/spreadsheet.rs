use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::errors::AppError;
use crate::models::{CategoryStats, CompanyNews, IndicatorSnapshot, SelectionResult};
use crate::services::report_assembly::{DailyDigest, SelectionDigest};

const BILLION: f64 = 1e9;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

/// One worksheet: a bold header row followed by data rows.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, headers: &[&'static str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn write_workbook(path: &Path, sheets: &[Sheet]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name.as_str())?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }

        for (idx, row) in sheet.rows.iter().enumerate() {
            let row_num = idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(text) => worksheet.write_string(row_num, col, text.as_str())?,
                    Cell::Number(n) => worksheet.write_number(row_num, col, *n)?,
                    Cell::Bool(b) => worksheet.write_boolean(row_num, col, *b)?,
                };
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

// ==============================================================================
// Daily indicator report
// ==============================================================================

const SNAPSHOT_HEADERS: [&str; 15] = [
    "name", "ticker", "sector", "price", "change_1d", "change_1w", "change_1m", "vs_ma20",
    "ma_20", "ma_60", "golden_cross", "dead_cross", "volume", "volume_ratio", "rsi",
];

fn snapshot_sheet(name: &str, snapshots: &[IndicatorSnapshot]) -> Sheet {
    let mut sheet = Sheet::new(name, &SNAPSHOT_HEADERS);
    for s in snapshots {
        sheet.push(vec![
            s.name.as_str().into(),
            s.ticker.as_str().into(),
            s.sector.as_str().into(),
            s.price.into(),
            s.change_1d.into(),
            s.change_1w.into(),
            s.change_1m.into(),
            s.vs_ma20.into(),
            s.ma_20.into(),
            s.ma_60.into(),
            s.golden_cross.into(),
            s.dead_cross.into(),
            (s.volume as f64).into(),
            s.volume_ratio.into(),
            s.rsi.into(),
        ]);
    }
    sheet
}

/// All, up and down are always present; signal sheets only when non-empty.
pub fn daily_sheets(digest: &DailyDigest) -> Vec<Sheet> {
    let mut sheets = vec![
        snapshot_sheet("All_Stocks", &digest.all),
        snapshot_sheet("Up_Stocks", &digest.up),
        snapshot_sheet("Down_Stocks", &digest.down),
    ];

    for (name, view) in [
        ("Golden_Cross", &digest.golden_cross),
        ("Volume_Spike", &digest.volume_spike),
        ("RSI_Extreme", &digest.rsi_extreme),
    ] {
        if !view.is_empty() {
            sheets.push(snapshot_sheet(name, view));
        }
    }

    sheets
}

// ==============================================================================
// News monitor
// ==============================================================================

/// `None` when there is nothing to write.
pub fn news_sheet(companies: &[CompanyNews]) -> Option<Sheet> {
    let mut sheet = Sheet::new(
        "News",
        &["Company", "Country", "Title", "Description", "Score", "Publisher", "Source", "Date", "Link"],
    );

    for company in companies {
        for item in &company.items {
            sheet.push(vec![
                company.company.as_str().into(),
                item.country.to_string().into(),
                item.display_title().into(),
                item.display_description().into(),
                (item.score as f64).into(),
                item.publisher.as_str().into(),
                item.source.to_string().into(),
                item.published_at.to_rfc3339().into(),
                item.link.as_str().into(),
            ]);
        }
    }

    if sheet.rows.is_empty() {
        None
    } else {
        Some(sheet)
    }
}

// ==============================================================================
// Monthly stock selection
// ==============================================================================

fn selected_sheet(selected: &[SelectionResult]) -> Sheet {
    let mut sheet = Sheet::new(
        "Selection",
        &[
            "Name", "Ticker", "Category", "Sector", "Sub-sector", "Score", "Market Cap (B)",
            "3M Return (%)", "6M Return (%)", "Golden Cross", "RSI",
        ],
    );
    for r in selected {
        sheet.push(vec![
            r.name.as_str().into(),
            r.ticker.as_str().into(),
            r.category.as_str().into(),
            r.sector.as_str().into(),
            r.sub_sector.as_str().into(),
            round2(r.score).into(),
            round2(r.market_cap / BILLION).into(),
            round2(r.return_3m).into(),
            round2(r.return_6m).into(),
            r.golden_cross.into(),
            round2(r.rsi).into(),
        ]);
    }
    sheet
}

fn candidates_sheet(all: &[SelectionResult]) -> Sheet {
    let mut sheet = Sheet::new(
        "All_Candidates",
        &[
            "Name", "Ticker", "Category", "Sector", "Sub-sector", "Score", "Market Cap (B)",
            "3M Return (%)", "6M Return (%)",
        ],
    );
    for r in all {
        sheet.push(vec![
            r.name.as_str().into(),
            r.ticker.as_str().into(),
            r.category.as_str().into(),
            r.sector.as_str().into(),
            r.sub_sector.as_str().into(),
            r.score.into(),
            (r.market_cap / BILLION).into(),
            r.return_3m.into(),
            r.return_6m.into(),
        ]);
    }
    sheet
}

fn category_stats_sheet(stats: &[CategoryStats]) -> Sheet {
    let mut sheet = Sheet::new(
        "Category_Stats",
        &["Category", "Avg Score", "Avg 3M Return (%)", "Count"],
    );
    for s in stats {
        sheet.push(vec![
            s.category.as_str().into(),
            round2(s.avg_score).into(),
            round2(s.avg_return_3m).into(),
            (s.count as f64).into(),
        ]);
    }
    sheet
}

fn top_sheet(top: &[SelectionResult]) -> Sheet {
    let mut sheet = Sheet::new(
        "Top10",
        &["Name", "Category", "Sub-sector", "Score", "3M Return (%)"],
    );
    for r in top {
        sheet.push(vec![
            r.name.as_str().into(),
            r.category.as_str().into(),
            r.sub_sector.as_str().into(),
            r.score.into(),
            round2(r.return_3m).into(),
        ]);
    }
    sheet
}

fn criteria_sheet() -> Sheet {
    let mut sheet = Sheet::new("Criteria", &["Factor", "Max Points", "Breakpoints"]);
    let rows: [(&str, f64, &str); 5] = [
        ("Market cap", 30.0, "$100B+: 30, $50B+: 25, $10B+: 20, $5B+: 15, $1B+: 10, else 5"),
        ("Volume trend", 20.0, "20d/60d average volume: 1.5+: 20, 1.2+: 15, 1.0+: 10, else 5"),
        ("3M return", 20.0, "30%+: 20, 20%+: 17, 10%+: 14, 0%+: 10, -10%+: 5, else 0"),
        ("6M return", 15.0, "40%+: 15, 25%+: 12, 10%+: 9, 0%+: 6, -15%+: 3, else 0"),
        ("Technical", 15.0, "Golden cross +6; RSI 40-60 +6 (30-70 +3); price above MA20 +3"),
    ];
    for (factor, points, rule) in rows {
        sheet.push(vec![factor.into(), points.into(), rule.into()]);
    }
    sheet
}

pub fn selection_sheets(digest: &SelectionDigest) -> Vec<Sheet> {
    vec![
        selected_sheet(&digest.selected),
        candidates_sheet(&digest.all_candidates),
        category_stats_sheet(&digest.category_stats),
        top_sheet(&digest.top),
        criteria_sheet(),
    ]
}
