use serde::{Deserialize, Serialize};

/// Inputs of the composite selection score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionMetrics {
    pub market_cap: f64,
    pub price: f64,
    pub return_3m: f64,
    pub return_6m: f64,
    pub volume_trend: f64,
    pub ma_20: f64,
    pub ma_60: f64,
    pub golden_cross: bool,
    pub rsi: f64,
    pub price_vs_ma20: f64,
}

/// Points earned per bucket. `total()` is the composite 0-100 score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub market_cap: u32,
    pub volume: u32,
    pub return_3m: u32,
    pub return_6m: u32,
    pub technical: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.market_cap + self.volume + self.return_3m + self.return_6m + self.technical
    }
}

/// One scored candidate within a sub-sector pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub name: String,
    pub ticker: String,
    pub exchange: String,
    pub sub_sector: String,
    pub category: String,
    pub sector: String,
    pub market_cap: f64,
    pub price: f64,
    pub return_3m: f64,
    pub return_6m: f64,
    pub volume_trend: f64,
    pub ma_20: f64,
    pub ma_60: f64,
    pub golden_cross: bool,
    pub rsi: f64,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Ranked outcome of one sub-sector pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSelection {
    pub sub_sector: String,
    pub selected: Option<SelectionResult>,
    /// Every scored candidate, best first.
    pub ranked: Vec<SelectionResult>,
}

/// Mean score and 3-month return of the selected stocks in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub avg_score: f64,
    pub avg_return_3m: f64,
    pub count: usize,
}
