use serde::{Deserialize, Serialize};

/// Per-ticker indicator values for one daily run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub name: String,
    pub ticker: String,
    pub sector: String,
    pub price: f64,
    pub change_1d: f64,
    pub change_1w: f64,
    pub change_1m: f64,
    pub vs_ma20: f64,
    pub ma_20: f64,
    pub ma_60: f64,
    pub golden_cross: bool,
    pub dead_cross: bool,
    pub volume: u64,
    pub volume_ratio: f64,
    pub rsi: f64,
}
