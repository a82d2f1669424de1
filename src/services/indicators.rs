//! Indicator engine: returns, moving averages, crossovers, volume ratio and RSI.
//!
//! Every function here is pure and total. Short or degenerate input yields a
//! documented neutral value instead of an error, except `build_snapshot`,
//! which reports an explicit `IndicatorError` so callers can skip the ticker.

use crate::errors::IndicatorError;
use crate::models::{IndicatorSnapshot, PriceSeries, TrackedStock};

/// Value returned by `rsi` when there is not enough history or no movement.
pub const RSI_NEUTRAL: f64 = 50.0;
pub const RSI_PERIOD: usize = 14;

/// Lags measured in samples before the latest close.
pub const LAG_1D: usize = 1;
pub const LAG_1W: usize = 4;
pub const LAG_1M: usize = 20;

pub const MA_SHORT: usize = 20;
pub const MA_LONG: usize = 60;
pub const VOLUME_WINDOW: usize = 20;

/// Minimum samples for a daily snapshot (today plus the previous close).
pub const MIN_SNAPSHOT_SAMPLES: usize = 2;

/// Mean of the last `window` values.
///
/// Falls back to the latest value when fewer than `window` samples exist, and
/// to 0 for an empty slice.
pub fn simple_moving_average(values: &[f64], window: usize) -> f64 {
    let latest = values.last().copied().unwrap_or(0.0);
    if window == 0 || values.len() < window {
        return latest;
    }

    let tail = &values[values.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

/// Percentage change of the latest value against the value `lag` samples earlier.
///
/// Returns 0 when the series is shorter than `lag + 1` or the base is zero.
pub fn percent_change(values: &[f64], lag: usize) -> f64 {
    if values.len() < lag + 1 {
        return 0.0;
    }

    let latest = values[values.len() - 1];
    let base = values[values.len() - 1 - lag];
    if base == 0.0 {
        return 0.0;
    }

    (latest / base - 1.0) * 100.0
}

/// Relation between a short and a long moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Crossover {
    pub golden: bool,
    pub dead: bool,
}

/// Golden when short > long, dead when short < long, neither when equal.
pub fn crossover(ma_short: f64, ma_long: f64) -> Crossover {
    Crossover {
        golden: ma_short > ma_long,
        dead: ma_short < ma_long,
    }
}

/// Latest volume as a percentage of its `window`-sample average.
///
/// 100 means "average". A zero average yields 100.
pub fn volume_ratio(volumes: &[f64], window: usize) -> f64 {
    let latest = volumes.last().copied().unwrap_or(0.0);
    let average = simple_moving_average(volumes, window);
    if average == 0.0 {
        return 100.0;
    }
    latest / average * 100.0
}

/// Ratio of the short-window average volume to the long-window average volume.
///
/// 1.0 when the long average is zero or there is no data.
pub fn volume_trend(volumes: &[f64], short_window: usize, long_window: usize) -> f64 {
    let short = simple_moving_average(volumes, short_window);
    let long = simple_moving_average(volumes, long_window);
    if long <= 0.0 {
        return 1.0;
    }
    short / long
}

/// Relative Strength Index (RSI)
///
/// Mean gain over the last `period` price changes divided by the mean loss
/// over the same changes, mapped through `100 - 100 / (1 + RS)`.
///
/// - Fewer than `period` prices: `RSI_NEUTRAL`
/// - No losses in the window: 100 (or `RSI_NEUTRAL` for a flat window)
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period || prices.len() < 2 {
        return RSI_NEUTRAL;
    }

    let start = prices.len().saturating_sub(period + 1);
    let window = &prices[start..];
    let changes = (window.len() - 1) as f64;

    let (gain_sum, loss_sum) = window
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0_f64, 0.0_f64), |(gain, loss), change| {
            if change > 0.0 {
                (gain + change, loss)
            } else {
                (gain, loss - change)
            }
        });

    let avg_gain = gain_sum / changes;
    let avg_loss = loss_sum / changes;

    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { RSI_NEUTRAL };
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Computes the daily indicator snapshot for one tracked stock.
pub fn build_snapshot(
    stock: &TrackedStock,
    series: &PriceSeries,
) -> Result<IndicatorSnapshot, IndicatorError> {
    if series.len() < MIN_SNAPSHOT_SAMPLES {
        return Err(IndicatorError::InsufficientData {
            required: MIN_SNAPSHOT_SAMPLES,
            actual: series.len(),
        });
    }

    let closes = series.closes();
    let volumes = series.volumes();
    let price = closes[closes.len() - 1];

    let ma_20 = simple_moving_average(&closes, MA_SHORT);
    let ma_60 = simple_moving_average(&closes, MA_LONG);

    // A zero average means the provider sent garbage; report no cross at all.
    let cross = if ma_20 != 0.0 && ma_60 != 0.0 {
        crossover(ma_20, ma_60)
    } else {
        Crossover::default()
    };

    let vs_ma20 = if ma_20 != 0.0 {
        (price / ma_20 - 1.0) * 100.0
    } else {
        0.0
    };

    let volume = volumes[volumes.len() - 1];

    Ok(IndicatorSnapshot {
        name: stock.name.clone(),
        ticker: stock.ticker.clone(),
        sector: stock.sector.clone(),
        price,
        change_1d: percent_change(&closes, LAG_1D),
        change_1w: percent_change(&closes, LAG_1W),
        change_1m: percent_change(&closes, LAG_1M),
        vs_ma20,
        ma_20,
        ma_60,
        golden_cross: cross.golden,
        dead_cross: cross.dead,
        volume: volume.max(0.0).round() as u64,
        volume_ratio: volume_ratio(&volumes, VOLUME_WINDOW),
        rsi: rsi(&closes, RSI_PERIOD),
    })
}
