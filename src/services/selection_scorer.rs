//! Weighted multi-factor score used to pick one stock per sub-sector.
//!
//! The composite (0-100) is the sum of five step-function buckets. Each bucket
//! is monotonic non-decreasing in its metric and brackets are lower-bound
//! inclusive.

use crate::errors::IndicatorError;
use crate::models::{
    Candidate, CandidatePool, PriceSeries, ScoreBreakdown, SectorSelection, SelectionMetrics,
    SelectionResult,
};
use crate::services::indicators::{
    crossover, percent_change, rsi, simple_moving_average, volume_trend, MA_LONG, MA_SHORT,
    RSI_PERIOD,
};

/// Candidates with shorter history are excluded, not scored.
pub const MIN_SELECTION_SAMPLES: usize = 126;
pub const LAG_3M: usize = 62;
pub const LAG_6M: usize = 125;

const BILLION: f64 = 1_000_000_000.0;

pub fn market_cap_points(market_cap: f64) -> u32 {
    match market_cap {
        m if m >= 100.0 * BILLION => 30,
        m if m >= 50.0 * BILLION => 25,
        m if m >= 10.0 * BILLION => 20,
        m if m >= 5.0 * BILLION => 15,
        m if m >= BILLION => 10,
        _ => 5,
    }
}

pub fn volume_trend_points(volume_trend: f64) -> u32 {
    match volume_trend {
        v if v >= 1.5 => 20,
        v if v >= 1.2 => 15,
        v if v >= 1.0 => 10,
        _ => 5,
    }
}

pub fn return_3m_points(return_3m: f64) -> u32 {
    match return_3m {
        r if r >= 30.0 => 20,
        r if r >= 20.0 => 17,
        r if r >= 10.0 => 14,
        r if r >= 0.0 => 10,
        r if r >= -10.0 => 5,
        _ => 0,
    }
}

pub fn return_6m_points(return_6m: f64) -> u32 {
    match return_6m {
        r if r >= 40.0 => 15,
        r if r >= 25.0 => 12,
        r if r >= 10.0 => 9,
        r if r >= 0.0 => 6,
        r if r >= -15.0 => 3,
        _ => 0,
    }
}

pub fn technical_points(golden_cross: bool, rsi: f64, price_vs_ma20: f64) -> u32 {
    let mut points = 0;
    if golden_cross {
        points += 6;
    }
    if (40.0..=60.0).contains(&rsi) {
        points += 6;
    } else if (30.0..=70.0).contains(&rsi) {
        points += 3;
    }
    if price_vs_ma20 > 0.0 {
        points += 3;
    }
    points
}

pub fn score_breakdown(metrics: &SelectionMetrics) -> ScoreBreakdown {
    ScoreBreakdown {
        market_cap: market_cap_points(metrics.market_cap),
        volume: volume_trend_points(metrics.volume_trend),
        return_3m: return_3m_points(metrics.return_3m),
        return_6m: return_6m_points(metrics.return_6m),
        technical: technical_points(metrics.golden_cross, metrics.rsi, metrics.price_vs_ma20),
    }
}

/// Derives the scoring inputs from a year of daily history.
pub fn selection_metrics(
    series: &PriceSeries,
    market_cap: f64,
) -> Result<SelectionMetrics, IndicatorError> {
    if series.len() < MIN_SELECTION_SAMPLES {
        return Err(IndicatorError::InsufficientData {
            required: MIN_SELECTION_SAMPLES,
            actual: series.len(),
        });
    }

    let closes = series.closes();
    let volumes = series.volumes();
    let price = closes[closes.len() - 1];

    let ma_20 = simple_moving_average(&closes, MA_SHORT);
    let ma_60 = simple_moving_average(&closes, MA_LONG);
    let price_vs_ma20 = if ma_20 != 0.0 {
        (price / ma_20 - 1.0) * 100.0
    } else {
        0.0
    };

    Ok(SelectionMetrics {
        market_cap,
        price,
        return_3m: percent_change(&closes, LAG_3M),
        return_6m: percent_change(&closes, LAG_6M),
        volume_trend: volume_trend(&volumes, MA_SHORT, MA_LONG),
        ma_20,
        ma_60,
        golden_cross: crossover(ma_20, ma_60).golden,
        rsi: rsi(&closes, RSI_PERIOD),
        price_vs_ma20,
    })
}

pub fn score_candidate(
    candidate: &Candidate,
    pool: &CandidatePool,
    metrics: &SelectionMetrics,
) -> SelectionResult {
    let breakdown = score_breakdown(metrics);
    SelectionResult {
        name: candidate.name.clone(),
        ticker: candidate.ticker.clone(),
        exchange: candidate.exchange.clone(),
        sub_sector: pool.sub_sector.clone(),
        category: pool.category.clone(),
        sector: pool.sector.clone(),
        market_cap: metrics.market_cap,
        price: metrics.price,
        return_3m: metrics.return_3m,
        return_6m: metrics.return_6m,
        volume_trend: metrics.volume_trend,
        ma_20: metrics.ma_20,
        ma_60: metrics.ma_60,
        golden_cross: metrics.golden_cross,
        rsi: metrics.rsi,
        score: breakdown.total() as f64,
        breakdown,
    }
}

/// Ranks one pool's scored candidates. The sort is stable, so equal scores
/// keep pool order and the first listed candidate wins the tie.
pub fn rank_sector(sub_sector: &str, mut scored: Vec<SelectionResult>) -> SectorSelection {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    SectorSelection {
        sub_sector: sub_sector.to_string(),
        selected: scored.first().cloned(),
        ranked: scored,
    }
}

/// True when candidates were scored but none of them had a market cap, which
/// means the market-cap lookup failed across the board.
pub fn market_caps_unavailable(sectors: &[SectorSelection]) -> bool {
    let mut scored = sectors.iter().flat_map(|s| s.ranked.iter()).peekable();
    scored.peek().is_some() && scored.all(|r| r.market_cap <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(market_cap: f64) -> SelectionMetrics {
        SelectionMetrics {
            market_cap,
            price: 100.0,
            return_3m: 12.0,
            return_6m: 18.0,
            volume_trend: 1.1,
            ma_20: 98.0,
            ma_60: 95.0,
            golden_cross: true,
            rsi: 55.0,
            price_vs_ma20: 2.0,
        }
    }

    #[test]
    fn test_market_cap_breakpoints_lower_inclusive() {
        assert_eq!(market_cap_points(100.0 * BILLION), 30);
        assert_eq!(market_cap_points(99.9 * BILLION), 25);
        assert_eq!(market_cap_points(50.0 * BILLION), 25);
        assert_eq!(market_cap_points(10.0 * BILLION), 20);
        assert_eq!(market_cap_points(5.0 * BILLION), 15);
        assert_eq!(market_cap_points(1.0 * BILLION), 10);
        assert_eq!(market_cap_points(0.0), 5);
    }

    #[test]
    fn test_volume_and_return_breakpoints() {
        assert_eq!(volume_trend_points(1.5), 20);
        assert_eq!(volume_trend_points(1.2), 15);
        assert_eq!(volume_trend_points(1.0), 10);
        assert_eq!(volume_trend_points(0.99), 5);

        assert_eq!(return_3m_points(30.0), 20);
        assert_eq!(return_3m_points(20.0), 17);
        assert_eq!(return_3m_points(10.0), 14);
        assert_eq!(return_3m_points(0.0), 10);
        assert_eq!(return_3m_points(-10.0), 5);
        assert_eq!(return_3m_points(-10.01), 0);

        assert_eq!(return_6m_points(40.0), 15);
        assert_eq!(return_6m_points(25.0), 12);
        assert_eq!(return_6m_points(10.0), 9);
        assert_eq!(return_6m_points(0.0), 6);
        assert_eq!(return_6m_points(-15.0), 3);
        assert_eq!(return_6m_points(-15.01), 0);
    }

    #[test]
    fn test_technical_points() {
        assert_eq!(technical_points(true, 50.0, 1.0), 15);
        assert_eq!(technical_points(true, 40.0, 0.0), 12);
        assert_eq!(technical_points(false, 65.0, 1.0), 6);
        assert_eq!(technical_points(false, 30.0, -1.0), 3);
        assert_eq!(technical_points(false, 75.0, -1.0), 0);
        assert_eq!(technical_points(false, 25.0, 0.0), 0);
    }

    #[test]
    fn test_buckets_monotonic() {
        let samples: Vec<f64> = (-400..=400).map(|i| i as f64 * 0.5).collect();
        for pair in samples.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            assert!(return_3m_points(hi) >= return_3m_points(lo));
            assert!(return_6m_points(hi) >= return_6m_points(lo));
            assert!(volume_trend_points(hi / 50.0) >= volume_trend_points(lo / 50.0));
            assert!(market_cap_points(hi * BILLION) >= market_cap_points(lo * BILLION));
        }
    }

    #[test]
    fn test_composite_max_is_100() {
        let best = SelectionMetrics {
            market_cap: 500.0 * BILLION,
            return_3m: 50.0,
            return_6m: 80.0,
            volume_trend: 2.0,
            ..metrics(0.0)
        };
        assert_eq!(score_breakdown(&best).total(), 100);
    }

    #[test]
    fn test_breakdown_sums() {
        let breakdown = score_breakdown(&metrics(60.0 * BILLION));
        assert_eq!(
            breakdown,
            ScoreBreakdown {
                market_cap: 25,
                volume: 10,
                return_3m: 14,
                return_6m: 9,
                technical: 15,
            }
        );
        assert_eq!(breakdown.total(), 73);
    }

    #[test]
    fn test_rank_sector_stable_ties() {
        let pool = CandidatePool {
            sub_sector: "GPU".to_string(),
            category: "AI Infrastructure".to_string(),
            sector: "AI Chip".to_string(),
            candidates: vec![],
        };
        let candidate = |ticker: &str| Candidate {
            name: ticker.to_string(),
            ticker: ticker.to_string(),
            exchange: "US".to_string(),
        };

        let scored = vec![
            score_candidate(&candidate("AAA"), &pool, &metrics(2.0 * BILLION)),
            score_candidate(&candidate("BBB"), &pool, &metrics(20.0 * BILLION)),
            score_candidate(&candidate("CCC"), &pool, &metrics(20.0 * BILLION)),
        ];

        let ranking = rank_sector("GPU", scored);
        let order: Vec<&str> = ranking.ranked.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(order, vec!["BBB", "CCC", "AAA"]);
        assert_eq!(ranking.selected.map(|r| r.ticker), Some("BBB".to_string()));
    }

    #[test]
    fn test_rank_sector_empty_pool() {
        let ranking = rank_sector("HVAC", Vec::new());
        assert!(ranking.selected.is_none());
        assert!(ranking.ranked.is_empty());
    }

    /// Closes 1, 2, 3, ... so every lag maps to a distinct, known base price.
    fn counting_series(len: usize) -> PriceSeries {
        let first = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries::new(
            (0..len)
                .map(|i| crate::models::PricePoint {
                    date: first + chrono::Duration::days(i as i64),
                    close: (i + 1) as f64,
                    volume: 1_000.0,
                })
                .collect(),
        )
    }

    #[test]
    fn test_selection_metrics_requires_126_samples() {
        assert_eq!(
            selection_metrics(&counting_series(125), 0.0),
            Err(IndicatorError::InsufficientData {
                required: 126,
                actual: 125,
            })
        );
        assert!(selection_metrics(&counting_series(126), 0.0).is_ok());
    }

    #[test]
    fn test_selection_metrics_return_lags() {
        // 252 samples: the 3-month base is the 63rd close from the end, the
        // 6-month base the 126th.
        let m = selection_metrics(&counting_series(252), 5.0 * BILLION).unwrap();
        assert!((m.return_3m - (252.0 / 190.0 - 1.0) * 100.0).abs() < 1e-9);
        assert!((m.return_6m - (252.0 / 127.0 - 1.0) * 100.0).abs() < 1e-9);
        assert_eq!(m.price, 252.0);
        assert_eq!(m.market_cap, 5.0 * BILLION);

        // At exactly 126 samples the 6-month base is the very first close
        let m = selection_metrics(&counting_series(126), 0.0).unwrap();
        assert!((m.return_6m - (126.0 / 1.0 - 1.0) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_selection_metrics_trend_signals() {
        let m = selection_metrics(&counting_series(200), 0.0).unwrap();
        assert!(m.golden_cross);
        assert!(m.ma_20 > m.ma_60);
        assert!(m.price_vs_ma20 > 0.0);
        assert_eq!(m.volume_trend, 1.0);
        assert_eq!(m.rsi, 100.0);
    }

    #[test]
    fn test_market_caps_unavailable() {
        let pool = CandidatePool {
            sub_sector: "GPU".to_string(),
            category: "AI Infrastructure".to_string(),
            sector: "AI Chip".to_string(),
            candidates: vec![],
        };
        let candidate = Candidate {
            name: "NVIDIA".to_string(),
            ticker: "NVDA".to_string(),
            exchange: "US".to_string(),
        };
        let sector = |caps: &[f64]| {
            rank_sector(
                "GPU",
                caps.iter()
                    .map(|&cap| score_candidate(&candidate, &pool, &metrics(cap)))
                    .collect(),
            )
        };

        assert!(market_caps_unavailable(&[sector(&[0.0]), sector(&[0.0, 0.0])]));
        assert!(!market_caps_unavailable(&[sector(&[0.0]), sector(&[3.0 * BILLION])]));
        // Nothing scored is not a lookup failure
        assert!(!market_caps_unavailable(&[sector(&[])]));
        assert!(!market_caps_unavailable(&[]));
    }
}
