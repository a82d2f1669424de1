use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar as used by the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
}

/// Daily history for a ticker, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, sorting by date so callers never see descending input.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.volume).collect()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_ascending() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let series = PriceSeries::new(vec![
            PricePoint { date: d(3), close: 3.0, volume: 30.0 },
            PricePoint { date: d(1), close: 1.0, volume: 10.0 },
            PricePoint { date: d(2), close: 2.0, volume: 20.0 },
        ]);

        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.latest().map(|p| p.volume), Some(30.0));
    }
}
