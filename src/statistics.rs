use crate::error::{AlertError, Result};
use crate::models::{PriceWindow, StatsResult};

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Bessel-corrected (N - 1) standard deviation. `None` below two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let mean = mean(values)?;
    let variance = values.iter()
        .map(|&x| (x - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Ticker windows average the 24h high and low; candle windows average
/// every close in the window.
pub fn average_price(window: &PriceWindow) -> Option<f64> {
    match window {
        PriceWindow::Snapshot { ticker, .. } => mean(&[ticker.high, ticker.low]),
        PriceWindow::Candles { series } => mean(&series.prices()),
    }
}

impl StatsResult {
    pub fn compute(window: &PriceWindow) -> Result<Self> {
        let series = window.series();
        let prices = series.prices();

        let insufficient = || AlertError::InsufficientData { points: prices.len() };

        let standard_deviation = sample_std_dev(&prices).ok_or_else(insufficient)?;
        let newest = series.newest().ok_or_else(insufficient)?.price;
        let oldest = series.oldest().ok_or_else(insufficient)?.price;
        let average_price = average_price(window).ok_or_else(insufficient)?;

        if !standard_deviation.is_finite() || !average_price.is_finite() {
            return Err(AlertError::invalid_price(
                "statistics over the price window are not finite",
            ));
        }

        Ok(StatsResult {
            last_price: newest,
            average_price,
            price_change: newest - oldest,
            standard_deviation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricePoint, PriceSeries, TickerSnapshot};
    use chrono::{Duration, TimeZone, Utc};

    fn series(prices: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        PriceSeries::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &price)| PricePoint {
                    timestamp: start - Duration::hours(i as i64),
                    price,
                })
                .collect(),
        )
    }

    fn ticker(high: f64, low: f64) -> TickerSnapshot {
        TickerSnapshot {
            symbol: "BTCUSD".to_string(),
            open: 100.0,
            high,
            low,
            close: 100.0,
            changes: Vec::new(),
            bid: None,
            ask: None,
        }
    }

    #[test]
    fn test_sample_std_dev_matches_reference() {
        // Sum of squared deviations is 32 around a mean of 5.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((sample_std_dev(&values).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_dev_two_points() {
        let sd = sample_std_dev(&[1.0, 3.0]).unwrap();
        assert!((sd - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_dev_constant_series_is_zero() {
        assert_eq!(sample_std_dev(&[42.0; 24]), Some(0.0));
    }

    #[test]
    fn test_sample_std_dev_undefined_below_two() {
        assert_eq!(sample_std_dev(&[]), None);
        assert_eq!(sample_std_dev(&[100.0]), None);
    }

    #[test]
    fn test_sample_std_dev_large_prices() {
        let values = [65000.5, 65010.25, 64990.75, 65005.0];
        let m = values.iter().sum::<f64>() / 4.0;
        let reference = (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / 3.0).sqrt();
        assert!((sample_std_dev(&values).unwrap() - reference).abs() < 1e-9);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn test_compute_candles_window() {
        let window = PriceWindow::Candles {
            series: series(&[110.0, 100.0, 90.0]),
        };
        let stats = StatsResult::compute(&window).unwrap();

        assert_eq!(stats.last_price, 110.0);
        assert_eq!(stats.average_price, 100.0);
        assert_eq!(stats.price_change, 20.0);
        assert!((stats.standard_deviation - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_price_change_can_be_negative() {
        let window = PriceWindow::Candles {
            series: series(&[90.0, 95.0, 120.0]),
        };
        assert_eq!(StatsResult::compute(&window).unwrap().price_change, -30.0);
    }

    #[test]
    fn test_compute_snapshot_averages_high_and_low() {
        let window = PriceWindow::Snapshot {
            ticker: ticker(160.0, 90.0),
            series: series(&[150.0, 100.0, 100.0]),
        };
        let stats = StatsResult::compute(&window).unwrap();

        assert_eq!(stats.average_price, 125.0);
        assert_eq!(stats.last_price, 150.0);
        assert_eq!(stats.price_change, 50.0);
    }

    #[test]
    fn test_compute_rejects_short_series() {
        let cases: [&[f64]; 2] = [&[], &[100.0]];
        for prices in cases {
            let window = PriceWindow::Candles {
                series: series(prices),
            };
            match StatsResult::compute(&window) {
                Err(AlertError::InsufficientData { points }) => assert_eq!(points, prices.len()),
                other => panic!("expected InsufficientData, got {:?}", other),
            }
        }
    }
}
