use crate::api::GeminiClient;
use crate::error::{AlertError, Result};
use crate::models::{
    AlertData, Candle, CandleData, DeviationIndicator, PricePoint, PriceSeries, PriceWindow,
    StatsResult, TickerData, TickerSnapshot,
};
use chrono::{DateTime, Duration, DurationRound, Utc};
use serde_json::Value;
use tracing::{debug, info};

/// Candles are kept when they opened within this many hours of the request,
/// so the hour that started 24h ago is still captured.
pub const CANDLE_WINDOW_HOURS: i64 = 25;

pub const DEFAULT_TIMEFRAME: &str = "1hr";

/// Where hourly prices come from. Each variant owns its fetch, its
/// normalization and the shape of the record it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSource {
    /// `/v2/ticker`: 24 hourly closes plus the 24h high/low.
    Ticker,
    /// `/v2/candles`: unbounded hourly candles, windowed locally.
    Candles { timeframe: String },
}

impl PriceSource {
    pub fn name(&self) -> &'static str {
        match self {
            PriceSource::Ticker => "ticker",
            PriceSource::Candles { .. } => "candles",
        }
    }

    pub async fn fetch(&self, client: &GeminiClient, symbol: &str) -> Result<Value> {
        match self {
            PriceSource::Ticker => client.fetch_ticker(symbol).await,
            PriceSource::Candles { timeframe } => client.fetch_candles(symbol, timeframe).await,
        }
    }

    pub fn normalize(&self, raw: Value, now: DateTime<Utc>) -> Result<PriceWindow> {
        match self {
            PriceSource::Ticker => normalize_ticker(raw, now),
            PriceSource::Candles { .. } => normalize_candles(raw, now),
        }
    }

    pub fn alert_data(&self, stats: &StatsResult) -> AlertData {
        match self {
            PriceSource::Ticker => AlertData::Ticker(TickerData {
                last_price: stats.last_price,
                average_price: stats.average_price,
                deviation: stats.standard_deviation,
                price_change_value: stats.price_change,
            }),
            PriceSource::Candles { .. } => AlertData::Candles(CandleData {
                last_price: stats.last_price,
                average_price: stats.average_price,
                stddev: stats.standard_deviation,
                change: stats.price_change,
            }),
        }
    }

    /// Ticker records carry an empty placeholder; candle records flag whether
    /// the threshold was reached, which is false when nothing was computed.
    pub fn deviation_indicator(&self, stats: Option<&StatsResult>, threshold: f64) -> DeviationIndicator {
        match self {
            PriceSource::Ticker => DeviationIndicator::Placeholder,
            PriceSource::Candles { .. } => DeviationIndicator::Exceeded(
                stats.map_or(false, |s| s.standard_deviation >= threshold),
            ),
        }
    }
}

fn checked_price(price: f64, what: &str) -> Result<f64> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(AlertError::invalid_price(format!(
            "{} must be a positive finite decimal, got {}",
            what, price
        )))
    }
}

fn normalize_ticker(raw: Value, now: DateTime<Utc>) -> Result<PriceWindow> {
    let ticker: TickerSnapshot = serde_json::from_value(raw)
        .map_err(|e| AlertError::invalid_price(format!("unexpected ticker response: {}", e)))?;

    let opened_at = now - Duration::hours(24);
    info!(
        "{} opened at {} with price {}",
        ticker.symbol,
        opened_at.format("%Y/%m/%d %H:%M"),
        ticker.open
    );

    checked_price(ticker.high, "high")?;
    checked_price(ticker.low, "low")?;

    let hour = now.duration_trunc(Duration::hours(1)).unwrap_or(now);
    let points = ticker
        .changes
        .iter()
        .enumerate()
        .map(|(i, &price)| {
            Ok(PricePoint {
                timestamp: hour - Duration::hours(i as i64),
                price: checked_price(price, "hourly price")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let series = PriceSeries::new(points);
    debug!("prices for each hour over last 24 hours: {:?}", series.prices());

    Ok(PriceWindow::Snapshot { ticker, series })
}

fn normalize_candles(raw: Value, now: DateTime<Utc>) -> Result<PriceWindow> {
    let candles: Vec<Candle> = serde_json::from_value(raw)
        .map_err(|e| AlertError::invalid_price(format!("unexpected candles response: {}", e)))?;

    let total = candles.len();
    let cutoff = now - Duration::hours(CANDLE_WINDOW_HOURS);

    let points = candles
        .into_iter()
        .filter(|c| c.open_time >= cutoff)
        .map(|c| {
            Ok(PricePoint {
                timestamp: c.open_time,
                price: checked_price(c.close, "candle close")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let series = PriceSeries::new(points);
    debug!(
        "kept {} of {} candles opened since {}",
        series.len(),
        total,
        cutoff.to_rfc3339()
    );
    debug!(
        "prices for each hour over last 24 hours: {:?}",
        series
            .points()
            .iter()
            .map(|p| (p.timestamp.to_rfc3339(), p.price))
            .collect::<Vec<_>>()
    );

    Ok(PriceWindow::Candles { series })
}
