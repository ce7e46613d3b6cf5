use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gemini encodes decimals as JSON strings on some endpoints and as
/// numbers on others.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Text(String),
    Number(f64),
}

impl RawDecimal {
    fn into_f64(self) -> Result<f64, String> {
        match self {
            RawDecimal::Number(n) => Ok(n),
            RawDecimal::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a decimal", s)),
        }
    }
}

fn de_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    RawDecimal::deserialize(deserializer)?
        .into_f64()
        .map_err(serde::de::Error::custom)
}

fn de_decimals<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<RawDecimal>::deserialize(deserializer)?
        .into_iter()
        .map(|d| d.into_f64().map_err(serde::de::Error::custom))
        .collect()
}

fn de_opt_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawDecimal>::deserialize(deserializer)?
        .map(|d| d.into_f64().map_err(serde::de::Error::custom))
        .transpose()
}

/// Body of `GET /v2/ticker/:symbol`.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerSnapshot {
    pub symbol: String,
    #[serde(deserialize_with = "de_decimal")]
    pub open: f64,
    #[serde(deserialize_with = "de_decimal")]
    pub high: f64,
    #[serde(deserialize_with = "de_decimal")]
    pub low: f64,
    #[serde(deserialize_with = "de_decimal")]
    pub close: f64,
    /// Hourly closes for the trailing 24 hours, newest first.
    #[serde(deserialize_with = "de_decimals")]
    pub changes: Vec<f64>,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    pub bid: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_decimal")]
    pub ask: Option<f64>,
}

type CandleTuple = (i64, RawDecimal, RawDecimal, RawDecimal, RawDecimal, RawDecimal);

/// One `[time, open, high, low, close, volume]` row of `GET /v2/candles`.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    fn from_row((time_ms, open, high, low, close, volume): CandleRow) -> Result<Self, String> {
        let open_time = DateTime::<Utc>::from_timestamp_millis(time_ms)
            .ok_or_else(|| format!("candle time {} is out of range", time_ms))?;

        Ok(Candle {
            open_time,
            open: open.into_f64()?,
            high: high.into_f64()?,
            low: low.into_f64()?,
            close: close.into_f64()?,
            volume: volume.into_f64()?,
        })
    }
}

type CandleRow = (i64, RawDecimal, RawDecimal, RawDecimal, RawDecimal, RawDecimal);

impl<'de> Deserialize<'de> for Candle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let row = <CandleRow as Deserialize>::deserialize(deserializer)?;
        Candle::from_row(row).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Hourly closes ordered newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn newest(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn oldest(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Normalized price data, still tagged with the endpoint it came from
/// because the average price formula differs between the two.
#[derive(Debug, Clone)]
pub enum PriceWindow {
    Snapshot {
        ticker: TickerSnapshot,
        series: PriceSeries,
    },
    Candles {
        series: PriceSeries,
    },
}

impl PriceWindow {
    pub fn series(&self) -> &PriceSeries {
        match self {
            PriceWindow::Snapshot { series, .. } => series,
            PriceWindow::Candles { series } => series,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsResult {
    pub last_price: f64,
    pub average_price: f64,
    pub price_change: f64,
    pub standard_deviation: f64,
}

/// The `deviation` field of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviationIndicator {
    /// Rendered as an empty string.
    Placeholder,
    Exceeded(bool),
}

impl Serialize for DeviationIndicator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DeviationIndicator::Placeholder => serializer.serialize_str(""),
            DeviationIndicator::Exceeded(exceeded) => serializer.serialize_bool(*exceeded),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerData {
    pub last_price: f64,
    pub average_price: f64,
    pub deviation: f64,
    pub price_change_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleData {
    pub last_price: f64,
    pub average_price: f64,
    pub stddev: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlertData {
    Ticker(TickerData),
    Candles(CandleData),
    Error { error: String },
}

impl AlertData {
    pub fn is_error(&self) -> bool {
        matches!(self, AlertData::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    pub timestamp: String,
    pub log_level: String,
    pub trading_pair: String,
    pub deviation: DeviationIndicator,
    pub data: AlertData,
}
