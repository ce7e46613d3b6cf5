use crate::cli::Args;
use crate::error::{AlertError, Result};
use crate::source::PriceSource;
use chrono_tz::Tz;
use clap::ValueEnum;
use std::env;
use tracing::Level;

pub const DEFAULT_API_URL: &str = "https://api.sandbox.gemini.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Prometheus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// tracing has no level above ERROR, so CRITICAL collapses onto it.
    pub fn tracing_level(&self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error | LogLevel::Critical => Level::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Ticker,
    Candles,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub chain: String,
    pub dry_run: bool,
    pub threshold: f64,
    pub output_format: OutputFormat,
    pub timezone: Tz,
    pub log_level: LogLevel,
    pub source: PriceSource,
    pub base_url: String,
}

impl Config {
    /// Combines parsed arguments with the environment (`GEMINI_API_URL`).
    pub fn from_args(args: Args) -> Result<Self> {
        let base_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let source = match args.source {
            SourceKind::Ticker => PriceSource::Ticker,
            SourceKind::Candles => PriceSource::Candles {
                timeframe: args.timeframe,
            },
        };

        let config = Self {
            chain: args.chain,
            dry_run: args.dry_run,
            threshold: args.threshold,
            output_format: args.output_format,
            timezone: args.timezone,
            log_level: args.log_level,
            source,
            base_url: base_url.trim_end_matches('/').to_string(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chain.trim().is_empty() {
            return Err(AlertError::Config("Chain cannot be empty".to_string()));
        }

        if !self.chain.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AlertError::Config(format!(
                "Invalid chain '{}': expected a symbol like BTCUSD",
                self.chain
            )));
        }

        if !self.threshold.is_finite() {
            return Err(AlertError::Config(format!(
                "Threshold must be a finite number, got {}",
                self.threshold
            )));
        }

        if let PriceSource::Candles { timeframe } = &self.source {
            if timeframe.trim().is_empty() {
                return Err(AlertError::Config("Timeframe cannot be empty".to_string()));
            }
        }

        if self.base_url.trim().is_empty() {
            return Err(AlertError::Config("API base URL cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            chain: "BTCUSD".to_string(),
            dry_run: false,
            threshold: 1.0,
            output_format: OutputFormat::Json,
            timezone: Tz::UTC,
            log_level: LogLevel::Info,
            source: PriceSource::Ticker,
            base_url: DEFAULT_API_URL.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_chain() {
        let mut cfg = config();
        cfg.chain = "  ".to_string();
        assert!(matches!(cfg.validate(), Err(AlertError::Config(_))));

        cfg.chain = "btc/usd".to_string();
        assert!(matches!(cfg.validate(), Err(AlertError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_nan_threshold() {
        let mut cfg = config();
        cfg.threshold = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_timeframe() {
        let mut cfg = config();
        cfg.source = PriceSource::Candles {
            timeframe: String::new(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(LogLevel::Warning.tracing_level(), Level::WARN);
        assert_eq!(LogLevel::Critical.tracing_level(), Level::ERROR);
        assert_eq!(LogLevel::Critical.as_str(), "CRITICAL");
    }
}
