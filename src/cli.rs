use crate::config::{LogLevel, OutputFormat, SourceKind};
use chrono_tz::Tz;
use clap::Parser;

/// Gemini REST API alert for the standard deviation of hourly prices over the past 24 hours.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Trading pair to evaluate (example: "BTCUSD", "ETHUSD", "BTCETH", ...)
    #[arg(short, long)]
    pub chain: String,

    /// Always print the record and never treat it as a delivered alert
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Standard deviation at or above which an alert is raised
    #[arg(short, long, default_value = "1.0", allow_negative_numbers = true)]
    pub threshold: f64,

    /// Output format of the record
    #[arg(short = 'f', long, value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// IANA timezone used for the record timestamp
    #[arg(short = 'z', long, default_value = "UTC", value_parser = parse_timezone)]
    pub timezone: Tz,

    /// Log level to output
    #[arg(long, value_enum, default_value = "INFO", ignore_case = true)]
    pub log_level: LogLevel,

    /// Price data endpoint: 24h ticker snapshot or hourly candles
    #[arg(short, long, value_enum, default_value = "ticker")]
    pub source: SourceKind,

    /// Candle timeframe requested from the candles endpoint
    #[arg(long, default_value = "1hr")]
    pub timeframe: String,
}

pub fn parse_timezone(s: &str) -> Result<Tz, String> {
    s.parse::<Tz>()
        .map_err(|_| format!("Unknown timezone '{}'. Use an IANA name like UTC or Europe/Berlin.", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["deviation-alert", "--chain", "BTCUSD"]).unwrap();
        assert_eq!(args.chain, "BTCUSD");
        assert!(!args.dry_run);
        assert_eq!(args.threshold, 1.0);
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.timezone, Tz::UTC);
        assert_eq!(args.log_level, LogLevel::Info);
        assert_eq!(args.source, SourceKind::Ticker);
        assert_eq!(args.timeframe, "1hr");
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "deviation-alert", "-c", "ethusd", "-n", "-t", "2.5", "-f", "yaml", "-z",
            "Europe/Berlin", "--log-level", "warning", "-s", "candles",
        ])
        .unwrap();
        assert!(args.dry_run);
        assert_eq!(args.threshold, 2.5);
        assert_eq!(args.output_format, OutputFormat::Yaml);
        assert_eq!(args.timezone, Tz::Europe__Berlin);
        assert_eq!(args.log_level, LogLevel::Warning);
        assert_eq!(args.source, SourceKind::Candles);
    }

    #[test]
    fn test_chain_is_required() {
        assert!(Args::try_parse_from(["deviation-alert"]).is_err());
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        assert!(parse_timezone("Mars/Olympus_Mons").is_err());
        assert!(Args::try_parse_from(["deviation-alert", "-c", "BTCUSD", "-z", "Nowhere"]).is_err());
    }

    #[test]
    fn test_unknown_output_format_rejected() {
        assert!(Args::try_parse_from(["deviation-alert", "-c", "BTCUSD", "-f", "xml"]).is_err());
    }
}
