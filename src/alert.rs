use crate::api::GeminiClient;
use crate::config::Config;
use crate::error::{AlertError, Result};
use crate::models::{AlertData, AlertRecord, DeviationIndicator, StatsResult};
use crate::output::format_timestamp;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Inclusive threshold; dry-run always emits.
pub fn should_emit(dry_run: bool, standard_deviation: f64, threshold: f64) -> bool {
    dry_run || standard_deviation >= threshold
}

/// Runs fetch, normalize, compute and the decision gate for one symbol.
pub struct AlertPipeline {
    config: Config,
    client: GeminiClient,
}

impl AlertPipeline {
    pub fn new(config: Config) -> Self {
        let client = GeminiClient::new(config.base_url.clone());
        Self::with_client(config, client)
    }

    pub fn with_client(config: Config, client: GeminiClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn compute_stats(&self, now: DateTime<Utc>) -> Result<StatsResult> {
        let source = &self.config.source;
        let raw = source.fetch(&self.client, &self.config.chain).await?;
        let window = source.normalize(raw, now)?;
        StatsResult::compute(&window)
    }

    /// Returns the record to print, or `None` when the deviation stayed
    /// under the threshold. Failures always produce an error record.
    pub async fn run(&self, now: DateTime<Utc>) -> Option<AlertRecord> {
        let threshold = self.config.threshold;
        let source = &self.config.source;

        if self.config.dry_run {
            info!("DRY_RUN - Alert events will not be triggered");
        }

        let stats = match self.compute_stats(now).await {
            Ok(stats) => stats,
            Err(e) => return Some(self.error_record(now, &e)),
        };

        let std_dev = stats.standard_deviation;
        if std_dev >= threshold {
            info!(
                "Calculated standard deviation ({}) >= threshold ({:.1}). Alert event would have been triggered.",
                std_dev, threshold
            );
        } else {
            info!(
                "Calculated standard deviation ({}) < threshold ({:.1}). Alert event would not have been triggered.",
                std_dev, threshold
            );
        }

        if !should_emit(self.config.dry_run, std_dev, threshold) {
            return None;
        }

        Some(self.record(
            now,
            source.deviation_indicator(Some(&stats), threshold),
            source.alert_data(&stats),
        ))
    }

    fn error_record(&self, now: DateTime<Utc>, e: &AlertError) -> AlertRecord {
        // Fetch failures were already reported by the client.
        if !e.is_fetch_error() {
            error!("Unable to evaluate {}: {}", self.config.chain, e);
        }

        self.record(
            now,
            self.config.source.deviation_indicator(None, self.config.threshold),
            AlertData::Error {
                error: e.to_string(),
            },
        )
    }

    fn record(&self, now: DateTime<Utc>, deviation: DeviationIndicator, data: AlertData) -> AlertRecord {
        AlertRecord {
            timestamp: format_timestamp(now, self.config.timezone),
            log_level: self.config.log_level.as_str().to_string(),
            trading_pair: self.config.chain.to_uppercase(),
            deviation,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_threshold_is_inclusive() {
        assert!(should_emit(false, 1.0, 1.0));
        assert!(should_emit(false, 1.5, 1.0));
        assert!(!should_emit(false, 0.999, 1.0));
    }

    #[test]
    fn test_gate_dry_run_always_emits() {
        assert!(should_emit(true, 0.0, 1.0));
        assert!(should_emit(true, 0.0, f64::MAX));
    }

    #[test]
    fn test_gate_zero_threshold() {
        assert!(should_emit(false, 0.0, 0.0));
    }
}
