use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use deviation_alert::cli::Args;
use deviation_alert::{AlertPipeline, Config, OutputWriter};
use dotenv::dotenv;
use std::io;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level.tracing_level())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_args(args)?;
    info!(
        "Evaluating {} from {} (threshold {:.1})",
        config.chain.to_uppercase(),
        config.source.name(),
        config.threshold
    );
    debug!("Configuration: {:?}", config);

    let writer = OutputWriter::new(config.output_format);
    let pipeline = AlertPipeline::new(config);

    if let Some(record) = pipeline.run(Utc::now()).await {
        writer.write(&mut io::stdout().lock(), &record)?;
    }

    Ok(())
}
