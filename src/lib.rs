pub mod alert;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod source;
pub mod statistics;


pub use alert::{should_emit, AlertPipeline};
pub use config::Config;
pub use error::{AlertError, Result};
pub use models::{AlertRecord, StatsResult};
pub use output::OutputWriter;
pub use source::PriceSource;
