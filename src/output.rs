use crate::config::OutputFormat;
use crate::error::Result;
use crate::models::AlertRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;

pub const NOT_IMPLEMENTED_NOTICE: &str = "NOT IMPLEMENTED.  Please use \"--output-format=json\".";

/// ISO-8601 with second precision and the zone's offset, e.g. `2024-01-15T07:00:00-05:00`.
pub fn format_timestamp(now: DateTime<Utc>, tz: Tz) -> String {
    now.with_timezone(&tz).to_rfc3339_opts(SecondsFormat::Secs, false)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Text(String),
    NotImplemented(OutputFormat),
}

impl OutputFormat {
    pub fn encode(&self, record: &AlertRecord) -> Result<Encoded> {
        match self {
            OutputFormat::Json => to_json(record).map(Encoded::Text),
            // TODO: yaml and prometheus exposition encoders
            OutputFormat::Yaml | OutputFormat::Prometheus => Ok(Encoded::NotImplemented(*self)),
        }
    }
}

fn to_json(record: &AlertRecord) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    record.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn write<W: Write>(&self, out: &mut W, record: &AlertRecord) -> Result<()> {
        match self.format.encode(record)? {
            Encoded::Text(text) => writeln!(out, "{}", text)?,
            Encoded::NotImplemented(_) => writeln!(out, "{}", NOT_IMPLEMENTED_NOTICE)?,
        }
        out.flush()?;
        Ok(())
    }
}
