//! Output formatting and export of the classified view.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::band::FeeBand;
use crate::analyzers::types::LocationRecord;
use csv::WriterBuilder;
use std::fs::File;

/// One exported location with its band.
#[derive(Debug, Serialize)]
struct ClassifiedRow<'a> {
    city: &'a str,
    name: &'a str,
    address: String,
    zip: &'a str,
    installation_fee: f64,
    quarterly_fee: f64,
    band: &'static str,
}

impl<'a> ClassifiedRow<'a> {
    fn new(record: &'a LocationRecord, band: FeeBand) -> Self {
        Self {
            city: &record.city,
            name: record.name.as_deref().unwrap_or("N/A"),
            address: record.address(),
            zip: record.zip.as_deref().unwrap_or(""),
            installation_fee: record.installation_fee,
            quarterly_fee: record.quarterly_fee,
            band: band.label(),
        }
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes classified locations to a CSV file, replacing any existing file.
pub fn write_classified_csv(path: &str, rows: &[(&LocationRecord, FeeBand)]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing classified locations");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for (record, band) in rows {
        writer.serialize(ClassifiedRow::new(record, *band))?;
    }
    writer.flush()?;

    Ok(())
}
