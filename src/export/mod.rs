//! CSV output of a collection run and the run summary logged after it.

use crate::models::{ListingRecord, ReferenceRow};
use chrono::{DateTime, TimeZone};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Column header of the output file, in order
pub const CSV_COLUMNS: [&str; 8] = [
    "quartier",
    "superficie",
    "nombre_chambres",
    "douche_wc",
    "type_d_acces",
    "meublé",
    "etat_general",
    "loyer_mensuel",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Could not create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// `facebook_marketplace_<YYYYMMDD_HHMMSS>.csv`
pub fn output_filename<Tz: TimeZone>(captured_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "facebook_marketplace_{}.csv",
        captured_at.format("%Y%m%d_%H%M%S")
    )
}

/// Write the eight structured columns of `records` to a new timestamped file
/// in `output_dir` and return its path. The directory is created if needed.
pub fn write_listings_csv<Tz: TimeZone>(
    records: &[ListingRecord],
    output_dir: &Path,
    captured_at: &DateTime<Tz>,
) -> Result<PathBuf, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    fs::create_dir_all(output_dir).map_err(|source| ExportError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(output_filename(captured_at));
    let mut file = BufWriter::new(File::create(&path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.serialize(ReferenceRow::from(record))?;
    }
    writer.flush()?;

    info!("💾 Saved {} listings to {}", records.len(), path.display());
    Ok(path)
}

/// count / mean / min / max of one numeric column, over non-empty values
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub min: i64,
    pub max: i64,
}

impl ColumnSummary {
    fn from_values(values: impl IntoIterator<Item = i64>) -> Option<Self> {
        let values: Vec<i64> = values.into_iter().collect();
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;
        Some(Self {
            count: values.len(),
            mean: values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64,
            min,
            max,
        })
    }
}

/// Overview of a collection run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub area: Option<ColumnSummary>,
    pub rooms: Option<ColumnSummary>,
    pub rent: Option<ColumnSummary>,
    pub by_neighborhood: BTreeMap<String, usize>,
}

impl RunSummary {
    pub fn new(records: &[ListingRecord]) -> Self {
        let mut by_neighborhood = BTreeMap::new();
        for record in records {
            *by_neighborhood.entry(record.neighborhood.clone()).or_insert(0) += 1;
        }

        Self {
            total: records.len(),
            area: ColumnSummary::from_values(records.iter().filter_map(|r| r.area_sqm.map(i64::from))),
            rooms: ColumnSummary::from_values(records.iter().filter_map(|r| r.room_count.map(i64::from))),
            rent: ColumnSummary::from_values(records.iter().filter_map(|r| r.monthly_rent)),
            by_neighborhood,
        }
    }

    pub fn log(&self) {
        info!("Listings collected: {}", self.total);
        for (name, column) in [("superficie", &self.area), ("nombre_chambres", &self.rooms), ("loyer_mensuel", &self.rent)] {
            match column {
                Some(s) => info!(
                    "  {}: count={} mean={:.1} min={} max={}",
                    name, s.count, s.mean, s.min, s.max
                ),
                None => info!("  {}: no values", name),
            }
        }
        info!("Listings per neighborhood:");
        for (neighborhood, count) in &self.by_neighborhood {
            info!("  {}: {}", neighborhood, count);
        }
    }
}
