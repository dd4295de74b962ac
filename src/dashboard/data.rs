use crate::dashboard::DashboardError;
use crate::models::ReferenceRow;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Historical listings the dashboard compares predictions against
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    rows: Vec<ReferenceRow>,
}

impl ReferenceData {
    #[cfg(test)]
    pub fn new(rows: Vec<ReferenceRow>) -> Self {
        Self { rows }
    }

    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let file = std::fs::File::open(path).map_err(|e| DashboardError::DataLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let data = Self::from_reader(file).map_err(|e| DashboardError::DataLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!("Loaded {} reference rows from {}", data.rows.len(), path.display());
        Ok(data)
    }

    /// Parse CSV with the eight listing columns. A leading UTF-8 BOM is
    /// ignored and rows that fail to parse are skipped.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, csv::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content);
        // Fail early on a missing or unreadable header
        reader.headers()?;

        let mut rows = Vec::new();
        for (line, result) in reader.deserialize::<ReferenceRow>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => warn!("Skipping reference row {}: {}", line + 2, e),
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    /// Sorted, deduplicated neighborhood names
    pub fn neighborhoods(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.neighborhood.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows that carry a rent
    pub fn priced(&self) -> impl Iterator<Item = (&ReferenceRow, i64)> {
        self.rows
            .iter()
            .filter_map(|row| row.monthly_rent.map(|rent| (row, rent)))
    }
}
