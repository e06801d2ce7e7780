use crate::error::Result;
use crate::models::ProcessedDataset;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the combined coordinate table of all datasets.
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// The `bohr_id` column appears when any dataset has an id column configured
    pub fn includes_ids(datasets: &[ProcessedDataset]) -> bool {
        datasets.iter().any(|dataset| dataset.has_id_column)
    }

    pub fn header(include_ids: bool) -> Vec<&'static str> {
        let mut header = vec!["X", "Y", "latitude", "longitude"];
        if include_ids {
            header.push("bohr_id");
        }
        header.push("dataset");
        header
    }

    /// Write (overwriting) `path`; returns the number of data rows.
    pub fn write_datasets(&self, datasets: &[ProcessedDataset], path: &Path) -> Result<usize> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let rows = self.write_to(datasets, File::create(path)?)?;
        info!("Saved {} coordinate rows to {}", rows, path.display());
        Ok(rows)
    }

    pub fn write_to<W: Write>(&self, datasets: &[ProcessedDataset], writer: W) -> Result<usize> {
        let include_ids = Self::includes_ids(datasets);
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(Self::header(include_ids))?;

        let mut rows = 0;
        for dataset in datasets {
            for record in &dataset.records {
                let mut fields = vec![
                    record.x.to_string(),
                    record.y.to_string(),
                    record.latitude.to_string(),
                    record.longitude.to_string(),
                ];
                if include_ids {
                    fields.push(record.record_id.clone().unwrap_or_default());
                }
                fields.push(dataset.name.clone());

                csv_writer.write_record(&fields)?;
                rows += 1;
            }
        }

        csv_writer.flush()?;
        Ok(rows)
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
