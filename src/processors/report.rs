use crate::models::{CoordinateExtent, GkZone, ProcessedDataset, ZoneConfidence};
use crate::utils::filename::format_file_size;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub name: String,
    pub color: String,
    pub zone: GkZone,
    pub zone_confidence: ZoneConfidence,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub points: usize,
    pub extent: Option<CoordinateExtent>,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &ProcessedDataset) -> Self {
        Self {
            name: dataset.name.clone(),
            color: dataset.style.hex.clone(),
            zone: dataset.zone.zone,
            zone_confidence: dataset.zone.confidence,
            rows_read: dataset.rows_read,
            rows_dropped: dataset.rows_dropped(),
            points: dataset.len(),
            extent: dataset.extent(),
        }
    }
}

/// A descriptor that could not be loaded, and why.
#[derive(Debug, Clone)]
pub struct SkippedDataset {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub datasets: Vec<DatasetSummary>,
    pub skipped: Vec<SkippedDataset>,
    pub center: Option<(f64, f64)>,
    pub map: Option<OutputFile>,
    pub csv: Option<OutputFile>,
    pub csv_rows: usize,
}

impl PipelineReport {
    pub fn total_points(&self) -> usize {
        self.datasets.iter().map(|d| d.points).sum()
    }

    pub fn fallback_zone_count(&self) -> usize {
        self.datasets
            .iter()
            .filter(|d| d.zone_confidence == ZoneConfidence::Fallback)
            .count()
    }

    /// Human readable run summary
    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Borehole Map Report ===\n");
        summary.push_str(&format!(
            "Datasets loaded: {} (skipped: {})\n",
            self.datasets.len(),
            self.skipped.len()
        ));

        for (i, dataset) in self.datasets.iter().enumerate() {
            let zone_note = match dataset.zone_confidence {
                ZoneConfidence::Detected => String::new(),
                ZoneConfidence::Fallback => " [zone assumed]".to_string(),
            };
            summary.push_str(&format!(
                "  {}. {}: {} points of {} rows, {} dropped ({}, EPSG:{}{})\n",
                i + 1,
                dataset.name,
                dataset.points,
                dataset.rows_read,
                dataset.rows_dropped,
                dataset.color,
                dataset.zone.epsg(),
                zone_note
            ));
        }

        for skipped in &self.skipped {
            summary.push_str(&format!("  ✗ {}: {}\n", skipped.name, skipped.reason));
        }

        summary.push_str(&format!("\nTotal: {} boreholes\n", self.total_points()));

        if let Some((lat, lon)) = self.center {
            summary.push_str(&format!("Map center: {:.4}°N, {:.4}°E\n", lat, lon));
        }

        if self.map.is_some() || self.csv.is_some() {
            summary.push_str("\nOutputs created:\n");
        }
        if let Some(map) = &self.map {
            summary.push_str(&format!(
                "  1. {} ({})\n",
                map.path.display(),
                format_file_size(map.bytes)
            ));
        }
        if let Some(csv) = &self.csv {
            summary.push_str(&format!(
                "  2. {} ({} rows)\n",
                csv.path.display(),
                self.csv_rows
            ));
        }

        summary
    }
}
