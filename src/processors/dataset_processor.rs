use crate::error::Result;
use crate::models::{DatasetDescriptor, DatasetStyle, ProcessedDataset};
use crate::processors::cleaner::{mean, ColumnSelection, CoordinateCleaner};
use crate::processors::reprojector::Reprojector;
use crate::processors::zone_detector::detect_zone;
use crate::readers::{resolve_column, SourceTable, TableReader};
use tracing::{debug, info, warn};

/// Runs load → clean → detect zone → reproject for one descriptor.
pub struct DatasetProcessor {
    reader: TableReader,
}

impl DatasetProcessor {
    pub fn new() -> Self {
        Self {
            reader: TableReader::new(),
        }
    }

    pub fn with_reader(reader: TableReader) -> Self {
        Self { reader }
    }

    /// Process the descriptor at `position` in the configuration.
    ///
    /// Unreadable sources, unresolvable X/Y columns and transform failures are
    /// errors for this dataset; an unresolvable id column only drops the ids.
    pub fn process(&self, descriptor: &DatasetDescriptor, position: usize) -> Result<ProcessedDataset> {
        let table = self.reader.read_table(&descriptor.file, &descriptor.sheet)?;
        info!(
            "{}: loaded {} rows from {} [{}]",
            descriptor.name,
            table.row_count(),
            descriptor.file.display(),
            descriptor.sheet
        );
        debug!("{}: columns {:?}", descriptor.name, table.headers);

        let columns = self.select_columns(descriptor, &table)?;
        let mut cleaned = CoordinateCleaner::clean(&table, columns);
        info!(
            "{}: {} valid coordinates ({} rows dropped)",
            descriptor.name,
            cleaned.records.len(),
            cleaned.rows_dropped()
        );

        let detection = detect_zone(mean(cleaned.records.iter().map(|r| r.x)));
        if detection.is_fallback() {
            match detection.mean_x {
                Some(mean_x) => warn!(
                    "{}: could not determine zone (X mean: {:.0}), using {}",
                    descriptor.name, mean_x, detection.zone
                ),
                None => warn!(
                    "{}: no coordinates to determine zone, using {}",
                    descriptor.name, detection.zone
                ),
            }
        } else {
            info!("{}: detected {}", descriptor.name, detection.zone);
        }

        let reprojector = Reprojector::for_zone(detection.zone)?;
        reprojector.reproject_records(&mut cleaned.records)?;

        let style = DatasetStyle::assign(position, descriptor.color.as_deref());
        if let Some(color) = descriptor.color.as_deref() {
            if crate::models::resolve_color(color).is_none() {
                warn!(
                    "{}: unknown color '{}', using palette color {}",
                    descriptor.name, color, style.hex
                );
            }
        }

        let dataset = ProcessedDataset {
            name: descriptor.name.clone(),
            source: descriptor.file.clone(),
            sheet: descriptor.sheet.clone(),
            style,
            zone: detection,
            has_id_column: descriptor.id_col.is_some(),
            popup_columns: cleaned.popup_columns,
            records: cleaned.records,
            rows_read: cleaned.rows_read,
        };

        if let Some(extent) = dataset.extent() {
            info!(
                "{}: X {:.0}..{:.0}, Y {:.0}..{:.0}",
                dataset.name, extent.min_x, extent.max_x, extent.min_y, extent.max_y
            );
            info!(
                "{}: lat {:.4}..{:.4}, lon {:.4}..{:.4}",
                dataset.name, extent.min_lat, extent.max_lat, extent.min_lon, extent.max_lon
            );
        }

        Ok(dataset)
    }

    fn select_columns(&self, descriptor: &DatasetDescriptor, table: &SourceTable) -> Result<ColumnSelection> {
        let x = resolve_column(&table.headers, &descriptor.x_col)?;
        let y = resolve_column(&table.headers, &descriptor.y_col)?;
        debug!(
            "{}: X column '{}', Y column '{}'",
            descriptor.name, table.headers[x], table.headers[y]
        );

        let id = match descriptor.id_col.as_deref() {
            Some(reference) => match resolve_column(&table.headers, reference) {
                Ok(index) => Some(index),
                Err(e) => {
                    warn!("{}: id column unavailable, continuing without ids: {}", descriptor.name, e);
                    None
                }
            },
            None => None,
        };

        Ok(ColumnSelection { x, y, id })
    }
}

impl Default for DatasetProcessor {
    fn default() -> Self {
        Self::new()
    }
}
