use crate::models::{CellValue, SurveyRecord};
use crate::readers::SourceTable;
use crate::utils::constants::RESERVED_COLUMNS;

/// Resolved column positions of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSelection {
    pub x: usize,
    pub y: usize,
    pub id: Option<usize>,
}

impl ColumnSelection {
    fn is_source_column(&self, index: usize) -> bool {
        index == self.x || index == self.y || self.id == Some(index)
    }
}

/// Result of filtering a table down to rows with numeric coordinates.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub popup_columns: Vec<String>,
    pub records: Vec<SurveyRecord>,
    pub rows_read: usize,
}

impl CleanedTable {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.records.len()
    }
}

pub struct CoordinateCleaner;

impl CoordinateCleaner {
    /// Keep rows whose X and Y both coerce to numbers, in source order.
    ///
    /// Popup columns are every column except the selected source columns and
    /// the names the pipeline itself produces.
    pub fn clean(table: &SourceTable, columns: ColumnSelection) -> CleanedTable {
        let popup_indices: Vec<usize> = (0..table.column_count())
            .filter(|&index| {
                !columns.is_source_column(index)
                    && !RESERVED_COLUMNS.contains(&table.headers[index].as_str())
            })
            .collect();

        let popup_columns = popup_indices
            .iter()
            .map(|&index| table.headers[index].clone())
            .collect();

        let records = table
            .rows
            .iter()
            .filter_map(|row| {
                let x = row[columns.x].as_coordinate()?;
                let y = row[columns.y].as_coordinate()?;
                let record_id = columns.id.and_then(|index| row[index].as_label());
                let attributes: Vec<CellValue> =
                    popup_indices.iter().map(|&index| row[index].clone()).collect();

                Some(SurveyRecord::projected(record_id, x, y, attributes))
            })
            .collect();

        CleanedTable {
            popup_columns,
            records,
            rows_read: table.row_count(),
        }
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    (count > 0).then(|| sum / count as f64)
}
