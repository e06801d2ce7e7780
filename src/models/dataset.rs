use crate::models::{CellValue, ZoneDetection};
use crate::utils::constants::{DEFAULT_PALETTE, NAMED_COLORS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// One source sheet to load and how to draw it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatasetDescriptor {
    pub file: PathBuf,

    #[validate(length(min = 1))]
    pub sheet: String,

    #[serde(default)]
    pub id_col: Option<String>,

    #[validate(length(min = 1))]
    pub x_col: String,

    #[validate(length(min = 1))]
    pub y_col: String,

    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default)]
    pub color: Option<String>,
}

impl DatasetDescriptor {
    pub fn new(file: impl Into<PathBuf>, sheet: &str, x_col: &str, y_col: &str, name: &str) -> Self {
        Self {
            file: file.into(),
            sheet: sheet.to_string(),
            id_col: None,
            x_col: x_col.to_string(),
            y_col: y_col.to_string(),
            name: name.to_string(),
            color: None,
        }
    }

    pub fn with_id_col(mut self, id_col: &str) -> Self {
        self.id_col = Some(id_col.to_string());
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }
}

/// The single color assignment of a dataset, shared by markers, legend and title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetStyle {
    pub hex: String,
}

impl DatasetStyle {
    /// Configured color when recognised, otherwise the palette entry for `position`.
    pub fn assign(position: usize, configured: Option<&str>) -> Self {
        match configured.and_then(resolve_color) {
            Some(hex) => Self { hex },
            None => Self::from_palette(position),
        }
    }

    pub fn from_palette(position: usize) -> Self {
        Self {
            hex: DEFAULT_PALETTE[position % DEFAULT_PALETTE.len()].to_string(),
        }
    }
}

/// Map a color name or `#RRGGBB` value to a normalised hex color.
pub fn resolve_color(color: &str) -> Option<String> {
    let color = color.trim();

    if let Some(digits) = color.strip_prefix('#') {
        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Some(format!("#{}", digits.to_ascii_uppercase()));
        }
        return None;
    }

    let lowered = color.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, hex)| hex.to_string())
}

/// Extent of the coordinates of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinateExtent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl CoordinateExtent {
    /// `None` for an empty record set.
    pub fn from_records(records: &[SurveyRecord]) -> Option<Self> {
        let first = records.first()?;
        let mut extent = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };

        for record in &records[1..] {
            extent.min_x = extent.min_x.min(record.x);
            extent.max_x = extent.max_x.max(record.x);
            extent.min_y = extent.min_y.min(record.y);
            extent.max_y = extent.max_y.max(record.y);
            extent.min_lat = extent.min_lat.min(record.latitude);
            extent.max_lat = extent.max_lat.max(record.latitude);
            extent.min_lon = extent.min_lon.min(record.longitude);
            extent.max_lon = extent.max_lon.max(record.longitude);
        }

        Some(extent)
    }
}

/// One surviving source row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyRecord {
    pub record_id: Option<String>,
    pub x: f64,
    pub y: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Values aligned with `ProcessedDataset::popup_columns`
    pub attributes: Vec<CellValue>,
}

impl SurveyRecord {
    /// A cleaned record that has not been reprojected yet.
    pub fn projected(record_id: Option<String>, x: f64, y: f64, attributes: Vec<CellValue>) -> Self {
        Self {
            record_id,
            x,
            y,
            latitude: f64::NAN,
            longitude: f64::NAN,
            attributes,
        }
    }
}

/// A fully processed dataset, ready for rendering and export.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDataset {
    pub name: String,
    pub source: PathBuf,
    pub sheet: String,
    pub style: DatasetStyle,
    pub zone: ZoneDetection,
    pub has_id_column: bool,
    pub popup_columns: Vec<String>,
    pub records: Vec<SurveyRecord>,
    pub rows_read: usize,
}

impl ProcessedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.records.len()
    }

    pub fn extent(&self) -> Option<CoordinateExtent> {
        CoordinateExtent::from_records(&self.records)
    }

    /// Popup attributes that are present for `record`, in column order.
    pub fn visible_attributes<'a>(
        &'a self,
        record: &'a SurveyRecord,
    ) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.popup_columns
            .iter()
            .zip(&record.attributes)
            .filter(|(_, value)| !value.is_missing())
            .map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GkZone, ZoneConfidence};

    fn record(x: f64, y: f64, lat: f64, lon: f64) -> SurveyRecord {
        SurveyRecord {
            record_id: None,
            x,
            y,
            latitude: lat,
            longitude: lon,
            attributes: vec![],
        }
    }

    #[test]
    fn test_style_assignment() {
        assert_eq!(DatasetStyle::assign(0, Some("red")).hex, "#FF0000");
        assert_eq!(DatasetStyle::assign(0, Some("#a1b2c3")).hex, "#A1B2C3");
        assert_eq!(DatasetStyle::assign(1, None).hex, "#FF0000");
        assert_eq!(DatasetStyle::assign(5, Some("chartreuse")).hex, "#FF0000");
        assert_eq!(DatasetStyle::from_palette(4).hex, "#0066CC");
    }

    #[test]
    fn test_resolve_color() {
        assert_eq!(resolve_color("Purple"), Some("#9933FF".to_string()));
        assert_eq!(resolve_color("#12345"), None);
        assert_eq!(resolve_color("#GGGGGG"), None);
    }

    #[test]
    fn test_extent() {
        let records = vec![
            record(3_450_000.0, 5_800_000.0, 52.3, 8.3),
            record(3_460_000.0, 5_801_000.0, 52.31, 8.4),
        ];
        let extent = CoordinateExtent::from_records(&records).unwrap();

        assert_eq!(extent.min_x, 3_450_000.0);
        assert_eq!(extent.max_y, 5_801_000.0);
        assert_eq!(extent.max_lon, 8.4);
        assert!(CoordinateExtent::from_records(&[]).is_none());
    }

    #[test]
    fn test_visible_attributes_skip_missing() {
        let dataset = ProcessedDataset {
            name: "SVZ".to_string(),
            source: PathBuf::from("svz.xlsx"),
            sheet: "SVZ".to_string(),
            style: DatasetStyle::from_palette(0),
            zone: ZoneDetection {
                zone: GkZone::Zone3,
                mean_x: Some(3_450_000.0),
                confidence: ZoneConfidence::Detected,
            },
            has_id_column: false,
            popup_columns: vec!["Depth".to_string(), "Comment".to_string()],
            records: vec![SurveyRecord {
                attributes: vec![CellValue::Number(120.0), CellValue::Empty],
                ..record(3_450_000.0, 5_800_000.0, 52.3, 8.3)
            }],
            rows_read: 3,
        };

        let visible: Vec<_> = dataset.visible_attributes(&dataset.records[0]).collect();
        assert_eq!(visible, vec![("Depth", &CellValue::Number(120.0))]);
        assert_eq!(dataset.rows_dropped(), 2);
    }
}
