use crate::error::{ProcessingError, Result};
use crate::models::DatasetDescriptor;
use crate::utils::constants::{DEFAULT_MAP_FILE, DEFAULT_MAP_TITLE};
use crate::utils::filename::combined_csv_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

const ALL_POINTS_WORKBOOK: &str =
    r"Z:\08_KI-explorer\2022_T_DATA_LIAG\all_temp_Points_vis\25-03-19_Dateiverzeichnis_Bohrungen.xlsx";
const SVZ_WORKBOOK: &str =
    r"Z:\08_KI-explorer\2022_T_DATA_LIAG\all_temp_Points_vis\Bohrungen mit SVZ.xlsx";

/// Everything a pipeline run needs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    #[serde(default = "default_title")]
    #[validate(length(min = 1))]
    pub title: String,

    #[serde(default = "default_output_map")]
    pub output_map: PathBuf,

    /// Defaults to the map path with `.html` replaced by `_combined.csv`
    #[serde(default)]
    pub output_csv: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub satellite_layer: bool,

    #[serde(default = "default_true")]
    pub show_progress: bool,

    #[validate(length(min = 1), nested)]
    pub datasets: Vec<DatasetDescriptor>,
}

fn default_title() -> String {
    DEFAULT_MAP_TITLE.to_string()
}

fn default_output_map() -> PathBuf {
    PathBuf::from(DEFAULT_MAP_FILE)
}

fn default_true() -> bool {
    true
}

impl PipelineConfig {
    pub fn new(datasets: Vec<DatasetDescriptor>) -> Self {
        Self {
            title: default_title(),
            output_map: default_output_map(),
            output_csv: None,
            satellite_layer: true,
            show_progress: true,
            datasets,
        }
    }

    /// Load a TOML, YAML or JSON file (format from the extension).
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    pub fn with_output_map(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_map = path.into();
        self
    }

    pub fn with_output_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_csv = Some(path.into());
        self
    }

    pub fn with_satellite_layer(mut self, enabled: bool) -> Self {
        self.satellite_layer = enabled;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_csv
            .clone()
            .unwrap_or_else(|| combined_csv_path(&self.output_map))
    }

    /// Field validation plus cross-field checks.
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.output_map.as_os_str().is_empty() {
            return Err(ProcessingError::Config("output map path is empty".to_string()));
        }
        if let Some(descriptor) = self
            .datasets
            .iter()
            .find(|descriptor| descriptor.file.as_os_str().is_empty())
        {
            return Err(ProcessingError::Config(format!(
                "dataset '{}' has no source file",
                descriptor.name
            )));
        }
        if self.csv_path() == self.output_map {
            return Err(ProcessingError::Config(
                "CSV output would overwrite the map output".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    /// The borehole overview: all points plus the SVZ, log and core subsets.
    fn default() -> Self {
        Self::new(vec![
            DatasetDescriptor::new(ALL_POINTS_WORKBOOK, "Geo_Koordinaten", "C", "D", "All Points")
                .with_id_col("B")
                .with_color("blue"),
            DatasetDescriptor::new(SVZ_WORKBOOK, "SVZ", "C", "D", "SVZ")
                .with_id_col("B")
                .with_color("red"),
            DatasetDescriptor::new(SVZ_WORKBOOK, "Log", "C", "D", "Log")
                .with_id_col("B")
                .with_color("green"),
            DatasetDescriptor::new(SVZ_WORKBOOK, "Bohrkern", "C", "D", "Bohrkern")
                .with_id_col("B")
                .with_color("purple"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.datasets.len(), 4);
        assert_eq!(
            config.csv_path(),
            PathBuf::from("German_Boreholes_Map_combined.csv")
        );
    }

    #[test]
    fn test_empty_dataset_list_is_rejected() {
        let config = PipelineConfig::new(vec![]);
        assert!(matches!(config.check(), Err(ProcessingError::Validation(_))));
    }

    #[test]
    fn test_blank_column_reference_is_rejected() {
        let config = PipelineConfig::new(vec![DatasetDescriptor::new(
            "points.xlsx",
            "Geo",
            "",
            "D",
            "Points",
        )]);
        assert!(config.check().is_err());
    }

    #[test]
    fn test_csv_must_not_overwrite_map() {
        let config = PipelineConfig::default()
            .with_output_map("out.html")
            .with_output_csv("out.html");
        assert!(matches!(config.check(), Err(ProcessingError::Config(_))));
    }

    #[test]
    fn test_from_toml_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(
            file,
            r##"
title = "Bohrungen"
output_map = "boreholes.html"
satellite_layer = false

[[datasets]]
file = "points.xlsx"
sheet = "Geo_Koordinaten"
id_col = "B"
x_col = "Rechtswert"
y_col = "Hochwert"
name = "All Points"
color = "#336699"
"##
        )?;

        let config = PipelineConfig::from_file(file.path())?;

        assert_eq!(config.title, "Bohrungen");
        assert!(!config.satellite_layer);
        assert!(config.show_progress);
        assert_eq!(config.csv_path(), PathBuf::from("boreholes_combined.csv"));
        assert_eq!(config.datasets[0].x_col, "Rechtswert");
        assert_eq!(config.datasets[0].color.as_deref(), Some("#336699"));
        Ok(())
    }
}
