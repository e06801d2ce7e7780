use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::ProcessedDataset;
use crate::processors::dataset_processor::DatasetProcessor;
use crate::processors::report::{DatasetSummary, OutputFile, PipelineReport, SkippedDataset};
use crate::utils::progress::ProgressReporter;
use crate::writers::{map_center, CsvExporter, MapRenderer};
use tracing::{info, warn};

/// Datasets that loaded, and the ones that were skipped.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub datasets: Vec<ProcessedDataset>,
    pub skipped: Vec<SkippedDataset>,
}

/// Loads every configured dataset, then renders the map and the CSV.
///
/// A dataset that fails to load is skipped and the run continues; the run
/// fails only when nothing could be loaded or an output cannot be written.
pub struct Pipeline {
    config: PipelineConfig,
    processor: DatasetProcessor,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            processor: DatasetProcessor::new(),
        }
    }

    pub fn load_datasets(&self) -> LoadOutcome {
        let progress = ProgressReporter::new(
            self.config.datasets.len() as u64,
            "Reading and converting datasets...",
            !self.config.show_progress,
        );
        let mut outcome = LoadOutcome::default();

        for (position, descriptor) in self.config.datasets.iter().enumerate() {
            progress.set_message(&descriptor.name);

            match self.processor.process(descriptor, position) {
                Ok(dataset) => outcome.datasets.push(dataset),
                Err(e) => {
                    warn!("Skipping {}: {}", descriptor.name, e);
                    outcome.skipped.push(SkippedDataset {
                        name: descriptor.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            progress.increment(1);
        }

        let done = format!(
            "Loaded {} of {} datasets",
            outcome.datasets.len(),
            self.config.datasets.len()
        );
        if progress.is_silent() {
            info!("{}", done);
        } else {
            progress.finish_with_message(&done);
        }

        outcome
    }

    pub fn run(&self) -> Result<PipelineReport> {
        self.config.check()?;

        info!("Step 1: reading and converting {} datasets", self.config.datasets.len());
        let outcome = self.load_datasets();
        if outcome.datasets.is_empty() {
            return Err(ProcessingError::NoDatasetsLoaded);
        }
        info!("Successfully loaded {} datasets", outcome.datasets.len());

        let mut report = PipelineReport {
            datasets: outcome.datasets.iter().map(DatasetSummary::from_dataset).collect(),
            skipped: outcome.skipped,
            center: map_center(&outcome.datasets),
            ..PipelineReport::default()
        };
        if let Some((lat, lon)) = report.center {
            info!("Map center: {:.4}°N, {:.4}°E", lat, lon);
        }
        info!("Total points: {}", report.total_points());

        info!("Step 2: creating overlay map");
        let renderer = MapRenderer::new(&self.config.title)
            .with_satellite_layer(self.config.satellite_layer);
        let map_bytes = renderer.write_map(&outcome.datasets, &self.config.output_map)?;
        report.map = Some(OutputFile {
            path: self.config.output_map.clone(),
            bytes: map_bytes,
        });

        info!("Step 3: saving combined coordinates");
        let csv_path = self.config.csv_path();
        report.csv_rows = CsvExporter::new().write_datasets(&outcome.datasets, &csv_path)?;
        report.csv = Some(OutputFile {
            bytes: std::fs::metadata(&csv_path)?.len(),
            path: csv_path,
        });

        Ok(report)
    }
}
