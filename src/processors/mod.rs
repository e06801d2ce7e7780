pub mod cleaner;
pub mod dataset_processor;
pub mod pipeline;
pub mod report;
pub mod reprojector;
pub mod zone_detector;

pub use cleaner::{mean, CleanedTable, ColumnSelection, CoordinateCleaner};
pub use dataset_processor::DatasetProcessor;
pub use pipeline::{LoadOutcome, Pipeline};
pub use report::{DatasetSummary, OutputFile, PipelineReport, SkippedDataset};
pub use reprojector::Reprojector;
pub use zone_detector::{detect_zone, DEFAULT_ZONE};
