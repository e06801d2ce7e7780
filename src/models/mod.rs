pub mod cell;
pub mod dataset;
pub mod zone;

pub use cell::CellValue;
pub use dataset::{
    resolve_color, CoordinateExtent, DatasetDescriptor, DatasetStyle, ProcessedDataset,
    SurveyRecord,
};
pub use zone::{GkZone, ZoneConfidence, ZoneDetection};
