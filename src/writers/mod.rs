pub mod csv_writer;
pub mod map_writer;

pub use csv_writer::CsvExporter;
pub use map_writer::{map_center, popup_html, MapRenderer};
