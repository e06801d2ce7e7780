pub mod constants;
pub mod filename;
pub mod html;
pub mod progress;

pub use constants::*;
pub use filename::{combined_csv_path, format_file_size};
pub use html::escape_html;
pub use progress::ProgressReporter;
