use crate::utils::constants::COMBINED_CSV_SUFFIX;
use std::path::{Path, PathBuf};

/// CSV path next to a map: `boreholes.html` -> `boreholes_combined.csv`
pub fn combined_csv_path(map_path: &Path) -> PathBuf {
    let stem = map_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    map_path.with_file_name(format!("{}{}", stem, COMBINED_CSV_SUFFIX))
}

/// Human readable file size, as reported after saving outputs
pub fn format_file_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;

    if bytes >= KIB * KIB {
        format!("{:.2} MB", bytes / (KIB * KIB))
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}
