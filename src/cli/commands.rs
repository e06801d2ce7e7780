use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::GkZone;
use crate::processors::{detect_zone, Pipeline, Reprojector};
use crate::readers::{column_letter, TableReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        None => render(None, None, None, false, false),
        Some(Commands::Render {
            config,
            output_map,
            output_csv,
            no_satellite,
            quiet,
        }) => render(config.as_deref(), output_map, output_csv, no_satellite, quiet),
        Some(Commands::Inspect { file, sheet }) => inspect(&file, sheet.as_deref()),
        Some(Commands::Convert { x, y, zone }) => convert(x, y, zone),
    }
}

fn render(
    config_path: Option<&Path>,
    output_map: Option<PathBuf>,
    output_csv: Option<PathBuf>,
    no_satellite: bool,
    quiet: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => {
            info!("Configuration: {}", path.display());
            PipelineConfig::from_file(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(path) = output_map {
        config = config.with_output_map(path);
    }
    if let Some(path) = output_csv {
        config = config.with_output_csv(path);
    }
    if no_satellite {
        config = config.with_satellite_layer(false);
    }
    if quiet {
        config = config.with_progress(false);
    }

    info!("Datasets to load:");
    for (i, ds) in config.datasets.iter().enumerate() {
        info!(
            "  {}. {} (file: {}, sheet: {}, id: {}, X: {}, Y: {}, color: {})",
            i + 1,
            ds.name,
            ds.file.display(),
            ds.sheet,
            ds.id_col.as_deref().unwrap_or("-"),
            ds.x_col,
            ds.y_col,
            ds.color.as_deref().unwrap_or("palette")
        );
    }

    let report = Pipeline::new(config).run()?;
    println!("\n{}", report.summary());

    if report.fallback_zone_count() > 0 {
        warn!(
            "{} dataset(s) used the default zone; check their coordinates",
            report.fallback_zone_count()
        );
    }
    if let Some(map) = &report.map {
        println!("Open {} in your browser", map.path.display());
    }

    Ok(())
}

fn inspect(file: &Path, sheet: Option<&str>) -> Result<()> {
    let reader = TableReader::new();
    let sheets = reader.sheet_names(file)?;

    if !sheets.is_empty() {
        println!("Sheets in {}:", file.display());
        for name in &sheets {
            println!("  • {}", name);
        }
    }

    let sheet = match sheet {
        Some(name) => name.to_string(),
        None => sheets.first().cloned().unwrap_or_default(),
    };
    let table = reader.read_table(file, &sheet)?;

    if sheets.is_empty() {
        println!("\nColumns of {}:", file.display());
    } else {
        println!("\nColumns of sheet '{}':", sheet);
    }
    for (index, header) in table.headers.iter().enumerate() {
        println!("  {:>3}  {}", column_letter(index), header);
    }
    println!("\n{} data rows", table.row_count());

    Ok(())
}

fn convert(x: f64, y: f64, zone: Option<u8>) -> Result<()> {
    let zone = match zone {
        Some(number) => GkZone::from_number(number).ok_or_else(|| {
            ProcessingError::Config(format!("Unsupported zone {}; expected 2, 3 or 4", number))
        })?,
        None => {
            let detection = detect_zone(Some(x));
            if detection.is_fallback() {
                warn!("Could not determine zone from X {:.0}, using {}", x, detection.zone);
            }
            detection.zone
        }
    };

    let (lon, lat) = Reprojector::for_zone(zone)?.to_wgs84(x, y)?;

    println!("Source: {}", zone);
    println!("X: {:.2}  Y: {:.2}", x, y);
    println!("Latitude: {:.6}°  Longitude: {:.6}°", lat, lon);

    Ok(())
}
