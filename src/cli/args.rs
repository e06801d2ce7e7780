use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "borehole-mapper")]
#[command(about = "Gauß-Krüger borehole coordinates to an interactive WGS84 map")]
#[command(version)]
pub struct Cli {
    /// Defaults to `render` with the built-in dataset configuration
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load all datasets, render the overlay map and export the combined CSV
    Render {
        #[arg(short, long, help = "Dataset configuration file (TOML, YAML or JSON)")]
        config: Option<PathBuf>,

        #[arg(short = 'm', long, help = "Output map file (overrides the configuration)")]
        output_map: Option<PathBuf>,

        #[arg(
            short = 'o',
            long,
            help = "Output CSV file [default: <map>_combined.csv]"
        )]
        output_csv: Option<PathBuf>,

        #[arg(long, help = "Leave out the satellite tile layer")]
        no_satellite: bool,

        #[arg(long, help = "Hide the progress bar")]
        quiet: bool,
    },

    /// List the sheets and columns of a source file
    Inspect {
        #[arg(short, long, help = "Spreadsheet or delimited file")]
        file: PathBuf,

        #[arg(short, long, help = "Sheet to inspect [default: first sheet]")]
        sheet: Option<String>,
    },

    /// Convert a single Gauß-Krüger coordinate to WGS84
    Convert {
        #[arg(short, long, help = "Easting (Rechtswert) in meters")]
        x: f64,

        #[arg(short, long, help = "Northing (Hochwert) in meters")]
        y: f64,

        #[arg(short, long, value_parser = clap::value_parser!(u8).range(2..=4), help = "Zone 2, 3 or 4 [default: detected from X]")]
        zone: Option<u8>,
    },
}
