use anyhow::Context;
use borehole_mapper::cli::{run, Cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).context("borehole map run failed")
}
