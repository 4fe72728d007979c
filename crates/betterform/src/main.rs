//! Command-line playground for form schemas.

use betterform::cli::{Cli, run};
use clap::Parser;
use std::io;

fn main() -> anyhow::Result<()> {
    betterform::init_logging();
    let cli = Cli::parse();
    run(cli, &mut io::stdout().lock())
}
