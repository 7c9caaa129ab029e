use clap::Parser;
use grievance_pipeline::cli::{run, Cli};
use grievance_pipeline::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
