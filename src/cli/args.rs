use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::store::SchemaVariant;

#[derive(Parser)]
#[command(name = "grievance-pipeline")]
#[command(about = "Synthetic grievance dataset cleaning, KPI dashboard and workbook export")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate, load, clean, audit, report, chart and export
    Run {
        #[arg(long, help = "Seed for reproducible generation")]
        seed: Option<u64>,

        #[arg(long, value_enum)]
        schema: Option<SchemaVariant>,

        #[arg(short, long, help = "Output directory [default: output]")]
        output_dir: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Workbook path [default: <output-dir>/grievance-master-data-cleaned-{YYMMDD}.xlsx]"
        )]
        workbook: Option<PathBuf>,

        #[arg(long, help = "Skip dashboard rendering")]
        no_chart: bool,

        #[arg(long, help = "Skip workbook export")]
        no_export: bool,

        #[arg(long, help = "Print KPIs as JSON")]
        json: bool,
    },

    /// Print the data-quality audit before and after cleaning
    Profile {
        #[arg(long, help = "Seed for reproducible generation")]
        seed: Option<u64>,

        #[arg(long, value_enum)]
        schema: Option<SchemaVariant>,

        #[arg(long, help = "Print the audit as JSON")]
        json: bool,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            seed: None,
            schema: None,
            output_dir: None,
            workbook: None,
            no_chart: false,
            no_export: false,
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "grievance-pipeline",
            "--verbose",
            "run",
            "--seed",
            "42",
            "--schema",
            "standard",
            "--no-chart",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Run {
                seed,
                schema,
                no_chart,
                no_export,
                ..
            }) => {
                assert_eq!(seed, Some(42));
                assert_eq!(schema, Some(SchemaVariant::Standard));
                assert!(no_chart);
                assert!(!no_export);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["grievance-pipeline"]);
        assert!(cli.command.is_none());
    }
}
