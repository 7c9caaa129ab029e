use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, Level};

use crate::analyzers::{Dashboard, ProfilingSnapshot};
use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::pipeline::{ExportOutcome, Pipeline};
use crate::processors::IntegrityReport;
use crate::settings::PipelineSettings;
use crate::store::SchemaVariant;
use crate::utils::filename::dashboard_path;
use crate::utils::progress::ProgressReporter;

#[derive(Serialize)]
struct RunReport<'a> {
    seed: Option<u64>,
    schema: SchemaVariant,
    before_cleaning: &'a ProfilingSnapshot,
    after_cleaning: &'a ProfilingSnapshot,
    dashboard: &'a Dashboard,
}

#[derive(Serialize)]
struct ProfileReport<'a> {
    before_cleaning: &'a ProfilingSnapshot,
    after_cleaning: &'a ProfilingSnapshot,
    raw_integrity: &'a IntegrityReport,
    clean_integrity: &'a IntegrityReport,
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = PipelineSettings::load(cli.config.as_deref())?;

    match cli.command.unwrap_or_default() {
        Commands::Run {
            seed,
            schema,
            output_dir,
            workbook,
            no_chart,
            no_export,
            json,
        } => {
            let mut settings = settings;
            if seed.is_some() {
                settings.seed = seed;
            }
            if let Some(schema) = schema {
                settings.schema = schema;
            }
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            if workbook.is_some() {
                settings.workbook = workbook;
            }
            run_pipeline(settings, !no_chart, !no_export, json, io::stdout().lock())
        }

        Commands::Profile { seed, schema, json } => {
            let mut settings = settings;
            if seed.is_some() {
                settings.seed = seed;
            }
            if let Some(schema) = schema {
                settings.schema = schema;
            }
            run_profile(settings, json, io::stdout().lock())
        }
    }
}

/// Report text sink. Status lines are dropped in `--json` mode; errors and
/// the JSON document itself are always written.
struct Console<'a, W: Write> {
    out: W,
    progress: &'a ProgressReporter,
    quiet: bool,
}

impl<'a, W: Write> Console<'a, W> {
    fn status(&mut self, message: &str) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.always(message)
    }

    fn always(&mut self, message: &str) -> Result<()> {
        let out = &mut self.out;
        self.progress.suspend(|| writeln!(out, "{}", message))?;
        Ok(())
    }
}

fn run_pipeline<W: Write>(
    settings: PipelineSettings,
    chart: bool,
    export: bool,
    json: bool,
    out: W,
) -> Result<()> {
    info!(schema = %settings.schema, seed = ?settings.seed, "Starting pipeline");

    let total_stages = 4 + usize::from(chart) + usize::from(export);
    let progress = ProgressReporter::new(total_stages, json);
    let pipeline = Pipeline::new(settings);
    let checker = pipeline.checker();

    progress.start_stage("Generating synthetic dataset...");
    let raw = pipeline.generate()?;
    let raw_integrity = pipeline.audit(&raw);
    let mut console = Console {
        out,
        progress: &progress,
        quiet: json,
    };
    console.status(&progress.stage_line(&format!("Generated {}", raw.summary())))?;
    console.status(&format!("\n{}", checker.generate_summary(&raw_integrity)))?;

    progress.start_stage("Loading into in-memory SQL store...");
    let store = pipeline.load(&raw)?;
    console.status(&progress.stage_line(&format!(
        "Loaded {} rows into {} tables",
        raw.total_rows(),
        raw.table_counts().len()
    )))?;

    progress.start_stage("Cleaning...");
    let before = pipeline.profile(&store)?;
    console.status(&format!("\nBefore cleaning:\n{}", before.summary()))?;
    let cleaning = pipeline.clean(&store)?;
    let after = pipeline.profile(&store)?;
    console.status(&format!("\n{}", cleaning.summary()))?;
    console.status(&format!("\nAfter cleaning:\n{}", after.summary()))?;

    let clean_integrity = pipeline.audit(&store.read_dataset()?);
    console.status(&progress.stage_line(&format!(
        "Cleaned: {} rows changed, {} violations remaining",
        cleaning.total_rows_changed(),
        clean_integrity.violations.len()
    )))?;

    progress.start_stage("Computing KPIs...");
    let dashboard = pipeline.dashboard(&store)?;
    console.status(&format!("\n{}", dashboard.summary()))?;
    console.status(&progress.stage_line("KPIs computed"))?;

    if chart {
        let path = dashboard_path(&pipeline.settings().output_dir);
        progress.start_stage("Rendering dashboard...");
        pipeline.render_chart(&dashboard, &path)?;
        console.status(&progress.stage_line(&format!(
            "Dashboard written to {}",
            path.display()
        )))?;
    }

    let mut export_failed = false;
    if export {
        let path = pipeline.settings().workbook_path();
        progress.start_stage("Exporting workbook...");
        match pipeline.export(&store, &path) {
            ExportOutcome::Exported(summary) => {
                console.status(&format!("\n{}", summary.summary()))?;
                console.status(&progress.stage_line(&format!(
                    "✅ Workbook saved to {}",
                    summary.path.display()
                )))?;
            }
            ExportOutcome::Failed { path, message } => {
                export_failed = true;
                console.always(&export_failure_message(&path, &message))?;
            }
        }
    }

    if json {
        let report = RunReport {
            seed: pipeline.settings().seed,
            schema: pipeline.settings().schema,
            before_cleaning: &before,
            after_cleaning: &after,
            dashboard: &dashboard,
        };
        console.always(&serde_json::to_string_pretty(&report)?)?;
    }

    if export_failed {
        progress.finish_with_message("Pipeline finished without a workbook");
    } else {
        progress.finish_with_message("Pipeline complete!");
    }
    Ok(())
}

fn run_profile<W: Write>(settings: PipelineSettings, json: bool, out: W) -> Result<()> {
    let progress = ProgressReporter::new(1, json);
    let pipeline = Pipeline::new(settings);

    progress.start_stage("Generating, loading and cleaning...");
    let outcome = pipeline.execute()?;
    let mut console = Console {
        out,
        progress: &progress,
        quiet: json,
    };

    if json {
        let report = ProfileReport {
            before_cleaning: &outcome.raw_profile,
            after_cleaning: &outcome.clean_profile,
            raw_integrity: &outcome.raw_integrity,
            clean_integrity: &outcome.clean_integrity,
        };
        return console.always(&serde_json::to_string_pretty(&report)?);
    }

    let checker = pipeline.checker();
    console.status(&progress.stage_line("Audit complete"))?;
    console.status(&format!("Before cleaning:\n{}", outcome.raw_profile.summary()))?;
    console.status(&format!("\n{}", checker.generate_summary(&outcome.raw_integrity)))?;
    console.status(&format!("\n{}", outcome.cleaning.summary()))?;
    console.status(&format!("\nAfter cleaning:\n{}", outcome.clean_profile.summary()))?;
    console.status(&format!("\n{}", checker.generate_summary(&outcome.clean_integrity)))?;

    if outcome.clean_integrity.is_clean() {
        console.status("✅ Cleaned data passed all integrity checks")
    } else {
        console.status(&format!(
            "⚠️  {} integrity issues remain after cleaning",
            outcome.clean_integrity.violations.len()
        ))
    }
}

pub fn export_failure_message(path: &Path, message: &str) -> String {
    format!(
        "❌ Export failed: {}. Check that '{}' is not open in another program.",
        message,
        path.display()
    )
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let initialized = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    initialized.map_err(|e| ProcessingError::Config(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
