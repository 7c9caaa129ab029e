use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::analyzers::{Dashboard, KpiAnalyzer, ProfilingSnapshot};
use crate::error::Result;
use crate::generators::SyntheticGenerator;
use crate::models::Dataset;
use crate::processors::{Cleaner, CleaningReport, IntegrityChecker, IntegrityReport};
use crate::settings::PipelineSettings;
use crate::store::SqliteStore;
use crate::writers::{ChartWriter, ExportSummary, XlsxWriter};

/// Everything a run produces before the output artefacts are written.
pub struct PipelineOutcome {
    pub store: SqliteStore,
    pub raw_integrity: IntegrityReport,
    pub raw_profile: ProfilingSnapshot,
    pub cleaning: CleaningReport,
    pub clean_profile: ProfilingSnapshot,
    pub clean_integrity: IntegrityReport,
    pub dashboard: Dashboard,
}

/// Result of the workbook export. Failure is reported, never propagated.
#[derive(Debug)]
pub enum ExportOutcome {
    Exported(ExportSummary),
    Failed { path: PathBuf, message: String },
}

/// The generate, load, clean, audit and report stages of one run.
pub struct Pipeline {
    settings: PipelineSettings,
    checker: IntegrityChecker,
    analyzer: KpiAnalyzer,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            settings,
            checker: IntegrityChecker::new(),
            analyzer: KpiAnalyzer::new(),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn checker(&self) -> &IntegrityChecker {
        &self.checker
    }

    pub fn generate(&self) -> Result<Dataset> {
        let mut generator = SyntheticGenerator::new(
            self.settings.sizes,
            self.settings.start_date,
            self.settings.schema,
        );
        if let Some(seed) = self.settings.seed {
            generator = generator.with_seed(seed);
        }
        generator.generate()
    }

    pub fn load(&self, dataset: &Dataset) -> Result<SqliteStore> {
        let mut store = SqliteStore::open_in_memory(self.settings.schema)?;
        store.load_dataset(dataset)?;
        Ok(store)
    }

    pub fn audit(&self, dataset: &Dataset) -> IntegrityReport {
        self.checker.check_dataset(dataset)
    }

    pub fn profile(&self, store: &SqliteStore) -> Result<ProfilingSnapshot> {
        self.analyzer.profile(store)
    }

    pub fn clean(&self, store: &SqliteStore) -> Result<CleaningReport> {
        Cleaner::new(self.settings.schema).clean(store)
    }

    pub fn dashboard(&self, store: &SqliteStore) -> Result<Dashboard> {
        self.analyzer.dashboard(store)
    }

    /// Run every stage up to and including the KPI queries.
    pub fn execute(&self) -> Result<PipelineOutcome> {
        let raw = self.generate()?;
        let raw_integrity = self.audit(&raw);

        let store = self.load(&raw)?;
        let raw_profile = self.profile(&store)?;
        let cleaning = self.clean(&store)?;
        let clean_profile = self.profile(&store)?;

        let clean_integrity = self.audit(&store.read_dataset()?);
        if !clean_integrity.is_clean() {
            warn!(
                violations = clean_integrity.violations.len(),
                "Cleaned dataset still violates integrity rules"
            );
        }

        let dashboard = self.dashboard(&store)?;
        info!("Pipeline stages complete");

        Ok(PipelineOutcome {
            store,
            raw_integrity,
            raw_profile,
            cleaning,
            clean_profile,
            clean_integrity,
            dashboard,
        })
    }

    pub fn render_chart(&self, dashboard: &Dashboard, path: &Path) -> Result<()> {
        ChartWriter::new().render(dashboard, path)
    }

    /// Export every cleaned table. A failure here is logged and returned as
    /// `ExportOutcome::Failed`; the run carries on.
    pub fn export(&self, store: &SqliteStore, path: &Path) -> ExportOutcome {
        match XlsxWriter::new().export(store, path) {
            Ok(summary) => ExportOutcome::Exported(summary),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Workbook export failed");
                ExportOutcome::Failed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        }
    }
}
