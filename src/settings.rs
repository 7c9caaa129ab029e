use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

use crate::error::Result;
use crate::generators::DatasetSizes;
use crate::store::SchemaVariant;
use crate::utils::constants::{DEFAULT_OUTPUT_DIR, ENV_PREFIX, START_DAY, START_MONTH, START_YEAR};
use crate::utils::filename::generate_default_workbook_filename;

/// Run parameters.
///
/// Resolved from built-in defaults, then an optional TOML file, then
/// `GRIEVANCE_*` environment variables (nested keys use `__`, for example
/// `GRIEVANCE_SIZES__GRIEVANCES`). Command-line flags are applied last by the
/// command layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub seed: Option<u64>,
    pub schema: SchemaVariant,
    pub start_date: NaiveDate,
    pub sizes: DatasetSizes,
    pub output_dir: PathBuf,
    pub workbook: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            seed: None,
            schema: SchemaVariant::default(),
            start_date: default_start_date(),
            sizes: DatasetSizes::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            workbook: None,
        }
    }
}

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(START_YEAR, START_MONTH, START_DAY).unwrap_or(NaiveDate::MIN)
}

impl PipelineSettings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = config_file {
            debug!(path = %path.display(), "Reading settings file");
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    pub fn check(&self) -> Result<()> {
        self.sizes.validate()?;
        Ok(())
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.workbook
            .clone()
            .unwrap_or_else(|| generate_default_workbook_filename(&self.output_dir))
    }
}
