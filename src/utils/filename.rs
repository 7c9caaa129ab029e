use chrono::Local;
use std::path::{Path, PathBuf};

use super::constants::{DASHBOARD_FILE, WORKBOOK_PREFIX};

/// Generate default workbook filename with format: grievance-master-data-cleaned-{YYMMDD}.xlsx
pub fn generate_default_workbook_filename(output_dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%y%m%d");
    output_dir.join(format!("{}-{}.xlsx", WORKBOOK_PREFIX, stamp))
}

pub fn dashboard_path(output_dir: &Path) -> PathBuf {
    output_dir.join(DASHBOARD_FILE)
}
