pub mod constants;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use filename::{dashboard_path, generate_default_workbook_filename};
pub use progress::ProgressReporter;
