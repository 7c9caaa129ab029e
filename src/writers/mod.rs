pub mod chart_writer;
pub mod xlsx_writer;

pub use chart_writer::ChartWriter;
pub use xlsx_writer::{ExportSummary, SheetSummary, XlsxWriter};
