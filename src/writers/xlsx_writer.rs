use rusqlite::types::Value;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::store::{SqliteStore, TableKind, TableSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub name: String,
    pub columns: usize,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub sheets: Vec<SheetSummary>,
}

impl ExportSummary {
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows).sum()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("Workbook: {}\n", self.path.display());
        for sheet in &self.sheets {
            summary.push_str(&format!(
                "  {:<26} {:>6} rows x {} columns\n",
                sheet.name, sheet.rows, sheet.columns
            ));
        }
        summary.push_str(&format!("Total rows exported: {}", self.total_rows()));
        summary
    }
}

/// Writes each store table to its own worksheet of one workbook.
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, store: &SqliteStore, path: &Path) -> Result<ExportSummary> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut workbook = Workbook::new();
        let mut sheets = Vec::with_capacity(TableKind::ALL.len());

        for kind in TableKind::ALL {
            let snapshot = store.table_rows(kind)?;
            let worksheet = workbook.add_worksheet();
            self.write_sheet(worksheet, &snapshot)?;
            sheets.push(SheetSummary {
                name: snapshot.table_name.clone(),
                columns: snapshot.columns.len(),
                rows: snapshot.row_count(),
            });
        }

        workbook.save(path)?;

        let summary = ExportSummary {
            path: path.to_path_buf(),
            sheets,
        };
        info!(
            path = %path.display(),
            rows = summary.total_rows(),
            "Exported cleaned tables"
        );
        Ok(summary)
    }

    fn write_sheet(&self, worksheet: &mut Worksheet, snapshot: &TableSnapshot) -> Result<()> {
        worksheet.set_name(&snapshot.table_name)?;

        let header_format = Format::new().set_bold();

        for (col, name) in snapshot.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
        }

        for (i, row) in snapshot.rows.iter().enumerate() {
            let row_num = (i + 1) as u32;
            for (col, value) in row.iter().enumerate() {
                let col_num = col as u16;
                match value {
                    Value::Null => {}
                    Value::Integer(n) => {
                        worksheet.write_number(row_num, col_num, *n as f64)?;
                    }
                    Value::Real(x) => {
                        worksheet.write_number(row_num, col_num, *x)?;
                    }
                    Value::Text(s) => {
                        worksheet.write_string(row_num, col_num, s)?;
                    }
                    Value::Blob(bytes) => {
                        worksheet.write_string(row_num, col_num, &format!("<{} bytes>", bytes.len()))?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new()
    }
}
