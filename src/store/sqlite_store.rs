use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Transaction};
use tracing::{debug, info};

use super::schema::{SchemaVariant, TableKind};
use crate::error::Result;
use crate::models::{
    ActionPlan, Community, Dataset, EnvironmentalSample, Grievance, SocialInvestment, Stakeholder,
    TableRecord,
};

/// Column names and raw values of one table, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSnapshot {
    pub table_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TableSnapshot {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Ephemeral in-memory SQLite store holding the six tables of one run.
pub struct SqliteStore {
    conn: Connection,
    variant: SchemaVariant,
}

impl SqliteStore {
    pub fn open_in_memory(variant: SchemaVariant) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, variant })
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn table_name(&self, kind: TableKind) -> &'static str {
        kind.table_name(self.variant)
    }

    /// Replace every table with the contents of `dataset`.
    pub fn load_dataset(&mut self, dataset: &Dataset) -> Result<()> {
        let variant = self.variant;
        let tx = self.conn.transaction()?;

        for kind in TableKind::ALL {
            tx.execute_batch(&kind.create_table_sql(variant))?;
        }

        insert_records(&tx, variant, &dataset.communities)?;
        insert_records(&tx, variant, &dataset.stakeholders)?;
        insert_records(&tx, variant, &dataset.grievances)?;
        insert_records(&tx, variant, &dataset.action_plans)?;
        insert_records(&tx, variant, &dataset.environmental_samples)?;
        insert_records(&tx, variant, &dataset.social_investments)?;

        tx.commit()?;

        info!(rows = dataset.total_rows(), "Loaded dataset into in-memory store");
        Ok(())
    }

    /// Typed read-back of all six tables.
    pub fn read_dataset(&self) -> Result<Dataset> {
        Ok(Dataset {
            variant: self.variant,
            communities: self.read_records::<Community>()?,
            stakeholders: self.read_records::<Stakeholder>()?,
            grievances: self.read_records::<Grievance>()?,
            action_plans: self.read_records::<ActionPlan>()?,
            environmental_samples: self.read_records::<EnvironmentalSample>()?,
            social_investments: self.read_records::<SocialInvestment>()?,
        })
    }

    pub fn read_records<R: TableRecord>(&self) -> Result<Vec<R>> {
        let sql = select_sql(R::KIND, self.variant);
        let mut stmt = self.conn.prepare(&sql)?;
        let variant = self.variant;
        let records = stmt
            .query_map([], |row| R::from_row(row, variant))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Untyped rows of one table, for export.
    pub fn table_rows(&self, kind: TableKind) -> Result<TableSnapshot> {
        let sql = select_sql(kind, self.variant);
        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let column_count = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let values = (0..column_count)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.push(values);
        }

        Ok(TableSnapshot {
            table_name: self.table_name(kind).to_string(),
            columns,
            rows,
        })
    }

    pub fn row_count(&self, kind: TableKind) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table_name(kind));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Run one statement, returning the number of rows changed.
    pub fn execute(&self, sql: &str) -> Result<usize> {
        Ok(self.conn.execute(sql, [])?)
    }
}

fn select_sql(kind: TableKind, variant: SchemaVariant) -> String {
    format!(
        "SELECT {} FROM {}",
        kind.column_names(variant).join(", "),
        kind.table_name(variant)
    )
}

fn insert_records<R: TableRecord>(
    tx: &Transaction<'_>,
    variant: SchemaVariant,
    records: &[R],
) -> Result<()> {
    let mut stmt = tx.prepare(&R::KIND.insert_sql(variant))?;
    for record in records {
        stmt.execute(params_from_iter(record.to_row(variant)))?;
    }
    debug!(
        table = R::KIND.table_name(variant),
        rows = records.len(),
        "Inserted records"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample_dataset(variant: SchemaVariant) -> Dataset {
        let logged = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let mut dataset = Dataset::new(variant);
        dataset.communities = vec![Community::new("COM-001", " Village_B1 ", "beyla", -100, "Low")];
        dataset.stakeholders = vec![Stakeholder::new(
            "STK-001",
            " stakeholder_name_1 ",
            "SAGE",
            "COM-001",
        )];
        dataset.grievances = vec![Grievance::new(
            "GRV-00001",
            logged,
            "STK-001",
            variant.is_extended().then(|| "COM-001".to_string()),
            "land",
            "High",
            "Open",
            None,
            None,
        )];
        dataset.action_plans = vec![ActionPlan::new("ACT-00001", "GRV-00001", "csp", "pending")];
        dataset.environmental_samples = vec![EnvironmentalSample::new(
            "ENV-00001",
            "COM-001",
            155.0,
            variant.is_extended().then_some(42.5),
        )];
        dataset.social_investments = vec![SocialInvestment::new(
            "SOC-0001",
            "COM-001",
            "edu",
            -5000,
            variant.is_extended().then_some(2024),
        )];
        dataset
    }

    #[test]
    fn test_load_and_read_back() {
        for variant in [SchemaVariant::Standard, SchemaVariant::Extended] {
            let dataset = sample_dataset(variant);
            let mut store = SqliteStore::open_in_memory(variant).unwrap();
            store.load_dataset(&dataset).unwrap();

            assert_eq!(store.read_dataset().unwrap(), dataset);
        }
    }

    #[test]
    fn test_reload_replaces_tables() {
        let dataset = sample_dataset(SchemaVariant::Extended);
        let mut store = SqliteStore::open_in_memory(SchemaVariant::Extended).unwrap();
        store.load_dataset(&dataset).unwrap();
        store.load_dataset(&dataset).unwrap();

        assert_eq!(store.row_count(TableKind::Communities).unwrap(), 1);
    }

    #[test]
    fn test_table_rows_preserve_column_order() {
        let dataset = sample_dataset(SchemaVariant::Extended);
        let mut store = SqliteStore::open_in_memory(SchemaVariant::Extended).unwrap();
        store.load_dataset(&dataset).unwrap();

        let snapshot = store.table_rows(TableKind::SocialInvestments).unwrap();
        assert_eq!(snapshot.table_name, "Social_Investments");
        assert_eq!(
            snapshot.columns,
            vec!["Investment_ID", "Community_ID", "Theme", "Budget_USD", "Year"]
        );
        assert_eq!(snapshot.row_count(), 1);
        assert_eq!(snapshot.rows[0][3], Value::Integer(-5000));

        let grievances = store.table_rows(TableKind::Grievances).unwrap();
        assert_eq!(grievances.rows[0][7], Value::Null);
    }
}
