use tracing::{debug, info};

use super::vocabulary::{CATEGORY_VOCABULARY, THEME_VOCABULARY};
use crate::error::Result;
use crate::store::{SchemaVariant, SqliteStore, TableKind};
use crate::utils::constants::{CLOSING_DATE_CORRECTION_DAYS, MAX_VALID_NOISE_DB, NOISE_REPLACEMENT_DB};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningStatement {
    pub table: TableKind,
    pub description: &'static str,
    pub sql: String,
}

#[derive(Debug, Clone, Default)]
pub struct CleaningReport {
    /// (table name, description, rows changed) in execution order.
    pub entries: Vec<(String, &'static str, usize)>,
}

impl CleaningReport {
    pub fn total_rows_changed(&self) -> usize {
        self.entries.iter().map(|(_, _, rows)| rows).sum()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::from("=== Cleaning Report ===\n");
        for (table, description, rows) in &self.entries {
            summary.push_str(&format!("  {:<26} {:<44} {:>6} rows\n", table, description, rows));
        }
        summary.push_str(&format!("Total rows changed: {}", self.total_rows_changed()));
        summary
    }
}

/// Applies the fixed, ordered list of correction statements.
pub struct Cleaner {
    variant: SchemaVariant,
    statements: Vec<CleaningStatement>,
}

impl Cleaner {
    pub fn new(variant: SchemaVariant) -> Self {
        Self {
            variant,
            statements: build_statements(variant),
        }
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn statements(&self) -> &[CleaningStatement] {
        &self.statements
    }

    /// Run every statement in order. The first failure aborts the sequence.
    pub fn clean(&self, store: &SqliteStore) -> Result<CleaningReport> {
        let mut report = CleaningReport::default();

        for statement in &self.statements {
            let rows = store.execute(&statement.sql)?;
            let table = statement.table.table_name(self.variant);
            debug!(table, rows, statement = statement.description, "Applied cleaning statement");
            report
                .entries
                .push((table.to_string(), statement.description, rows));
        }

        info!(
            statements = self.statements.len(),
            rows = report.total_rows_changed(),
            "Cleaning complete"
        );
        Ok(report)
    }
}

fn build_statements(variant: SchemaVariant) -> Vec<CleaningStatement> {
    let name = |kind: TableKind| kind.table_name(variant);
    let stmt = |table: TableKind, description: &'static str, sql: String| CleaningStatement {
        table,
        description,
        sql,
    };

    let communities = name(TableKind::Communities);
    let stakeholders = name(TableKind::Stakeholders);
    let grievances = name(TableKind::Grievances);
    let action_plans = name(TableKind::ActionPlans);
    let environment = name(TableKind::EnvironmentalMonitoring);
    let investments = name(TableKind::SocialInvestments);

    vec![
        stmt(
            TableKind::Communities,
            "trim names, uppercase prefectures",
            format!(
                "UPDATE {} SET Name = TRIM(Name), Prefecture = UPPER(Prefecture)",
                communities
            ),
        ),
        stmt(
            TableKind::Communities,
            "clamp negative population to zero",
            format!("UPDATE {} SET Population = 0 WHERE Population < 0", communities),
        ),
        stmt(
            TableKind::Stakeholders,
            "trim and uppercase names, uppercase roles",
            format!(
                "UPDATE {} SET Full_Name = TRIM(UPPER(Full_Name)), Role = UPPER(Role)",
                stakeholders
            ),
        ),
        // must precede any aggregate reading Closing_Date
        stmt(
            TableKind::Grievances,
            "reset closing dates preceding logging",
            format!(
                "UPDATE {} SET Closing_Date = date(Logged_Date, '+{} days') \
                 WHERE Closing_Date < Logged_Date",
                grievances, CLOSING_DATE_CORRECTION_DAYS
            ),
        ),
        stmt(
            TableKind::Grievances,
            "canonicalize categories",
            format!(
                "UPDATE {} SET Category = {} WHERE {}",
                grievances,
                CATEGORY_VOCABULARY.case_expression("Category"),
                CATEGORY_VOCABULARY.synonym_filter("Category")
            ),
        ),
        stmt(
            TableKind::Grievances,
            "default negative or missing costs to zero",
            format!(
                "UPDATE {} SET Estimated_Cost = 0 \
                 WHERE Estimated_Cost < 0 OR Estimated_Cost IS NULL",
                grievances
            ),
        ),
        stmt(
            TableKind::ActionPlans,
            "uppercase departments and statuses",
            format!(
                "UPDATE {} SET Department = UPPER(Department), Status = UPPER(Status)",
                action_plans
            ),
        ),
        stmt(
            TableKind::EnvironmentalMonitoring,
            "replace noise outliers",
            format!(
                "UPDATE {} SET Noise_dB = {:.1} WHERE Noise_dB > {}",
                environment, NOISE_REPLACEMENT_DB, MAX_VALID_NOISE_DB
            ),
        ),
        stmt(
            TableKind::SocialInvestments,
            "take absolute value of budgets",
            format!("UPDATE {} SET Budget_USD = ABS(Budget_USD)", investments),
        ),
        stmt(
            TableKind::SocialInvestments,
            "canonicalize themes",
            format!(
                "UPDATE {} SET Theme = {} WHERE {}",
                investments,
                THEME_VOCABULARY.case_expression("Theme"),
                THEME_VOCABULARY.synonym_filter("Theme")
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Community, Dataset, EnvironmentalSample, Grievance, SocialInvestment};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cleaned(dataset: &Dataset) -> Dataset {
        let mut store = SqliteStore::open_in_memory(dataset.variant).unwrap();
        store.load_dataset(dataset).unwrap();
        Cleaner::new(dataset.variant).clean(&store).unwrap();
        store.read_dataset().unwrap()
    }

    #[test]
    fn test_statement_order() {
        let cleaner = Cleaner::new(SchemaVariant::Standard);
        let tables: Vec<_> = cleaner.statements().iter().map(|s| s.table).collect();
        assert_eq!(tables.len(), 10);
        assert_eq!(tables[0], TableKind::Communities);
        assert_eq!(tables[9], TableKind::SocialInvestments);
        assert!(cleaner.statements()[7].sql.starts_with("UPDATE Env_Monitoring"));
        assert!(Cleaner::new(SchemaVariant::Extended).statements()[8]
            .sql
            .starts_with("UPDATE Social_Investments"));
    }

    #[test]
    fn test_population_clamped_to_zero() {
        let mut dataset = Dataset::new(SchemaVariant::Standard);
        dataset.communities = vec![
            Community::new("COM-001", " Village_B1 ", "beyla", -100, "Low"),
            Community::new("COM-002", "Village_C2", "Kindia", 4000, "High"),
        ];

        let result = cleaned(&dataset);
        assert_eq!(result.communities[0].population, 0);
        assert_eq!(result.communities[0].name, "Village_B1");
        assert_eq!(result.communities[0].prefecture, "BEYLA");
        assert_eq!(result.communities[1].population, 4000);
        assert_eq!(result.communities[1].prefecture, "KINDIA");
    }

    #[test]
    fn test_budget_takes_absolute_value() {
        let mut dataset = Dataset::new(SchemaVariant::Extended);
        dataset.social_investments = vec![
            SocialInvestment::new("SOC-0001", "COM-001", "edu", -5000, Some(2023)),
            SocialInvestment::new("SOC-0002", "COM-001", "livelihood", 120_000, Some(2024)),
        ];

        let result = cleaned(&dataset);
        assert_eq!(result.social_investments[0].budget_usd, 5000);
        assert_eq!(result.social_investments[0].theme, "Education");
        assert_eq!(result.social_investments[1].budget_usd, 120_000);
        assert_eq!(result.social_investments[1].theme, "livelihood");
    }

    #[test]
    fn test_closing_date_reset_and_category_mapped() {
        let mut dataset = Dataset::new(SchemaVariant::Standard);
        dataset.grievances = vec![
            Grievance::new(
                "GRV-00001",
                date(2023, 3, 1),
                "STK-001",
                None,
                "land",
                "High",
                "Closed",
                Some(date(2023, 2, 20)),
                Some(-500),
            ),
            Grievance::new(
                "GRV-00002",
                date(2023, 3, 1),
                "STK-001",
                None,
                "Water",
                "Low",
                "Closed",
                Some(date(2023, 4, 1)),
                None,
            ),
        ];

        let result = cleaned(&dataset);
        let first = &result.grievances[0];
        assert_eq!(first.category, "Land Access");
        assert_eq!(first.closing_date, Some(date(2023, 3, 6)));
        assert_eq!(first.estimated_cost, Some(0));

        let second = &result.grievances[1];
        assert_eq!(second.category, "Water");
        assert_eq!(second.closing_date, Some(date(2023, 4, 1)));
        assert_eq!(second.estimated_cost, Some(0));
    }

    #[test]
    fn test_noise_outlier_replaced() {
        let mut dataset = Dataset::new(SchemaVariant::Extended);
        dataset.environmental_samples = vec![
            EnvironmentalSample::new("ENV-00001", "COM-001", 155.0, Some(20.5)),
            EnvironmentalSample::new("ENV-00002", "COM-001", 120.0, Some(33.1)),
            EnvironmentalSample::new("ENV-00003", "COM-001", 64.2, None),
        ];

        let result = cleaned(&dataset);
        let noise: Vec<f64> = result
            .environmental_samples
            .iter()
            .map(|s| s.noise_db)
            .collect();
        assert_eq!(noise, vec![95.0, 120.0, 64.2]);
    }

    #[test]
    fn test_second_pass_changes_nothing_material() {
        let mut dataset = Dataset::new(SchemaVariant::Standard);
        dataset.grievances = vec![Grievance::new(
            "GRV-00001",
            date(2023, 5, 10),
            "STK-001",
            None,
            "noise",
            "Medium",
            "Closed",
            Some(date(2023, 5, 1)),
            None,
        )];

        let mut store = SqliteStore::open_in_memory(SchemaVariant::Standard).unwrap();
        store.load_dataset(&dataset).unwrap();
        let cleaner = Cleaner::new(SchemaVariant::Standard);
        cleaner.clean(&store).unwrap();
        let once = store.read_dataset().unwrap();
        cleaner.clean(&store).unwrap();
        let twice = store.read_dataset().unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.grievances[0].category, "Noise");
    }
}
