use crate::error::{ProcessingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table layout to generate and clean.
///
/// `Standard` is the lean layout; `Extended` adds a community reference on
/// grievances, a dust reading on environmental samples and a year on
/// investments, and uses the longer table names for those two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    Standard,
    #[default]
    Extended,
}

impl SchemaVariant {
    pub fn is_extended(&self) -> bool {
        matches!(self, SchemaVariant::Extended)
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::Standard => write!(f, "standard"),
            SchemaVariant::Extended => write!(f, "extended"),
        }
    }
}

impl FromStr for SchemaVariant {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(SchemaVariant::Standard),
            "extended" => Ok(SchemaVariant::Extended),
            _ => Err(ProcessingError::Config(format!(
                "Unsupported schema variant: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

impl SqlType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
}

const fn col(name: &'static str, sql_type: SqlType) -> ColumnDef {
    ColumnDef { name, sql_type }
}

/// The six tables, in load and export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableKind {
    Communities,
    Stakeholders,
    Grievances,
    ActionPlans,
    EnvironmentalMonitoring,
    SocialInvestments,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Communities,
        TableKind::Stakeholders,
        TableKind::Grievances,
        TableKind::ActionPlans,
        TableKind::EnvironmentalMonitoring,
        TableKind::SocialInvestments,
    ];

    pub fn table_name(&self, variant: SchemaVariant) -> &'static str {
        match (self, variant) {
            (TableKind::Communities, _) => "Communities",
            (TableKind::Stakeholders, _) => "Stakeholders",
            (TableKind::Grievances, _) => "Grievances",
            (TableKind::ActionPlans, _) => "Action_Plans",
            (TableKind::EnvironmentalMonitoring, SchemaVariant::Standard) => "Env_Monitoring",
            (TableKind::EnvironmentalMonitoring, SchemaVariant::Extended) => {
                "Environmental_Monitoring"
            }
            (TableKind::SocialInvestments, SchemaVariant::Standard) => "Investments",
            (TableKind::SocialInvestments, SchemaVariant::Extended) => "Social_Investments",
        }
    }

    pub fn from_table_name(name: &str, variant: SchemaVariant) -> Result<Self> {
        TableKind::ALL
            .into_iter()
            .find(|kind| kind.table_name(variant) == name)
            .ok_or_else(|| ProcessingError::UnknownTable(name.to_string()))
    }

    /// Column definitions in storage order.
    pub fn columns(&self, variant: SchemaVariant) -> Vec<ColumnDef> {
        use SqlType::*;

        let extended = variant.is_extended();
        let mut columns = match self {
            TableKind::Communities => vec![
                col("Community_ID", Text),
                col("Name", Text),
                col("Prefecture", Text),
                col("Population", Integer),
                col("Social_Risk_Level", Text),
            ],
            TableKind::Stakeholders => vec![
                col("Stakeholder_ID", Text),
                col("Full_Name", Text),
                col("Role", Text),
                col("Community_ID", Text),
            ],
            TableKind::Grievances => {
                let mut columns = vec![
                    col("Grievance_ID", Text),
                    col("Logged_Date", Text),
                    col("Stakeholder_ID", Text),
                ];
                if extended {
                    columns.push(col("Community_ID", Text));
                }
                columns.extend([
                    col("Category", Text),
                    col("Severity", Text),
                    col("Status", Text),
                    col("Closing_Date", Text),
                    col("Estimated_Cost", Integer),
                ]);
                columns
            }
            TableKind::ActionPlans => vec![
                col("Action_ID", Text),
                col("Grievance_ID", Text),
                col("Department", Text),
                col("Status", Text),
            ],
            TableKind::EnvironmentalMonitoring => vec![
                col("Sample_ID", Text),
                col("Community_ID", Text),
                col("Noise_dB", Real),
            ],
            TableKind::SocialInvestments => vec![
                col("Investment_ID", Text),
                col("Community_ID", Text),
                col("Theme", Text),
                col("Budget_USD", Integer),
            ],
        };

        if extended {
            match self {
                TableKind::EnvironmentalMonitoring => columns.push(col("Dust_PM10", Real)),
                TableKind::SocialInvestments => columns.push(col("Year", Integer)),
                _ => {}
            }
        }

        columns
    }

    pub fn column_names(&self, variant: SchemaVariant) -> Vec<&'static str> {
        self.columns(variant).into_iter().map(|c| c.name).collect()
    }

    pub fn create_table_sql(&self, variant: SchemaVariant) -> String {
        let columns = self
            .columns(variant)
            .iter()
            .map(|c| format!("{} {}", c.name, c.sql_type.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");
        let name = self.table_name(variant);
        format!(
            "DROP TABLE IF EXISTS {name};\nCREATE TABLE {name} ({columns});",
            name = name,
            columns = columns
        )
    }

    pub fn insert_sql(&self, variant: SchemaVariant) -> String {
        let names = self.column_names(variant);
        let placeholders = (1..=names.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table_name(variant),
            names.join(", "),
            placeholders
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names_per_variant() {
        assert_eq!(
            TableKind::EnvironmentalMonitoring.table_name(SchemaVariant::Standard),
            "Env_Monitoring"
        );
        assert_eq!(
            TableKind::EnvironmentalMonitoring.table_name(SchemaVariant::Extended),
            "Environmental_Monitoring"
        );
        assert_eq!(
            TableKind::SocialInvestments.table_name(SchemaVariant::Standard),
            "Investments"
        );
        assert_eq!(
            TableKind::SocialInvestments.table_name(SchemaVariant::Extended),
            "Social_Investments"
        );
    }

    #[test]
    fn test_extended_columns() {
        let standard = TableKind::Grievances.column_names(SchemaVariant::Standard);
        let extended = TableKind::Grievances.column_names(SchemaVariant::Extended);

        assert_eq!(standard.len() + 1, extended.len());
        assert_eq!(extended[3], "Community_ID");
        assert_eq!(extended.last(), Some(&"Estimated_Cost"));

        assert!(TableKind::EnvironmentalMonitoring
            .column_names(SchemaVariant::Extended)
            .contains(&"Dust_PM10"));
        assert!(!TableKind::SocialInvestments
            .column_names(SchemaVariant::Standard)
            .contains(&"Year"));
    }

    #[test]
    fn test_insert_sql_placeholders() {
        let sql = TableKind::Communities.insert_sql(SchemaVariant::Standard);
        assert_eq!(
            sql,
            "INSERT INTO Communities (Community_ID, Name, Prefecture, Population, Social_Risk_Level) VALUES (?1, ?2, ?3, ?4, ?5)"
        );
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!(
            "Extended".parse::<SchemaVariant>().unwrap(),
            SchemaVariant::Extended
        );
        assert!("wide".parse::<SchemaVariant>().is_err());
        assert_eq!(
            TableKind::from_table_name("Investments", SchemaVariant::Standard).unwrap(),
            TableKind::SocialInvestments
        );
    }
}
