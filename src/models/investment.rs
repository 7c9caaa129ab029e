use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{opt_int, text, TableRecord};
use crate::store::schema::{SchemaVariant, TableKind};

/// A budgeted community-development expenditure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SocialInvestment {
    pub investment_id: String,
    pub community_id: String,
    pub theme: String,

    #[validate(range(min = 0))]
    pub budget_usd: i64,

    /// Budget year; extended layout only.
    pub year: Option<i32>,
}

impl SocialInvestment {
    pub fn new(
        investment_id: impl Into<String>,
        community_id: impl Into<String>,
        theme: impl Into<String>,
        budget_usd: i64,
        year: Option<i32>,
    ) -> Self {
        Self {
            investment_id: investment_id.into(),
            community_id: community_id.into(),
            theme: theme.into(),
            budget_usd,
            year,
        }
    }
}

impl TableRecord for SocialInvestment {
    const KIND: TableKind = TableKind::SocialInvestments;

    fn to_row(&self, variant: SchemaVariant) -> Vec<Value> {
        let mut row = vec![
            text(&self.investment_id),
            text(&self.community_id),
            text(&self.theme),
            Value::Integer(self.budget_usd),
        ];
        if variant.is_extended() {
            row.push(opt_int(self.year.map(i64::from)));
        }
        row
    }

    fn from_row(row: &Row<'_>, variant: SchemaVariant) -> rusqlite::Result<Self> {
        let year = if variant.is_extended() {
            row.get("Year")?
        } else {
            None
        };

        Ok(Self {
            investment_id: row.get("Investment_ID")?,
            community_id: row.get("Community_ID")?,
            theme: row.get("Theme")?,
            budget_usd: row.get("Budget_USD")?,
            year,
        })
    }
}
