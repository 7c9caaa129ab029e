use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::record::{opt_int, opt_text, text, TableRecord};
use crate::store::schema::{SchemaVariant, TableKind};
use crate::utils::constants::STATUS_CLOSED;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_closing_date", skip_on_field_errors = false))]
pub struct Grievance {
    pub grievance_id: String,
    pub logged_date: NaiveDate,
    pub stakeholder_id: String,

    /// Community of the reporting stakeholder; extended layout only.
    pub community_id: Option<String>,

    pub category: String,
    pub severity: String,
    pub status: String,
    pub closing_date: Option<NaiveDate>,

    #[validate(required, range(min = 0))]
    pub estimated_cost: Option<i64>,
}

fn validate_closing_date(grievance: &Grievance) -> Result<(), ValidationError> {
    match grievance.closing_date {
        Some(closing) if closing < grievance.logged_date => {
            Err(ValidationError::new("closing_before_logging"))
        }
        _ => Ok(()),
    }
}

impl Grievance {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        grievance_id: impl Into<String>,
        logged_date: NaiveDate,
        stakeholder_id: impl Into<String>,
        community_id: Option<String>,
        category: impl Into<String>,
        severity: impl Into<String>,
        status: impl Into<String>,
        closing_date: Option<NaiveDate>,
        estimated_cost: Option<i64>,
    ) -> Self {
        Self {
            grievance_id: grievance_id.into(),
            logged_date,
            stakeholder_id: stakeholder_id.into(),
            community_id,
            category: category.into(),
            severity: severity.into(),
            status: status.into(),
            closing_date,
            estimated_cost,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == STATUS_CLOSED
    }

    pub fn closes_before_logging(&self) -> bool {
        self.closing_date
            .is_some_and(|closing| closing < self.logged_date)
    }

    /// Days between logging and closing, for closed grievances.
    pub fn resolution_days(&self) -> Option<i64> {
        if !self.is_closed() {
            return None;
        }
        self.closing_date
            .map(|closing| closing.signed_duration_since(self.logged_date).num_days())
    }
}

impl TableRecord for Grievance {
    const KIND: TableKind = TableKind::Grievances;

    fn to_row(&self, variant: SchemaVariant) -> Vec<Value> {
        let mut row = vec![
            text(&self.grievance_id),
            Value::Text(self.logged_date.format("%Y-%m-%d").to_string()),
            text(&self.stakeholder_id),
        ];
        if variant.is_extended() {
            row.push(opt_text(self.community_id.as_deref()));
        }
        row.extend([
            text(&self.category),
            text(&self.severity),
            text(&self.status),
            self.closing_date
                .map_or(Value::Null, |d| Value::Text(d.format("%Y-%m-%d").to_string())),
            opt_int(self.estimated_cost),
        ]);
        row
    }

    fn from_row(row: &Row<'_>, variant: SchemaVariant) -> rusqlite::Result<Self> {
        let community_id = if variant.is_extended() {
            row.get("Community_ID")?
        } else {
            None
        };

        Ok(Self {
            grievance_id: row.get("Grievance_ID")?,
            logged_date: row.get("Logged_Date")?,
            stakeholder_id: row.get("Stakeholder_ID")?,
            community_id,
            category: row.get("Category")?,
            severity: row.get("Severity")?,
            status: row.get("Status")?,
            closing_date: row.get("Closing_Date")?,
            estimated_cost: row.get("Estimated_Cost")?,
        })
    }
}
