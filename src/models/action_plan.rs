use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{text, TableRecord};
use crate::store::schema::{SchemaVariant, TableKind};

/// A remediation task raised against a grievance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ActionPlan {
    pub action_id: String,
    pub grievance_id: String,

    #[validate(length(min = 1))]
    pub department: String,

    pub status: String,
}

impl ActionPlan {
    pub fn new(
        action_id: impl Into<String>,
        grievance_id: impl Into<String>,
        department: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            grievance_id: grievance_id.into(),
            department: department.into(),
            status: status.into(),
        }
    }
}

impl TableRecord for ActionPlan {
    const KIND: TableKind = TableKind::ActionPlans;

    fn to_row(&self, _variant: SchemaVariant) -> Vec<Value> {
        vec![
            text(&self.action_id),
            text(&self.grievance_id),
            text(&self.department),
            text(&self.status),
        ]
    }

    fn from_row(row: &Row<'_>, _variant: SchemaVariant) -> rusqlite::Result<Self> {
        Ok(Self {
            action_id: row.get("Action_ID")?,
            grievance_id: row.get("Grievance_ID")?,
            department: row.get("Department")?,
            status: row.get("Status")?,
        })
    }
}
