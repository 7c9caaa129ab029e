use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{text, TableRecord};
use crate::store::schema::{SchemaVariant, TableKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Stakeholder {
    pub stakeholder_id: String,

    #[validate(length(min = 1))]
    pub full_name: String,

    pub role: String,

    pub community_id: String,
}

impl Stakeholder {
    pub fn new(
        stakeholder_id: impl Into<String>,
        full_name: impl Into<String>,
        role: impl Into<String>,
        community_id: impl Into<String>,
    ) -> Self {
        Self {
            stakeholder_id: stakeholder_id.into(),
            full_name: full_name.into(),
            role: role.into(),
            community_id: community_id.into(),
        }
    }
}

impl TableRecord for Stakeholder {
    const KIND: TableKind = TableKind::Stakeholders;

    fn to_row(&self, _variant: SchemaVariant) -> Vec<Value> {
        vec![
            text(&self.stakeholder_id),
            text(&self.full_name),
            text(&self.role),
            text(&self.community_id),
        ]
    }

    fn from_row(row: &Row<'_>, _variant: SchemaVariant) -> rusqlite::Result<Self> {
        Ok(Self {
            stakeholder_id: row.get("Stakeholder_ID")?,
            full_name: row.get("Full_Name")?,
            role: row.get("Role")?,
            community_id: row.get("Community_ID")?,
        })
    }
}
