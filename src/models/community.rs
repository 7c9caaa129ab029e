use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{text, TableRecord};
use crate::store::schema::{SchemaVariant, TableKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Community {
    pub community_id: String,

    #[validate(length(min = 1))]
    pub name: String,

    pub prefecture: String,

    #[validate(range(min = 0))]
    pub population: i64,

    pub social_risk_level: String,
}

impl Community {
    pub fn new(
        community_id: impl Into<String>,
        name: impl Into<String>,
        prefecture: impl Into<String>,
        population: i64,
        social_risk_level: impl Into<String>,
    ) -> Self {
        Self {
            community_id: community_id.into(),
            name: name.into(),
            prefecture: prefecture.into(),
            population,
            social_risk_level: social_risk_level.into(),
        }
    }
}

impl TableRecord for Community {
    const KIND: TableKind = TableKind::Communities;

    fn to_row(&self, _variant: SchemaVariant) -> Vec<Value> {
        vec![
            text(&self.community_id),
            text(&self.name),
            text(&self.prefecture),
            Value::Integer(self.population),
            text(&self.social_risk_level),
        ]
    }

    fn from_row(row: &Row<'_>, _variant: SchemaVariant) -> rusqlite::Result<Self> {
        Ok(Self {
            community_id: row.get("Community_ID")?,
            name: row.get("Name")?,
            prefecture: row.get("Prefecture")?,
            population: row.get("Population")?,
            social_risk_level: row.get("Social_Risk_Level")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_validation() {
        let valid = Community::new("COM-001", "Village_B1", "BEYLA", 4000, "Low");
        assert!(valid.validate().is_ok());

        let negative = Community::new("COM-002", "Village_C2", "KINDIA", -100, "High");
        assert!(negative.validate().is_err());
    }
}
