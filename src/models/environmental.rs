use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::record::{opt_real, text, TableRecord};
use crate::store::schema::{SchemaVariant, TableKind};
use crate::utils::constants::MAX_VALID_NOISE_DB;

/// A single field measurement tied to a community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct EnvironmentalSample {
    pub sample_id: String,
    pub community_id: String,

    #[validate(range(max = 120.0))]
    pub noise_db: f64,

    /// PM10 dust concentration; extended layout only.
    pub dust_pm10: Option<f64>,
}

impl EnvironmentalSample {
    pub fn new(
        sample_id: impl Into<String>,
        community_id: impl Into<String>,
        noise_db: f64,
        dust_pm10: Option<f64>,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            community_id: community_id.into(),
            noise_db,
            dust_pm10,
        }
    }

    pub fn is_noise_outlier(&self) -> bool {
        self.noise_db > MAX_VALID_NOISE_DB
    }
}

impl TableRecord for EnvironmentalSample {
    const KIND: TableKind = TableKind::EnvironmentalMonitoring;

    fn to_row(&self, variant: SchemaVariant) -> Vec<Value> {
        let mut row = vec![
            text(&self.sample_id),
            text(&self.community_id),
            Value::Real(self.noise_db),
        ];
        if variant.is_extended() {
            row.push(opt_real(self.dust_pm10));
        }
        row
    }

    fn from_row(row: &Row<'_>, variant: SchemaVariant) -> rusqlite::Result<Self> {
        let dust_pm10 = if variant.is_extended() {
            row.get("Dust_PM10")?
        } else {
            None
        };

        Ok(Self {
            sample_id: row.get("Sample_ID")?,
            community_id: row.get("Community_ID")?,
            noise_db: row.get("Noise_dB")?,
            dust_pm10,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_range() {
        let normal = EnvironmentalSample::new("ENV-00001", "COM-001", 72.4, Some(51.25));
        assert!(!normal.is_noise_outlier());
        assert!(normal.validate().is_ok());

        let outlier = EnvironmentalSample::new("ENV-00002", "COM-001", 155.0, None);
        assert!(outlier.is_noise_outlier());
        assert!(outlier.validate().is_err());
    }
}
