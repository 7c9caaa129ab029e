use serde::{Deserialize, Serialize};

use super::{ActionPlan, Community, EnvironmentalSample, Grievance, SocialInvestment, Stakeholder};
use crate::store::schema::{SchemaVariant, TableKind};

/// The six tables of one run, held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub variant: SchemaVariant,
    pub communities: Vec<Community>,
    pub stakeholders: Vec<Stakeholder>,
    pub grievances: Vec<Grievance>,
    pub action_plans: Vec<ActionPlan>,
    pub environmental_samples: Vec<EnvironmentalSample>,
    pub social_investments: Vec<SocialInvestment>,
}

impl Dataset {
    pub fn new(variant: SchemaVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn row_count(&self, kind: TableKind) -> usize {
        match kind {
            TableKind::Communities => self.communities.len(),
            TableKind::Stakeholders => self.stakeholders.len(),
            TableKind::Grievances => self.grievances.len(),
            TableKind::ActionPlans => self.action_plans.len(),
            TableKind::EnvironmentalMonitoring => self.environmental_samples.len(),
            TableKind::SocialInvestments => self.social_investments.len(),
        }
    }

    /// Row counts in export order.
    pub fn table_counts(&self) -> Vec<(TableKind, usize)> {
        TableKind::ALL
            .into_iter()
            .map(|kind| (kind, self.row_count(kind)))
            .collect()
    }

    pub fn total_rows(&self) -> usize {
        TableKind::ALL.iter().map(|kind| self.row_count(*kind)).sum()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        for (kind, count) in self.table_counts() {
            summary.push_str(&format!(
                "  {:<26} {:>6} rows\n",
                kind.table_name(self.variant),
                count
            ));
        }
        summary.push_str(&format!("  {:<26} {:>6} rows", "Total", self.total_rows()));
        summary
    }
}
