use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::error::Result;
use crate::store::{SqliteStore, TableKind};
use crate::utils::constants::{MAX_VALID_NOISE_DB, STATUS_CLOSED};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionTime {
    pub category: String,
    pub avg_days: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefectureInvestment {
    pub prefecture: String,
    /// `None` when no investment references a community of the prefecture.
    pub invest_musd: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Grievance counts pivoted to category rows and severity columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskMatrix {
    pub categories: Vec<String>,
    pub severities: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl RiskMatrix {
    /// Pivot (category, severity, count) triples. Missing cells read 0.
    pub fn from_triples(triples: &[(String, String, u64)]) -> Self {
        let categories: BTreeSet<&str> = triples.iter().map(|(c, _, _)| c.as_str()).collect();
        let severities: BTreeSet<&str> = triples.iter().map(|(_, s, _)| s.as_str()).collect();

        let cells: BTreeMap<(&str, &str), u64> = triples
            .iter()
            .map(|(c, s, n)| ((c.as_str(), s.as_str()), *n))
            .collect();

        let counts = categories
            .iter()
            .map(|c| {
                severities
                    .iter()
                    .map(|s| cells.get(&(*c, *s)).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Self {
            categories: categories.into_iter().map(str::to_string).collect(),
            severities: severities.into_iter().map(str::to_string).collect(),
            counts,
        }
    }

    pub fn get(&self, category: &str, severity: &str) -> Option<u64> {
        let row = self.categories.iter().position(|c| c == category)?;
        let col = self.severities.iter().position(|s| s == severity)?;
        Some(self.counts[row][col])
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

/// Data-quality probe run against the store, before or after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfilingSnapshot {
    pub date_errors: u64,
    pub population_errors: u64,
    pub cost_errors: u64,
    pub budget_errors: u64,
    pub noise_outliers: u64,
    pub avg_estimated_cost: Option<f64>,
}

impl ProfilingSnapshot {
    pub fn total_errors(&self) -> u64 {
        self.date_errors
            + self.population_errors
            + self.cost_errors
            + self.budget_errors
            + self.noise_outliers
    }

    pub fn summary(&self) -> String {
        format!(
            "Date errors: {}\n\
            Population errors: {}\n\
            Cost errors (negative or missing): {}\n\
            Budget errors: {}\n\
            Noise outliers: {}\n\
            Average estimated cost: {}",
            self.date_errors,
            self.population_errors,
            self.cost_errors,
            self.budget_errors,
            self.noise_outliers,
            self.avg_estimated_cost
                .map_or_else(|| "n/a".to_string(), |c| format!("{:.2}", c))
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub resolution_times: Vec<ResolutionTime>,
    pub investment_by_prefecture: Vec<PrefectureInvestment>,
    pub risk_matrix: RiskMatrix,
    pub status_distribution: Vec<StatusCount>,
}

impl Dashboard {
    pub fn summary(&self) -> String {
        let mut summary = String::from("=== Dashboard KPIs ===\n");

        summary.push_str("Average resolution time (days):\n");
        for row in &self.resolution_times {
            summary.push_str(&format!(
                "  {:<16} {}\n",
                row.category,
                row.avg_days
                    .map_or_else(|| "n/a".to_string(), |d| format!("{:.1}", d))
            ));
        }

        summary.push_str("Social investment by prefecture ($M):\n");
        for row in &self.investment_by_prefecture {
            summary.push_str(&format!(
                "  {:<16} {}\n",
                row.prefecture,
                row.invest_musd
                    .map_or_else(|| "n/a".to_string(), |m| format!("{:.3}", m))
            ));
        }

        summary.push_str(&format!(
            "Risk matrix: {} categories x {} severities, {} grievances\n",
            self.risk_matrix.categories.len(),
            self.risk_matrix.severities.len(),
            self.risk_matrix.total()
        ));

        summary.push_str("Status distribution:\n");
        for row in &self.status_distribution {
            summary.push_str(&format!("  {:<16} {}\n", row.status, row.count));
        }

        summary
    }
}

/// Read-only aggregate queries over the store.
pub struct KpiAnalyzer;

impl KpiAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn dashboard(&self, store: &SqliteStore) -> Result<Dashboard> {
        Ok(Dashboard {
            resolution_times: self.resolution_times(store)?,
            investment_by_prefecture: self.investment_by_prefecture(store)?,
            risk_matrix: self.risk_matrix(store)?,
            status_distribution: self.status_distribution(store)?,
        })
    }

    /// Average days from logging to closing per category, ascending.
    pub fn resolution_times(&self, store: &SqliteStore) -> Result<Vec<ResolutionTime>> {
        let sql = format!(
            "SELECT Category, ROUND(AVG(julianday(Closing_Date) - julianday(Logged_Date)), 1) AS Avg_Days \
             FROM {} WHERE Status = ?1 GROUP BY Category ORDER BY Avg_Days ASC, Category ASC",
            store.table_name(TableKind::Grievances)
        );
        let mut stmt = store.connection().prepare(&sql)?;
        let rows = stmt
            .query_map([STATUS_CLOSED], |row| {
                Ok(ResolutionTime {
                    category: row.get(0)?,
                    avg_days: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(categories = rows.len(), "Computed resolution times");
        Ok(rows)
    }

    /// Total budget in millions per prefecture, keeping prefectures without investments.
    pub fn investment_by_prefecture(
        &self,
        store: &SqliteStore,
    ) -> Result<Vec<PrefectureInvestment>> {
        let sql = format!(
            "SELECT c.Prefecture, SUM(i.Budget_USD) / 1000000.0 AS Invest_MUSD \
             FROM {} c LEFT JOIN {} i ON c.Community_ID = i.Community_ID \
             GROUP BY c.Prefecture ORDER BY c.Prefecture",
            store.table_name(TableKind::Communities),
            store.table_name(TableKind::SocialInvestments)
        );
        let mut stmt = store.connection().prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(PrefectureInvestment {
                    prefecture: row.get(0)?,
                    invest_musd: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn risk_matrix(&self, store: &SqliteStore) -> Result<RiskMatrix> {
        let sql = format!(
            "SELECT Category, Severity, COUNT(*) FROM {} GROUP BY Category, Severity",
            store.table_name(TableKind::Grievances)
        );
        let mut stmt = store.connection().prepare(&sql)?;
        let triples = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get::<_, i64>(2)? as u64))
            })?
            .collect::<rusqlite::Result<Vec<(String, String, u64)>>>()?;
        Ok(RiskMatrix::from_triples(&triples))
    }

    pub fn status_distribution(&self, store: &SqliteStore) -> Result<Vec<StatusCount>> {
        let sql = format!(
            "SELECT Status, COUNT(*) FROM {} GROUP BY Status ORDER BY Status",
            store.table_name(TableKind::Grievances)
        );
        let mut stmt = store.connection().prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StatusCount {
                    status: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn profile(&self, store: &SqliteStore) -> Result<ProfilingSnapshot> {
        let grievances = store.table_name(TableKind::Grievances);
        let sql = format!(
            "SELECT \
                (SELECT COUNT(*) FROM {g} WHERE Closing_Date < Logged_Date), \
                (SELECT COUNT(*) FROM {c} WHERE Population < 0), \
                (SELECT COUNT(*) FROM {g} WHERE Estimated_Cost < 0 OR Estimated_Cost IS NULL), \
                (SELECT COUNT(*) FROM {i} WHERE Budget_USD < 0), \
                (SELECT COUNT(*) FROM {e} WHERE Noise_dB > {max_noise}), \
                (SELECT AVG(Estimated_Cost) FROM {g})",
            g = grievances,
            c = store.table_name(TableKind::Communities),
            i = store.table_name(TableKind::SocialInvestments),
            e = store.table_name(TableKind::EnvironmentalMonitoring),
            max_noise = MAX_VALID_NOISE_DB,
        );

        let snapshot = store.connection().query_row(&sql, [], |row| {
            Ok(ProfilingSnapshot {
                date_errors: row.get::<_, i64>(0)? as u64,
                population_errors: row.get::<_, i64>(1)? as u64,
                cost_errors: row.get::<_, i64>(2)? as u64,
                budget_errors: row.get::<_, i64>(3)? as u64,
                noise_outliers: row.get::<_, i64>(4)? as u64,
                avg_estimated_cost: row.get(5)?,
            })
        })?;
        Ok(snapshot)
    }
}

impl Default for KpiAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
