use serde::Serialize;
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

use super::vocabulary::{CATEGORY_VOCABULARY, THEME_VOCABULARY};
use crate::models::record::is_trimmed;
use crate::models::{Dataset, TableRecord};
use crate::store::TableKind;

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    pub violations: Vec<Violation>,
    pub violation_counts: BTreeMap<ViolationType, usize>,
    pub table_statistics: BTreeMap<TableKind, TableStatistics>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self, violation_type: ViolationType) -> usize {
        self.violation_counts
            .get(&violation_type)
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub table: TableKind,
    pub record_id: String,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ViolationType {
    NegativePopulation,
    NegativeBudget,
    NegativeCost,
    MissingCost,
    ClosingBeforeLogging,
    NoiseOutOfRange,
    EmptyText,
    UntrimmedText,
    MixedCaseCode,
    NonCanonicalCategory,
    NonCanonicalTheme,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TableStatistics {
    pub total_records: usize,
    pub invalid_records: usize,
}

/// Audits a dataset against the invariants that must hold after cleaning.
///
/// Numeric and date rules come from each record's `validator` derive; text
/// normalization rules (trimming, casing, vocabulary) are checked here.
pub struct IntegrityChecker {
    max_reported_examples: usize,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self {
            max_reported_examples: 10,
        }
    }

    pub fn with_max_examples(max_reported_examples: usize) -> Self {
        Self {
            max_reported_examples,
        }
    }

    pub fn check_dataset(&self, dataset: &Dataset) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: dataset.total_rows(),
            valid_records: 0,
            invalid_records: 0,
            violations: Vec::new(),
            violation_counts: BTreeMap::new(),
            table_statistics: BTreeMap::new(),
        };

        for community in &dataset.communities {
            let mut found = Vec::new();
            untrimmed(&community.name, "Name", &mut found);
            mixed_case(&community.prefecture, "Prefecture", &mut found);
            self.record(&mut report, community, &community.community_id, found);
        }

        for stakeholder in &dataset.stakeholders {
            let mut found = Vec::new();
            untrimmed(&stakeholder.full_name, "Full_Name", &mut found);
            mixed_case(&stakeholder.full_name, "Full_Name", &mut found);
            mixed_case(&stakeholder.role, "Role", &mut found);
            self.record(&mut report, stakeholder, &stakeholder.stakeholder_id, found);
        }

        for grievance in &dataset.grievances {
            let mut found = Vec::new();
            if CATEGORY_VOCABULARY.is_known_synonym(&grievance.category) {
                found.push((
                    ViolationType::NonCanonicalCategory,
                    format!(
                        "Category '{}' should read '{}'",
                        grievance.category,
                        CATEGORY_VOCABULARY.canonicalize(&grievance.category)
                    ),
                ));
            }
            self.record(&mut report, grievance, &grievance.grievance_id, found);
        }

        for plan in &dataset.action_plans {
            let mut found = Vec::new();
            mixed_case(&plan.department, "Department", &mut found);
            mixed_case(&plan.status, "Status", &mut found);
            self.record(&mut report, plan, &plan.action_id, found);
        }

        for sample in &dataset.environmental_samples {
            self.record(&mut report, sample, &sample.sample_id, Vec::new());
        }

        for investment in &dataset.social_investments {
            let mut found = Vec::new();
            if THEME_VOCABULARY.is_known_synonym(&investment.theme) {
                found.push((
                    ViolationType::NonCanonicalTheme,
                    format!(
                        "Theme '{}' should read '{}'",
                        investment.theme,
                        THEME_VOCABULARY.canonicalize(&investment.theme)
                    ),
                ));
            }
            self.record(&mut report, investment, &investment.investment_id, found);
        }

        report
    }

    fn record<R: TableRecord + Validate>(
        &self,
        report: &mut IntegrityReport,
        record: &R,
        record_id: &str,
        text_issues: Vec<(ViolationType, String)>,
    ) {
        let mut found = validation_violations(record);
        found.extend(text_issues);

        let stats = report.table_statistics.entry(R::KIND).or_default();
        stats.total_records += 1;

        if found.is_empty() {
            report.valid_records += 1;
            return;
        }

        stats.invalid_records += 1;
        report.invalid_records += 1;

        for (violation_type, details) in found {
            *report.violation_counts.entry(violation_type).or_insert(0) += 1;
            report.violations.push(Violation {
                table: R::KIND,
                record_id: record_id.to_string(),
                violation_type,
                details,
            });
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Valid Records: {} ({:.1}%)\n",
            report.valid_records,
            percentage(report.valid_records, report.total_records)
        ));
        summary.push_str(&format!(
            "Invalid Records: {} ({:.1}%)\n",
            report.invalid_records,
            percentage(report.invalid_records, report.total_records)
        ));
        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        for (violation_type, count) in &report.violation_counts {
            summary.push_str(&format!("  {:<22} {}\n", format!("{:?}", violation_type), count));
        }

        if !report.violations.is_empty() {
            summary.push_str(&format!(
                "\nTop {} Violations:\n",
                self.max_reported_examples
            ));
            for (i, violation) in report
                .violations
                .iter()
                .take(self.max_reported_examples)
                .enumerate()
            {
                summary.push_str(&format!(
                    "  {}. {:?} {}: {}\n",
                    i + 1,
                    violation.table,
                    violation.record_id,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

fn validation_violations<R: Validate>(record: &R) -> Vec<(ViolationType, String)> {
    match record.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => classify(&errors),
    }
}

fn classify(errors: &ValidationErrors) -> Vec<(ViolationType, String)> {
    let mut found = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors.iter() {
            let violation_type = match &*field {
                "population" => ViolationType::NegativePopulation,
                "budget_usd" => ViolationType::NegativeBudget,
                "noise_db" => ViolationType::NoiseOutOfRange,
                "estimated_cost" if error.code == "required" => ViolationType::MissingCost,
                "estimated_cost" => ViolationType::NegativeCost,
                "__all__" => ViolationType::ClosingBeforeLogging,
                _ => ViolationType::EmptyText,
            };
            let value = error
                .params
                .get("value")
                .map(|v| v.to_string())
                .unwrap_or_default();
            found.push((violation_type, format!("{} {} {}", field, error.code, value)));
        }
    }

    found
}

fn untrimmed(value: &str, column: &str, found: &mut Vec<(ViolationType, String)>) {
    if !is_trimmed(value) {
        found.push((
            ViolationType::UntrimmedText,
            format!("{} '{}' has padding whitespace", column, value),
        ));
    }
}

// SQLite's UPPER() folds ASCII only, so that is the standard to hold values to.
fn mixed_case(value: &str, column: &str, found: &mut Vec<(ViolationType, String)>) {
    if value.to_ascii_uppercase() != value {
        found.push((
            ViolationType::MixedCaseCode,
            format!("{} '{}' is not uppercase", column, value),
        ));
    }
}
