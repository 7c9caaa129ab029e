use calamine::{open_workbook, Reader, Xlsx};
use chrono::NaiveDate;
use grievance_pipeline::analyzers::KpiAnalyzer;
use grievance_pipeline::generators::DatasetSizes;
use grievance_pipeline::models::{Community, Dataset, Grievance, SocialInvestment};
use grievance_pipeline::pipeline::{ExportOutcome, Pipeline};
use grievance_pipeline::processors::{Cleaner, IntegrityChecker, ViolationType};
use grievance_pipeline::settings::PipelineSettings;
use grievance_pipeline::store::{SchemaVariant, SqliteStore, TableKind};
use grievance_pipeline::writers::{ChartWriter, XlsxWriter};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn small_settings(schema: SchemaVariant, output_dir: &std::path::Path) -> PipelineSettings {
    PipelineSettings {
        seed: Some(7),
        schema,
        sizes: DatasetSizes {
            communities: 10,
            stakeholders: 30,
            grievances: 400,
            action_plans: 300,
            environmental_samples: 200,
            social_investments: 60,
        },
        output_dir: output_dir.to_path_buf(),
        ..PipelineSettings::default()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_generated_dataset_is_dirty_then_clean() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for schema in [SchemaVariant::Standard, SchemaVariant::Extended] {
        let pipeline = Pipeline::new(small_settings(schema, temp_dir.path()));
        let outcome = pipeline.execute().unwrap();

        assert!(!outcome.raw_integrity.is_clean());
        assert!(outcome.raw_profile.total_errors() > 0);
        assert!(outcome.cleaning.total_rows_changed() > 0);

        assert_eq!(outcome.clean_profile.date_errors, 0);
        assert_eq!(outcome.clean_profile.population_errors, 0);
        assert_eq!(outcome.clean_profile.cost_errors, 0);
        assert_eq!(outcome.clean_profile.budget_errors, 0);
        assert_eq!(outcome.clean_profile.noise_outliers, 0);
        assert!(
            outcome.clean_integrity.is_clean(),
            "{:?}",
            outcome.clean_integrity.violation_counts
        );

        let cleaned = outcome.store.read_dataset().unwrap();
        assert!(cleaned.communities.iter().all(|c| c.population >= 0));
        assert!(cleaned.social_investments.iter().all(|i| i.budget_usd >= 0));
        assert!(cleaned
            .environmental_samples
            .iter()
            .all(|s| s.noise_db <= 120.0));
        assert!(cleaned.grievances.iter().all(|g| !g.closes_before_logging()));
        assert!(cleaned
            .grievances
            .iter()
            .all(|g| matches!(g.estimated_cost, Some(c) if c >= 0)));
    }
}

#[test]
fn test_row_counts_survive_cleaning() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let pipeline = Pipeline::new(small_settings(SchemaVariant::Extended, temp_dir.path()));

    let raw = pipeline.generate().unwrap();
    let store = pipeline.load(&raw).unwrap();
    pipeline.clean(&store).unwrap();

    for (kind, count) in raw.table_counts() {
        assert_eq!(store.row_count(kind).unwrap(), count, "{:?}", kind);
    }
}

#[test]
fn test_known_defects_corrected() {
    let mut dataset = Dataset::new(SchemaVariant::Standard);
    dataset.communities = vec![
        Community::new("COM-001", "Village_A1", "Kindia", -100, "Low"),
        Community::new("COM-002", "Village_B2", "Boke", 4000, "High"),
    ];
    dataset.social_investments = vec![SocialInvestment::new(
        "SOC-0001", "COM-001", "HEALTH", -5000, None,
    )];
    dataset.grievances = vec![Grievance::new(
        "GRV-00001",
        date(2023, 3, 1),
        "STK-001",
        None,
        "land",
        "High",
        "Closed",
        Some(date(2023, 2, 20)),
        Some(1200),
    )];

    let mut store = SqliteStore::open_in_memory(SchemaVariant::Standard).unwrap();
    store.load_dataset(&dataset).unwrap();

    let checker = IntegrityChecker::new();
    let before = checker.check_dataset(&dataset);
    assert_eq!(before.count(ViolationType::NegativePopulation), 1);
    assert_eq!(before.count(ViolationType::NegativeBudget), 1);
    assert_eq!(before.count(ViolationType::ClosingBeforeLogging), 1);

    Cleaner::new(SchemaVariant::Standard).clean(&store).unwrap();
    let cleaned = store.read_dataset().unwrap();

    assert_eq!(cleaned.communities[0].population, 0);
    assert_eq!(cleaned.communities[1].population, 4000);
    assert_eq!(cleaned.communities[1].prefecture, "BOKE");
    assert_eq!(cleaned.social_investments[0].budget_usd, 5000);
    assert_eq!(cleaned.social_investments[0].theme, "Health");

    let grievance = &cleaned.grievances[0];
    assert_eq!(grievance.category, "Land Access");
    assert_eq!(grievance.closing_date, Some(date(2023, 3, 6)));
    assert_eq!(grievance.resolution_days(), Some(5));

    assert!(checker.check_dataset(&cleaned).is_clean());
}

#[test]
fn test_second_clean_is_a_no_op() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let pipeline = Pipeline::new(small_settings(SchemaVariant::Extended, temp_dir.path()));

    let raw = pipeline.generate().unwrap();
    let store = pipeline.load(&raw).unwrap();
    pipeline.clean(&store).unwrap();

    let once = store.read_dataset().unwrap();
    let kpis_once = KpiAnalyzer::new().dashboard(&store).unwrap();
    pipeline.clean(&store).unwrap();
    let twice = store.read_dataset().unwrap();
    let kpis_twice = KpiAnalyzer::new().dashboard(&store).unwrap();

    assert_eq!(once, twice);
    assert_eq!(kpis_once, kpis_twice);
}

#[test]
fn test_same_seed_same_dashboard() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = small_settings(SchemaVariant::Extended, temp_dir.path());

    let first = Pipeline::new(settings.clone()).execute().unwrap();
    let second = Pipeline::new(settings).execute().unwrap();

    assert_eq!(first.dashboard, second.dashboard);
    assert_eq!(first.raw_profile, second.raw_profile);
}

#[test]
fn test_workbook_export_has_one_sheet_per_table() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for schema in [SchemaVariant::Standard, SchemaVariant::Extended] {
        let pipeline = Pipeline::new(small_settings(schema, temp_dir.path()));
        let outcome = pipeline.execute().unwrap();
        let path = temp_dir.path().join(format!("{}.xlsx", schema));

        let summary = match pipeline.export(&outcome.store, &path) {
            ExportOutcome::Exported(summary) => summary,
            ExportOutcome::Failed { message, .. } => panic!("export failed: {}", message),
        };
        assert_eq!(summary.sheets.len(), 6);

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let expected: Vec<String> = TableKind::ALL
            .iter()
            .map(|kind| kind.table_name(schema).to_string())
            .collect();
        assert_eq!(workbook.sheet_names(), expected);

        for kind in TableKind::ALL {
            let name = kind.table_name(schema);
            let range = workbook.worksheet_range(name).unwrap();
            let rows = outcome.store.row_count(kind).unwrap();
            assert_eq!(range.height(), rows + 1, "{}", name);
            assert_eq!(range.width(), kind.columns(schema).len(), "{}", name);
        }
    }
}

#[test]
fn test_export_failure_is_recovered() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let pipeline = Pipeline::new(small_settings(SchemaVariant::Standard, temp_dir.path()));
    let outcome = pipeline.execute().unwrap();

    // A regular file where the parent directory should be.
    let blocker = temp_dir.path().join("blocked");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let path = blocker.join("workbook.xlsx");

    match pipeline.export(&outcome.store, &path) {
        ExportOutcome::Failed { path: failed, .. } => assert_eq!(failed, path),
        ExportOutcome::Exported(_) => panic!("export should fail"),
    }

    // The store is still usable afterwards.
    let retry = temp_dir.path().join("retry.xlsx");
    let summary = XlsxWriter::new().export(&outcome.store, &retry).unwrap();
    assert_eq!(summary.total_rows(), outcome.store.read_dataset().unwrap().total_rows());
}

#[test]
fn test_dashboard_rendered_to_output_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let pipeline = Pipeline::new(small_settings(SchemaVariant::Extended, temp_dir.path()));
    let outcome = pipeline.execute().unwrap();

    let path = temp_dir.path().join("charts").join("dashboard.svg");
    ChartWriter::new().render(&outcome.dashboard, &path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Responsiveness"));
    assert!(svg.contains("Risk matrix"));
}
