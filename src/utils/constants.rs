/// Default table sizes
pub const NUM_COMMUNITIES: usize = 25;
pub const NUM_STAKEHOLDERS: usize = 150;
pub const NUM_GRIEVANCES: usize = 5000;
pub const NUM_ACTIONS: usize = 8000;
pub const NUM_ENV_SAMPLES: usize = 3000;
pub const NUM_INVESTMENTS: usize = 400;

/// First possible logging date, and the logging window in days
pub const START_YEAR: i32 = 2023;
pub const START_MONTH: u32 = 1;
pub const START_DAY: u32 = 1;
pub const LOGGING_WINDOW_DAYS: i64 = 730;

/// Closing offset relative to logging, in days (negative offsets are injected defects)
pub const MIN_CLOSING_OFFSET_DAYS: i64 = -10;
pub const MAX_CLOSING_OFFSET_DAYS: i64 = 90;

/// Days added to the logging date when a closing date precedes it
pub const CLOSING_DATE_CORRECTION_DAYS: i64 = 5;

/// Generation domains
pub const PREFECTURES: [&str; 4] = ["beyla", "FORECARIAH", "Kérouané", "Kindia"];
pub const RISK_LEVELS: [&str; 4] = ["Low", "Medium", "High", "Critical"];
pub const ROLES: [&str; 4] = ["Chef village", "SAGE", "Youth leader", "Association"];
pub const RAW_CATEGORIES: [&str; 5] = ["land", "Hiring", "ENV", "Water", "noise"];
pub const SEVERITIES: [&str; 4] = ["Low", "Medium", "High", "Critical"];
pub const DEPARTMENTS: [&str; 4] = ["csp", "ENVIRONMENT", "legal", "Ops"];
pub const ACTION_STATUSES: [&str; 3] = ["completed", "pending", "overdue"];
pub const RAW_THEMES: [&str; 4] = ["edu", "HEALTH", "infra", "livelihood"];
pub const INVESTMENT_YEARS: [i32; 3] = [2023, 2024, 2025];

/// Grievance statuses and their generation weights
pub const STATUS_CLOSED: &str = "Closed";
pub const GRIEVANCE_STATUSES: [&str; 4] = [STATUS_CLOSED, "Open", "In Progress", "Escalated"];
pub const GRIEVANCE_STATUS_WEIGHTS: [f64; 4] = [0.6, 0.15, 0.2, 0.05];

/// Population constraints
pub const MIN_VALID_POPULATION: i64 = 500;
pub const MAX_VALID_POPULATION: i64 = 10_000;
pub const INVALID_POPULATION: i64 = -100;

/// Estimated cost constraints
pub const MAX_VALID_COST: i64 = 15_000;
pub const INVALID_COST: i64 = -500;

/// Noise constraints
pub const MIN_NORMAL_NOISE_DB: f64 = 40.0;
pub const MAX_NORMAL_NOISE_DB: f64 = 95.0;
pub const OUTLIER_NOISE_DB: f64 = 155.0;
pub const MAX_VALID_NOISE_DB: f64 = 120.0;
pub const NOISE_REPLACEMENT_DB: f64 = 95.0;

/// Dust constraints
pub const MIN_DUST_PM10: f64 = 10.0;
pub const MAX_DUST_PM10: f64 = 200.0;

/// Budget constraints
pub const MIN_VALID_BUDGET: i64 = 10_000;
pub const MAX_VALID_BUDGET: i64 = 250_000;
pub const INVALID_BUDGET: i64 = -5000;

/// Output names
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DASHBOARD_FILE: &str = "dashboard.svg";
pub const WORKBOOK_PREFIX: &str = "grievance-master-data-cleaned";

/// Dashboard canvas size in pixels
pub const DASHBOARD_WIDTH: u32 = 1600;
pub const DASHBOARD_HEIGHT: u32 = 1000;

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "GRIEVANCE";
