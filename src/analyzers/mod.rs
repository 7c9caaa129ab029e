pub mod kpi_analyzer;

pub use kpi_analyzer::{
    Dashboard, KpiAnalyzer, PrefectureInvestment, ProfilingSnapshot, ResolutionTime, RiskMatrix,
    StatusCount,
};
