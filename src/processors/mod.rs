pub mod cleaner;
pub mod integrity_checker;
pub mod vocabulary;

pub use cleaner::{Cleaner, CleaningReport, CleaningStatement};
pub use integrity_checker::{
    IntegrityChecker, IntegrityReport, TableStatistics, Violation, ViolationType,
};
pub use vocabulary::{Vocabulary, CATEGORY_VOCABULARY, THEME_VOCABULARY};
