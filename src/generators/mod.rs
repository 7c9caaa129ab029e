pub mod synthetic;

pub use synthetic::{DatasetSizes, SyntheticGenerator};
