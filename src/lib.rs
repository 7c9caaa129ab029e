pub mod analyzers;
pub mod cli;
pub mod error;
pub mod generators;
pub mod models;
pub mod pipeline;
pub mod processors;
pub mod settings;
pub mod store;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
