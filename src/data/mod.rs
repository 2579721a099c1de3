//! Data module - CSV loading and cleaning

mod loader;
mod processor;
pub mod schema;

pub use loader::{CleanSummary, DataLoader, LoaderError};
pub use processor::DataProcessor;
