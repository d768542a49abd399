pub mod config;
pub mod pipeline;

pub use config::{validate_symbols, PipelineConfig};
pub use pipeline::{Pipeline, PipelineOutcome};
