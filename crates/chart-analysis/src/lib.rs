pub mod analyzer;
pub mod parse;

pub use analyzer::ChartAnalyzer;
pub use parse::parse_bar_rows;

#[cfg(test)]
mod analyzer_tests;
