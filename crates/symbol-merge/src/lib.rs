pub mod merger;
pub mod normalize;

pub use merger::SymbolMerger;
pub use normalize::normalize_record;

#[cfg(test)]
mod merger_tests;
