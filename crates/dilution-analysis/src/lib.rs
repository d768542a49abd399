pub mod classifier;
pub mod recommendation;

pub use classifier::{extract_metric, DilutionClassifier};
pub use recommendation::{recommend, CascadeInput, TradingRecommendation, TradingStance};
