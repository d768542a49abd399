pub mod gate;
pub mod store;

pub use gate::{AnalysisKind, DailyGate, GatePartition};
pub use store::MemoryStore;
