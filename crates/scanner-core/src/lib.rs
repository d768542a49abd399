pub mod error;
pub mod traits;
pub mod types;


pub use error::ScanError;
pub use traits::{
    BarFeed, DocumentFilter, DocumentKey, DocumentStore, FundamentalsFeed, NewsAdvisor,
    RegulatoryFeed,
};
pub use types::*;
