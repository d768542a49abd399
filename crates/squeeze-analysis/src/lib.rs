pub mod report;
pub mod scanner;

pub use report::render_report;
pub use scanner::SqueezeScanner;
