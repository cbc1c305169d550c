pub mod aggregator;
pub mod comparator;
pub mod extractor;
pub mod host;
pub mod runner;

pub use runner::execute;
