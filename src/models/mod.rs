pub mod finding;
pub mod sample;
pub mod stats;

pub use finding::{ComparisonMode, DeltaFinding, MetricKind};
pub use sample::{ProcessEntry, Sample};
pub use stats::{RunningStats, StatsSummary};
