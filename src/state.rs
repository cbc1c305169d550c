use crate::models::{DeltaFinding, MetricKind, Sample, StatsSummary};
use crate::services::aggregator::{RankedProcess, SampleAggregator};
use crate::services::comparator::Comparator;

/// 一次运行的全部可变状态；运行结束后即丢弃
#[derive(Debug)]
pub struct RunState {
    aggregator: SampleAggregator,
    comparator: Comparator,
    findings: Vec<DeltaFinding>,
}

impl RunState {
    pub fn new(comparator: Comparator) -> Self {
        Self {
            aggregator: SampleAggregator::new(),
            comparator,
            findings: Vec::new(),
        }
    }

    /// 按运行顺序折叠一个样本：先与参考点比较，再计入累计统计
    pub fn ingest(&mut self, sample: Sample) -> usize {
        let findings = self
            .comparator
            .observe(self.aggregator.samples().last(), &sample);
        let count = findings.len();

        self.aggregator.accumulate(sample);
        self.findings.extend(findings);
        count
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    pub fn samples(&self) -> &[Sample] {
        self.aggregator.samples()
    }

    pub fn findings(&self) -> &[DeltaFinding] {
        &self.findings
    }

    pub fn findings_of(&self, kind: MetricKind) -> usize {
        self.findings.iter().filter(|f| f.metric_kind == kind).count()
    }

    pub fn summary(&self) -> StatsSummary {
        self.aggregator.summary()
    }

    pub fn rank_processes(&self) -> Vec<RankedProcess<'_>> {
        self.aggregator.rank_processes()
    }
}
