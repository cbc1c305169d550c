use crate::models::{ProcessEntry, RunningStats, Sample, StatsSummary};

/// 排名中的一条进程记录，附带其所属样本
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedProcess<'a> {
    pub sample: &'a Sample,
    pub entry: &'a ProcessEntry,
}

/// 按顺序折叠样本，维护累计统计
#[derive(Debug)]
pub struct SampleAggregator {
    stats: RunningStats,
    samples: Vec<Sample>,
}

impl SampleAggregator {
    pub fn new() -> Self {
        Self {
            stats: RunningStats::empty(),
            samples: Vec::new(),
        }
    }

    /// 累加一个样本并接管其所有权，返回刚加入的样本
    pub fn accumulate(&mut self, sample: Sample) -> &Sample {
        self.stats.accumulate(&sample);
        self.samples.push(sample);
        &self.samples[self.samples.len() - 1]
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn summary(&self) -> StatsSummary {
        self.stats.summary()
    }

    /// 所有样本中的进程按工作集降序排列；相等时保持出现顺序
    pub fn rank_processes(&self) -> Vec<RankedProcess<'_>> {
        rank_processes(&self.samples)
    }
}

impl Default for SampleAggregator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn rank_processes(samples: &[Sample]) -> Vec<RankedProcess<'_>> {
    let mut ranked: Vec<RankedProcess<'_>> = samples
        .iter()
        .flat_map(|sample| {
            sample
                .process_entries
                .iter()
                .map(move |entry| RankedProcess { sample, entry })
        })
        .collect();

    // sort_by 是稳定排序
    ranked.sort_by(|a, b| b.entry.working_set_mb.total_cmp(&a.entry.working_set_mb));
    ranked
}
