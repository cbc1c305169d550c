//! Turns a finished run into the rows and lines the writers persist.

pub mod writer;

use serde::Serialize;

use crate::models::{ComparisonMode, DeltaFinding, MetricKind, StatsSummary};
use crate::state::RunState;

pub const TABLE_HEADER: [&str; 5] = [
    "Process ID",
    "Process Name",
    "Memory Working Set MB",
    "CPU Utilization (%)",
    "RAM Utilization (%)",
];

pub const PROCESS_DETAIL_HEADER: &str = "Process ID\tProcess Name\tMemory Working Set";

/// 表格报表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub pid: u32,
    pub process_name: String,
    pub working_set_mb: f64,
    /// 该进程所在样本的全部 CPU 读数
    pub cpu_utilization: String,
    /// 占总内存的百分比
    pub ram_share_percent: f64,
    pub sample_id: String,
}

impl TableRow {
    pub fn to_record(&self) -> [String; 5] {
        [
            self.pid.to_string(),
            self.process_name.clone(),
            format!("{:.2}", self.working_set_mb),
            self.cpu_utilization.clone(),
            format!("{:.2}", self.ram_share_percent),
        ]
    }
}

/// 运行汇总
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub mode: ComparisonMode,
    pub threshold_percent: f64,
    pub compared_ram: bool,
    pub baseline: Option<String>,
    pub documents: usize,
    pub total_memory_mb: f64,
    pub stats: StatsSummary,
    pub ram_available_mb: Vec<u64>,
    pub cpu_findings: usize,
    pub ram_findings: usize,
    pub findings: Vec<DeltaFinding>,
}

/// 三种报表的内容
#[derive(Debug, Clone)]
pub struct ReportSet {
    pub rows: Vec<TableRow>,
    pub change_log: Vec<String>,
    pub process_detail: Vec<String>,
    pub summary: RunSummary,
}

impl ReportSet {
    pub fn has_findings(&self) -> bool {
        !self.change_log.is_empty()
    }
}

/// 浮点数显示：整数值也带一位小数，例如 10.0
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub fn change_log_line(finding: &DeltaFinding) -> String {
    format!(
        "Significant {} increase detected: {}% to {}% in {}",
        finding.metric_kind,
        format_value(finding.reference_value),
        format_value(finding.current_value),
        finding.sample_id
    )
}

#[derive(Debug, Clone, Copy)]
pub struct ReportAssembler {
    total_memory_mb: f64,
}

impl ReportAssembler {
    pub fn new(total_memory_mb: f64) -> Self {
        Self { total_memory_mb }
    }

    /// 进程占总内存的百分比；容量无效时为 0
    pub fn ram_share(&self, working_set_mb: f64) -> f64 {
        if self.total_memory_mb <= 0.0 {
            return 0.0;
        }
        working_set_mb / self.total_memory_mb * 100.0
    }

    pub fn assemble(&self, state: &RunState) -> ReportSet {
        let ranked = state.rank_processes();

        let rows = ranked
            .iter()
            .map(|ranked| TableRow {
                pid: ranked.entry.pid,
                process_name: ranked.entry.process_name.clone(),
                working_set_mb: ranked.entry.working_set_mb,
                cpu_utilization: ranked
                    .sample
                    .cpu_utilization
                    .iter()
                    .map(|v| format_value(*v))
                    .collect::<Vec<_>>()
                    .join(", "),
                ram_share_percent: self.ram_share(ranked.entry.working_set_mb),
                sample_id: ranked.sample.id.clone(),
            })
            .collect();

        let process_detail = ranked
            .iter()
            .map(|ranked| {
                format!(
                    "{}\t{}\t{:.2} MB",
                    ranked.entry.pid, ranked.entry.process_name, ranked.entry.working_set_mb
                )
            })
            .collect();

        let comparator = state.comparator();
        let summary = RunSummary {
            mode: comparator.mode(),
            threshold_percent: comparator.threshold_percent(),
            compared_ram: comparator.compares_ram(),
            baseline: comparator.baseline().map(|b| b.id.clone()),
            documents: state.samples().len(),
            total_memory_mb: self.total_memory_mb,
            stats: state.summary(),
            ram_available_mb: state
                .samples()
                .iter()
                .flat_map(|s| s.ram_available_mb.iter().copied())
                .collect(),
            cpu_findings: state.findings_of(MetricKind::Cpu),
            ram_findings: state.findings_of(MetricKind::Ram),
            findings: state.findings().to_vec(),
        };

        ReportSet {
            rows,
            change_log: state.findings().iter().map(change_log_line).collect(),
            process_detail,
            summary,
        }
    }
}
