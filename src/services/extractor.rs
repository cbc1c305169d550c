use lazy_static::lazy_static;
use regex::Regex;

use crate::document::{depth_first, LabeledNode};
use crate::models::{ProcessEntry, Sample};

lazy_static! {
    /// 紧挨在 "MB" 前的整数，例如 "Available: 4096 MB free"
    static ref AVAILABLE_MB: Regex = Regex::new(r"(\d+)\s*MB").unwrap();
}

const COMPONENT_FIELDS: &[&str] = &["component"];
const UTILIZATION_FIELDS: &[&str] = &["util", "utilization"];
const DETAIL_FIELDS: &[&str] = &["detail", "details"];
const PID_FIELDS: &[&str] = &["pid", "processid", "process id"];
const WORKING_SET_FIELDS: &[&str] = &["workingset", "working set", "workingsetkb"];
const PROCESS_NAME_FIELDS: &[&str] = &["processname", "process name", "name", "image"];

pub const DEFAULT_CPU_COMPONENT: &str = "SysHealthCpuComponent";
pub const DEFAULT_MEMORY_COMPONENT: &str = "SysHealthMemComponent";

/// 识别组件用的标记值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub cpu_component: String,
    pub memory_component: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            cpu_component: DEFAULT_CPU_COMPONENT.to_string(),
            memory_component: DEFAULT_MEMORY_COMPONENT.to_string(),
        }
    }
}

/// 从标签树中按字段名提取指标
///
/// 单个字段缺失或格式错误只会跳过该条读数，不会中断整份文档。
#[derive(Debug, Clone, Default)]
pub struct RecordExtractor {
    config: ExtractorConfig,
}

impl RecordExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn extract<N: LabeledNode>(&self, id: impl Into<String>, root: &N) -> Sample {
        let mut sample = Sample::new(id);

        for node in depth_first(root) {
            match node.field_any(COMPONENT_FIELDS).map(str::trim) {
                Some(component) if component == self.config.cpu_component => {
                    if let Some(cpu) = utilization(node) {
                        log::info!("Found CPU usage: {}%", cpu);
                        sample.cpu_utilization.push(cpu);
                    }
                }
                Some(component) if component == self.config.memory_component => {
                    if let Some(ram) = utilization(node) {
                        log::info!("Found RAM usage: {}%", ram);
                        sample.ram_utilization.push(ram);
                    }
                    if let Some(available) = node.field_any(DETAIL_FIELDS).and_then(available_mb) {
                        sample.ram_available_mb.push(available);
                    }
                }
                _ => {}
            }

            if let Some(entry) = process_entry(node) {
                sample.process_entries.push(entry);
            }
        }

        sample
    }
}

fn utilization<N: LabeledNode>(node: &N) -> Option<f64> {
    let text = node.field_any(UTILIZATION_FIELDS)?;
    match text.trim().trim_end_matches('%').trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            log::debug!("No valid utilization percentage found in: {:?}", text);
            None
        }
    }
}

/// 从 detail 文本中取出 "<n> MB" 的 n
pub fn available_mb(detail: &str) -> Option<u64> {
    let parsed = AVAILABLE_MB
        .captures(detail)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok());
    if parsed.is_none() {
        log::debug!("No available-memory figure in detail: {:?}", detail);
    }
    parsed
}

/// pid、工作集 (KB)、进程名三者齐全且可解析时才生成一条记录
fn process_entry<N: LabeledNode>(node: &N) -> Option<ProcessEntry> {
    let pid = node.field_any(PID_FIELDS)?;
    let working_set = node.field_any(WORKING_SET_FIELDS)?;
    let name = node.field_any(PROCESS_NAME_FIELDS)?;

    let (Ok(pid), Ok(working_set_kb)) = (pid.trim().parse::<u32>(), working_set.trim().parse::<u64>()) else {
        log::debug!("Skipping process record with pid {:?} and working set {:?}", pid, working_set);
        return None;
    };

    ProcessEntry::from_kilobytes(pid, name, working_set_kb)
}
