use serde::Serialize;

/// 单个进程的工作集快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEntry {
    /// 进程 ID
    pub pid: u32,
    /// 进程名称（已去除首尾空白）
    pub process_name: String,
    /// 工作集大小 (MB)
    pub working_set_mb: f64,
}

impl ProcessEntry {
    /// 由报告中的 KB 数值构造；名称为空时返回 None
    pub fn from_kilobytes(pid: u32, process_name: &str, working_set_kb: u64) -> Option<Self> {
        let process_name = process_name.trim();
        if process_name.is_empty() {
            return None;
        }

        Some(Self {
            pid,
            process_name: process_name.to_string(),
            working_set_mb: working_set_kb as f64 / 1024.0,
        })
    }
}

/// 一份导出文档中提取出的全部指标
///
/// 各序列按文档中出现的顺序排列，比较时按位置对齐，不做身份匹配。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sample {
    /// 样本标识（通常是源文件路径）
    pub id: String,
    /// CPU 使用率 (百分比)
    pub cpu_utilization: Vec<f64>,
    /// 内存使用率 (百分比)
    pub ram_utilization: Vec<f64>,
    /// 可用内存 (MB)
    pub ram_available_mb: Vec<u64>,
    /// 进程工作集
    pub process_entries: Vec<ProcessEntry>,
}

impl Sample {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// 是否没有提取到任何指标
    pub fn is_empty(&self) -> bool {
        self.cpu_utilization.is_empty()
            && self.ram_utilization.is_empty()
            && self.ram_available_mb.is_empty()
            && self.process_entries.is_empty()
    }
}
