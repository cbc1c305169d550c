use serde::Serialize;
use std::fmt;

/// 被比较的指标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricKind {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "RAM")]
    Ram,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "CPU",
            MetricKind::Ram => "RAM",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 参考点的选择方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// 每个样本与前一个样本比较，达到阈值 (>=) 即视为显著
    Chained,
    /// 每个样本与同一个基线样本比较，超过阈值 (>) 才视为显著
    FixedBaseline,
}

impl ComparisonMode {
    /// 判断变化幅度是否显著；两种模式对"恰好等于阈值"的处理不同
    pub fn is_significant(&self, delta_percent: f64, threshold_percent: f64) -> bool {
        match self {
            ComparisonMode::Chained => delta_percent >= threshold_percent,
            ComparisonMode::FixedBaseline => delta_percent > threshold_percent,
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonMode::Chained => f.write_str("chained"),
            ComparisonMode::FixedBaseline => f.write_str("fixed-baseline"),
        }
    }
}

/// 一次超过阈值的变化
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaFinding {
    /// 当前样本标识
    pub sample_id: String,
    pub metric_kind: MetricKind,
    pub reference_value: f64,
    pub current_value: f64,
    /// (current - reference) / reference * 100
    pub percent_delta: f64,
}
