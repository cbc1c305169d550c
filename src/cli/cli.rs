use clap::Parser;
use std::path::PathBuf;

use crate::services::extractor::{DEFAULT_CPU_COMPONENT, DEFAULT_MEMORY_COMPONENT};

/// perf-delta - 性能监视器导出报告的 CPU / 内存变化分析
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// 导出报告所在目录（递归查找）
    #[arg(short, long, env = "REPORT_DIR")]
    pub directory: PathBuf,

    /// 报告文件扩展名
    #[arg(short, long, env = "REPORT_EXTENSION", default_value = "xml")]
    pub extension: String,

    /// 显著变化阈值（百分比）；不指定时交互输入
    #[arg(short, long, env = "THRESHOLD", allow_negative_numbers = true)]
    pub threshold: Option<String>,

    /// 固定基线报告；不指定时与前一份报告比较
    #[arg(short, long, env = "BASELINE")]
    pub baseline: Option<PathBuf>,

    /// 链式模式下同时比较内存使用率
    #[arg(long, env = "CHAINED_RAM")]
    pub chained_ram: bool,

    /// 内存总容量 (MB)；不指定时读取本机内存
    #[arg(short = 'm', long, env = "TOTAL_MEMORY_MB")]
    pub total_memory_mb: Option<f64>,

    /// 报表输出目录
    #[arg(short, long, env = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// 额外输出 JSON 汇总
    #[arg(long, env = "JSON_SUMMARY")]
    pub json_summary: Option<PathBuf>,

    /// 额外输出 Prometheus 文本格式指标
    #[arg(long, env = "METRICS_FILE")]
    pub metrics_file: Option<PathBuf>,

    /// CPU 组件标记
    #[arg(long, default_value = DEFAULT_CPU_COMPONENT)]
    pub cpu_component: String,

    /// 内存组件标记
    #[arg(long, default_value = DEFAULT_MEMORY_COMPONENT)]
    pub memory_component: String,
}
