use std::io;
use std::path::{Path, PathBuf};

use crate::cli::{parse_threshold, prompt_threshold, CommandArgs};
use crate::error::Result;
use crate::services::extractor::ExtractorConfig;
use crate::services::host::resolve_total_memory_mb;

pub const TABLE_REPORT: &str = "process_report.csv";
pub const CHANGE_LOG_REPORT: &str = "cpu_usage_report.txt";
pub const PROCESS_DETAIL_REPORT: &str = "process_memory_report.txt";

/// 报表输出位置
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub table: PathBuf,
    pub change_log: PathBuf,
    pub process_detail: PathBuf,
    pub json_summary: Option<PathBuf>,
    pub metrics_file: Option<PathBuf>,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            table: dir.join(TABLE_REPORT),
            change_log: dir.join(CHANGE_LOG_REPORT),
            process_detail: dir.join(PROCESS_DETAIL_REPORT),
            json_summary: None,
            metrics_file: None,
        }
    }
}

/// 一次运行的全部配置；运行之间互不共享
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub directory: PathBuf,
    pub extension: String,
    pub threshold_percent: f64,
    /// None 表示链式模式
    pub baseline: Option<PathBuf>,
    pub chained_ram: bool,
    pub total_memory_mb: f64,
    pub output: OutputPaths,
    pub extractor: ExtractorConfig,
}

impl RunConfig {
    /// 使用默认输出文件名和默认组件标记
    pub fn new(directory: impl Into<PathBuf>, threshold_percent: f64, total_memory_mb: f64) -> Self {
        Self {
            directory: directory.into(),
            extension: "xml".to_string(),
            threshold_percent,
            baseline: None,
            chained_ram: false,
            total_memory_mb,
            output: OutputPaths::in_dir(Path::new(".")),
            extractor: ExtractorConfig::default(),
        }
    }

    /// 解析命令行参数；缺少阈值时从标准输入读取
    pub fn from_args(args: CommandArgs) -> Result<Self> {
        let threshold_percent = match args.threshold.as_deref() {
            Some(text) => parse_threshold(text)?,
            None => prompt_threshold(io::stdin().lock(), io::stdout())?,
        };

        let total_memory_mb = resolve_total_memory_mb(args.total_memory_mb);

        let mut config = Self::new(args.directory, threshold_percent, total_memory_mb);
        config.extension = args.extension;
        config.baseline = args.baseline;
        config.chained_ram = args.chained_ram;
        config.output = OutputPaths {
            json_summary: args.json_summary,
            metrics_file: args.metrics_file,
            ..OutputPaths::in_dir(&args.output_dir)
        };
        config.extractor = ExtractorConfig {
            cpu_component: args.cpu_component,
            memory_component: args.memory_component,
        };
        Ok(config)
    }
}
