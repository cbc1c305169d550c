use std::path::PathBuf;
use thiserror::Error;

/// 文档无法构造成标签树
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("unbalanced element structure near </{0}>")]
    Unbalanced(String),

    #[error("document has no root element")]
    Empty,
}

/// 一次运行中的致命错误；字段级问题不在此列
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("baseline document not found: {0}")]
    BaselineNotFound(PathBuf),

    #[error("invalid threshold {0:?}: expected a finite percentage")]
    InvalidThreshold(String),

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: ReportError,
    },
}

/// 报表输出失败
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T, E = AnalyzerError> = std::result::Result<T, E>;
