use std::io::{BufRead, Write};

use crate::error::{AnalyzerError, Result};

/// 直接回车时使用的阈值
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 40.0;

pub fn parse_threshold(text: &str) -> Result<f64> {
    let trimmed = text.trim().trim_end_matches('%').trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AnalyzerError::InvalidThreshold(text.trim().to_string())),
    }
}

/// 交互读取阈值；直接回车使用默认值
pub fn prompt_threshold<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<f64> {
    let io_error = |source| AnalyzerError::Read {
        path: "<stdin>".into(),
        source,
    };

    write!(
        output,
        "Enter the significant-change threshold in percent [{}]: ",
        DEFAULT_THRESHOLD_PERCENT
    )
    .and_then(|_| output.flush())
    .map_err(io_error)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(io_error)?;

    if line.trim().is_empty() {
        return Ok(DEFAULT_THRESHOLD_PERCENT);
    }
    parse_threshold(&line)
}
