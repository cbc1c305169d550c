use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::OutputPaths;
use crate::error::{AnalyzerError, ReportError, Result};
use crate::metrics::RunMetrics;
use crate::report::{ReportSet, TableRow, PROCESS_DETAIL_HEADER, TABLE_HEADER};

fn create(path: &Path) -> Result<File, ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

fn at(path: &Path) -> impl FnOnce(ReportError) -> AnalyzerError + '_ {
    move |source| AnalyzerError::Report {
        path: path.to_path_buf(),
        source,
    }
}

/// 表格报表；表头总会写出
pub fn write_table(path: &Path, rows: &[TableRow]) -> Result<()> {
    let write = || -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_writer(create(path)?);
        wtr.write_record(TABLE_HEADER)?;
        for row in rows {
            wtr.write_record(row.to_record())?;
        }
        wtr.flush()?;
        Ok(())
    };
    write().map_err(at(path))
}

/// 逐行写出文本；行数为 0 时得到空文件
pub fn write_lines(path: &Path, header: Option<&str>, lines: &[String]) -> Result<()> {
    let write = || -> Result<(), ReportError> {
        let mut out = BufWriter::new(create(path)?);
        if let Some(header) = header {
            writeln!(out, "{}", header)?;
        }
        for line in lines {
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        Ok(())
    };
    write().map_err(at(path))
}

pub fn write_json_summary(path: &Path, reports: &ReportSet) -> Result<()> {
    let write = || -> Result<(), ReportError> {
        let mut out = BufWriter::new(create(path)?);
        serde_json::to_writer_pretty(&mut out, &reports.summary)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    };
    write().map_err(at(path))
}

pub fn write_metrics(path: &Path, reports: &ReportSet) -> Result<()> {
    let write = || -> Result<(), ReportError> {
        let metrics = RunMetrics::new()?;
        metrics.record(reports);
        let rendered = metrics.render()?;
        create(path)?.write_all(rendered.as_bytes())?;
        Ok(())
    };
    write().map_err(at(path))
}

/// 写出全部报表
pub fn write_reports(paths: &OutputPaths, reports: &ReportSet) -> Result<()> {
    write_table(&paths.table, &reports.rows)?;
    write_lines(&paths.change_log, None, &reports.change_log)?;
    write_lines(
        &paths.process_detail,
        Some(PROCESS_DETAIL_HEADER),
        &reports.process_detail,
    )?;

    if let Some(path) = &paths.json_summary {
        write_json_summary(path, reports)?;
    }
    if let Some(path) = &paths.metrics_file {
        write_metrics(path, reports)?;
    }
    Ok(())
}
