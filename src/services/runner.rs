use std::fs;
use std::path::Path;

use crate::config::RunConfig;
use crate::document::{find_documents, load_document};
use crate::error::{AnalyzerError, Result};
use crate::models::Sample;
use crate::services::comparator::Comparator;
use crate::services::extractor::RecordExtractor;
use crate::state::RunState;

fn extract_file(extractor: &RecordExtractor, path: &Path) -> Result<Sample> {
    let document = load_document(path)?;
    Ok(extractor.extract(path.display().to_string(), &document))
}

/// 选择参考策略；固定基线文件必须存在且可解析
pub fn build_comparator(config: &RunConfig, extractor: &RecordExtractor) -> Result<Comparator> {
    let Some(baseline_path) = config.baseline.as_deref() else {
        return Ok(Comparator::chained(config.threshold_percent, config.chained_ram));
    };

    if !baseline_path.is_file() {
        return Err(AnalyzerError::BaselineNotFound(baseline_path.to_path_buf()));
    }
    log::info!("Loading baseline report {}", baseline_path.display());
    let baseline = extract_file(extractor, baseline_path)?;
    log::info!("Baseline CPU Usage: {:?}", baseline.cpu_utilization);
    Ok(Comparator::fixed(baseline, config.threshold_percent))
}

/// 顺序处理目录下的全部报告
///
/// 任意一份文档无法解析都会终止运行，不会产出残缺的报表。
pub fn execute(config: &RunConfig) -> Result<RunState> {
    let extractor = RecordExtractor::new(config.extractor.clone());
    let comparator = build_comparator(config, &extractor)?;

    let baseline = config
        .baseline
        .as_deref()
        .and_then(|path| fs::canonicalize(path).ok());

    let documents = find_documents(&config.directory, &config.extension)?;
    if documents.is_empty() {
        log::warn!(
            "No .{} reports found under {}",
            config.extension,
            config.directory.display()
        );
    }

    let mut state = RunState::new(comparator);
    for path in &documents {
        if baseline.is_some() && fs::canonicalize(path).ok() == baseline {
            log::debug!("Skipping baseline report {}", path.display());
            continue;
        }

        log::info!("--- Processing {} ---", path.display());
        let sample = extract_file(&extractor, path)?;
        log::info!("CPU Usage: {:?}", sample.cpu_utilization);
        if sample.is_empty() {
            log::debug!("No metrics found in {}", path.display());
        }

        let found = state.ingest(sample);
        if found > 0 {
            log::info!("{} significant change(s) in {}", found, path.display());
        }
    }

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComparisonMode, MetricKind};
    use tempfile::tempdir;

    fn report(cpu: &[f64], ram: &[f64]) -> String {
        let mut xml = String::from("<Report>\n");
        for value in cpu {
            xml.push_str(&format!(
                "<Item><Data name=\"component\">SysHealthCpuComponent</Data><Data name=\"util\">{}</Data></Item>\n",
                value
            ));
        }
        for value in ram {
            xml.push_str(&format!(
                "<Item><Data name=\"component\">SysHealthMemComponent</Data><Data name=\"util\">{}</Data>\
                 <Data name=\"detail\">Available: 2048 MB</Data></Item>\n",
                value
            ));
        }
        xml.push_str("<Process pid=\"4\" workingset=\"4096\" processname=\"System\"/>\n</Report>");
        xml
    }

    #[test]
    fn test_chained_run_over_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("01.xml"), report(&[10.0, 50.0], &[30.0])).unwrap();
        fs::write(dir.path().join("02.xml"), report(&[14.0, 45.0], &[60.0])).unwrap();
        fs::write(dir.path().join("readme.txt"), "not a report").unwrap();

        let config = RunConfig::new(dir.path(), 40.0, 16384.0);
        let state = execute(&config).unwrap();

        assert_eq!(state.comparator().mode(), ComparisonMode::Chained);
        assert_eq!(state.samples().len(), 2);
        assert_eq!(state.findings().len(), 1);
        assert_eq!(state.findings()[0].metric_kind, MetricKind::Cpu);
        assert!(state.findings()[0].sample_id.ends_with("02.xml"));
        assert_eq!(state.samples()[0].ram_available_mb, vec![2048]);
        assert_eq!(state.rank_processes().len(), 2);
    }

    #[test]
    fn test_fixed_baseline_run_skips_the_baseline_file() {
        let dir = tempdir().unwrap();
        let baseline = dir.path().join("00-baseline.xml");
        fs::write(&baseline, report(&[20.0], &[20.0])).unwrap();
        fs::write(dir.path().join("01.xml"), report(&[28.0], &[20.0])).unwrap();
        fs::write(dir.path().join("02.xml"), report(&[10.0], &[45.0])).unwrap();

        let mut config = RunConfig::new(dir.path(), 40.0, 16384.0);
        config.baseline = Some(baseline);
        let state = execute(&config).unwrap();

        assert_eq!(state.comparator().mode(), ComparisonMode::FixedBaseline);
        assert_eq!(state.samples().len(), 2);
        assert_eq!(state.findings().len(), 1);
        assert_eq!(state.findings()[0].metric_kind, MetricKind::Ram);
        assert_eq!(state.findings()[0].percent_delta, 125.0);
    }

    #[test]
    fn test_missing_baseline_is_fatal() {
        let dir = tempdir().unwrap();
        let mut config = RunConfig::new(dir.path(), 40.0, 16384.0);
        config.baseline = Some(dir.path().join("missing.xml"));
        assert!(matches!(
            execute(&config),
            Err(AnalyzerError::BaselineNotFound(_))
        ));
    }

    #[test]
    fn test_malformed_document_aborts_the_run() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("01.xml"), report(&[10.0], &[])).unwrap();
        fs::write(dir.path().join("02.xml"), "<Report><Item>").unwrap();

        let config = RunConfig::new(dir.path(), 40.0, 16384.0);
        match execute(&config) {
            Err(err @ AnalyzerError::Document { .. }) => assert!(err.to_string().contains("02.xml")),
            other => panic!("expected document error, got {:?}", other.map(|s| s.samples().len())),
        }
    }

    #[test]
    fn test_empty_directory_is_an_empty_run() {
        let dir = tempdir().unwrap();
        let state = execute(&RunConfig::new(dir.path(), 40.0, 16384.0)).unwrap();
        assert!(state.samples().is_empty());
        assert!(state.findings().is_empty());
        assert_eq!(state.summary().cpu_mean, 0.0);
    }

    #[test]
    fn test_rerun_is_identical() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.xml"), report(&[12.25, 3.5], &[40.0])).unwrap();
        fs::write(dir.path().join("b.xml"), report(&[1.0], &[41.0])).unwrap();
        let config = RunConfig::new(dir.path(), 10.0, 16384.0);

        let first = execute(&config).unwrap();
        let second = execute(&config).unwrap();
        assert_eq!(first.samples(), second.samples());
        assert_eq!(first.rank_processes(), second.rank_processes());
        assert_eq!(first.findings(), second.findings());
    }
}
