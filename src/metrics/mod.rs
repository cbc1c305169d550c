use prometheus::{
    register_gauge_vec_with_registry, register_gauge_with_registry, Encoder, Gauge, GaugeVec,
    Opts, Registry, TextEncoder,
};

use crate::error::ReportError;
use crate::report::ReportSet;

/// 单次运行的 Prometheus 指标，供 node-exporter textfile collector 读取
///
/// 每次运行使用独立的 Registry。
pub struct RunMetrics {
    registry: Registry,

    pub documents_total: Gauge,
    pub samples_total: Gauge,
    pub threshold_percent: Gauge,
    pub cpu_mean: Gauge,
    pub cpu_variance: Gauge,
    pub ram_mean: Gauge,
    pub ram_variance: Gauge,
    pub findings: GaugeVec,
    pub process_working_set_mb: GaugeVec,
}

impl RunMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let documents_total = register_gauge_with_registry!(
            Opts::new("perf_delta_documents_total", "Reports processed in the run"),
            registry
        )?;

        let samples_total = register_gauge_with_registry!(
            Opts::new("perf_delta_samples_total", "CPU readings aggregated in the run"),
            registry
        )?;

        let threshold_percent = register_gauge_with_registry!(
            Opts::new("perf_delta_threshold_percent", "Significant-change threshold"),
            registry
        )?;

        let cpu_mean = register_gauge_with_registry!(
            Opts::new("perf_delta_cpu_utilization_mean_percent", "Mean CPU utilization"),
            registry
        )?;

        let cpu_variance = register_gauge_with_registry!(
            Opts::new("perf_delta_cpu_utilization_variance", "Population variance of CPU utilization"),
            registry
        )?;

        let ram_mean = register_gauge_with_registry!(
            Opts::new("perf_delta_ram_utilization_mean_percent", "Mean RAM utilization"),
            registry
        )?;

        let ram_variance = register_gauge_with_registry!(
            Opts::new("perf_delta_ram_utilization_variance", "Population variance of RAM utilization"),
            registry
        )?;

        let findings = register_gauge_vec_with_registry!(
            Opts::new("perf_delta_findings", "Significant changes detected"),
            &["metric"],
            registry
        )?;

        let process_working_set_mb = register_gauge_vec_with_registry!(
            Opts::new("perf_delta_process_working_set_mb", "Process working set in MB"),
            &["pid", "name", "sample"],
            registry
        )?;

        Ok(Self {
            registry,
            documents_total,
            samples_total,
            threshold_percent,
            cpu_mean,
            cpu_variance,
            ram_mean,
            ram_variance,
            findings,
            process_working_set_mb,
        })
    }

    pub fn record(&self, reports: &ReportSet) {
        let summary = &reports.summary;

        self.documents_total.set(summary.documents as f64);
        self.samples_total.set(summary.stats.sample_count as f64);
        self.threshold_percent.set(summary.threshold_percent);
        self.cpu_mean.set(summary.stats.cpu_mean);
        self.cpu_variance.set(summary.stats.cpu_variance);
        self.ram_mean.set(summary.stats.ram_mean);
        self.ram_variance.set(summary.stats.ram_variance);

        self.findings
            .with_label_values(&["CPU"])
            .set(summary.cpu_findings as f64);
        self.findings
            .with_label_values(&["RAM"])
            .set(summary.ram_findings as f64);

        // 同一 (pid, name, sample) 只保留一个值
        for row in &reports.rows {
            self.process_working_set_mb
                .with_label_values(&[&row.pid.to_string(), &row.process_name, &row.sample_id])
                .set(row.working_set_mb);
        }
    }

    pub fn render(&self) -> Result<String, ReportError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
