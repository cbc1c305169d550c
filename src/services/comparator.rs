use crate::models::{ComparisonMode, DeltaFinding, MetricKind, Sample};

/// 百分比变化；参考值 <= 0 时不可比较
pub fn percent_delta(reference: f64, current: f64) -> Option<f64> {
    if reference <= 0.0 {
        return None;
    }
    Some((current - reference) / reference * 100.0)
}

/// 按位置逐一比较两个序列，较长一方多出的部分忽略
fn compare_series(
    kind: MetricKind,
    reference: &[f64],
    current: &[f64],
    current_id: &str,
    threshold_percent: f64,
    mode: ComparisonMode,
    findings: &mut Vec<DeltaFinding>,
) {
    for (&reference_value, &current_value) in reference.iter().zip(current) {
        let Some(delta) = percent_delta(reference_value, current_value) else {
            continue;
        };
        if mode.is_significant(delta, threshold_percent) {
            findings.push(DeltaFinding {
                sample_id: current_id.to_string(),
                metric_kind: kind,
                reference_value,
                current_value,
                percent_delta: delta,
            });
        }
    }
}

/// 比较一对样本
pub fn compare(
    reference: &Sample,
    current: &Sample,
    threshold_percent: f64,
    mode: ComparisonMode,
    compare_ram: bool,
) -> Vec<DeltaFinding> {
    let mut findings = Vec::new();
    compare_series(
        MetricKind::Cpu,
        &reference.cpu_utilization,
        &current.cpu_utilization,
        &current.id,
        threshold_percent,
        mode,
        &mut findings,
    );
    if compare_ram {
        compare_series(
            MetricKind::Ram,
            &reference.ram_utilization,
            &current.ram_utilization,
            &current.id,
            threshold_percent,
            mode,
            &mut findings,
        );
    }
    findings
}

/// 参考点
#[derive(Debug, Clone)]
pub enum Reference {
    /// 前一个样本
    Previous,
    /// 固定的基线样本
    Fixed(Box<Sample>),
}

/// 在一次运行中为每个样本选择参考点并比较
#[derive(Debug, Clone)]
pub struct Comparator {
    reference: Reference,
    threshold_percent: f64,
    compare_ram: bool,
}

impl Comparator {
    /// 链式模式；默认只比较 CPU
    pub fn chained(threshold_percent: f64, compare_ram: bool) -> Self {
        Self {
            reference: Reference::Previous,
            threshold_percent,
            compare_ram,
        }
    }

    /// 固定基线模式；CPU 与内存都比较
    pub fn fixed(baseline: Sample, threshold_percent: f64) -> Self {
        Self {
            reference: Reference::Fixed(Box::new(baseline)),
            threshold_percent,
            compare_ram: true,
        }
    }

    pub fn mode(&self) -> ComparisonMode {
        match self.reference {
            Reference::Previous => ComparisonMode::Chained,
            Reference::Fixed(_) => ComparisonMode::FixedBaseline,
        }
    }

    pub fn threshold_percent(&self) -> f64 {
        self.threshold_percent
    }

    pub fn compares_ram(&self) -> bool {
        self.compare_ram
    }

    pub fn baseline(&self) -> Option<&Sample> {
        match &self.reference {
            Reference::Previous => None,
            Reference::Fixed(baseline) => Some(baseline),
        }
    }

    /// `previous` 为运行中紧邻的上一个样本（第一个样本时为 None）
    pub fn observe(&self, previous: Option<&Sample>, current: &Sample) -> Vec<DeltaFinding> {
        let reference = match &self.reference {
            Reference::Previous => previous,
            Reference::Fixed(baseline) => Some(baseline.as_ref()),
        };
        let Some(reference) = reference else {
            return Vec::new();
        };

        compare(
            reference,
            current,
            self.threshold_percent,
            self.mode(),
            self.compare_ram,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu(id: &str, values: &[f64]) -> Sample {
        Sample {
            cpu_utilization: values.to_vec(),
            ..Sample::new(id)
        }
    }

    fn cpu_ram(id: &str, cpu: &[f64], ram: &[f64]) -> Sample {
        Sample {
            cpu_utilization: cpu.to_vec(),
            ram_utilization: ram.to_vec(),
            ..Sample::new(id)
        }
    }

    #[test]
    fn test_chained_threshold_is_inclusive() {
        let reference = cpu("a", &[10.0, 50.0]);
        let current = cpu("b", &[14.0, 45.0]);

        let findings = compare(&reference, &current, 40.0, ComparisonMode::Chained, false);
        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.sample_id, "b");
        assert_eq!(finding.metric_kind, MetricKind::Cpu);
        assert_eq!(finding.reference_value, 10.0);
        assert_eq!(finding.current_value, 14.0);
        assert!((finding.percent_delta - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_fixed_baseline_threshold_is_strict() {
        let comparator = Comparator::fixed(cpu("baseline", &[20.0]), 40.0);
        assert!(comparator.observe(None, &cpu("r1", &[28.0])).is_empty());

        let findings = comparator.observe(None, &cpu("r2", &[28.2]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].reference_value, 20.0);
    }

    #[test]
    fn test_non_positive_reference_is_skipped() {
        for reference in [0.0, -5.0] {
            let findings = compare(
                &cpu("a", &[reference]),
                &cpu("b", &[1000.0]),
                0.0,
                ComparisonMode::Chained,
                false,
            );
            assert!(findings.is_empty());
        }
        assert_eq!(percent_delta(0.0, 10.0), None);
        assert_eq!(percent_delta(50.0, 25.0), Some(-50.0));
    }

    #[test]
    fn test_unmatched_tail_positions_are_ignored() {
        let short = cpu("short", &[10.0]);
        let long = cpu("long", &[10.0, 1.0, 2.0]);
        let grown = cpu("grown", &[20.0, 90.0, 90.0]);

        assert_eq!(compare(&short, &grown, 40.0, ComparisonMode::Chained, false).len(), 1);
        assert_eq!(compare(&long, &short, 40.0, ComparisonMode::Chained, false).len(), 0);
        assert!(compare(&cpu("empty", &[]), &grown, 40.0, ComparisonMode::Chained, false).is_empty());
    }

    #[test]
    fn test_chained_first_sample_has_no_reference() {
        let comparator = Comparator::chained(0.0, false);
        assert_eq!(comparator.mode(), ComparisonMode::Chained);
        assert!(comparator.observe(None, &cpu("first", &[99.0])).is_empty());

        let previous = cpu("first", &[10.0]);
        assert_eq!(comparator.observe(Some(&previous), &cpu("second", &[20.0])).len(), 1);
    }

    #[test]
    fn test_ram_comparison_by_mode() {
        let previous = cpu_ram("a", &[10.0], &[20.0]);
        let current = cpu_ram("b", &[10.0], &[40.0]);

        let cpu_only = Comparator::chained(40.0, false);
        assert!(cpu_only.observe(Some(&previous), &current).is_empty());

        let with_ram = Comparator::chained(40.0, true);
        let findings = with_ram.observe(Some(&previous), &current);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].metric_kind, MetricKind::Ram);
        assert_eq!(findings[0].percent_delta, 100.0);

        let fixed = Comparator::fixed(previous.clone(), 40.0);
        assert!(fixed.compares_ram());
        let findings = fixed.observe(Some(&cpu_ram("ignored", &[1.0], &[1.0])), &current);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].reference_value, 20.0);
    }

    #[test]
    fn test_fixed_baseline_ignores_previous_sample() {
        let comparator = Comparator::fixed(cpu("baseline", &[10.0]), 40.0);
        let previous = cpu("prev", &[100.0]);
        let findings = comparator.observe(Some(&previous), &cpu("cur", &[15.0]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].reference_value, 10.0);
        assert_eq!(comparator.baseline().map(|b| b.id.as_str()), Some("baseline"));
    }
}
