use serde::Serialize;

use crate::models::Sample;

/// 一次运行内的累加器
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    /// CPU 使用率之和
    pub total_cpu: f64,

    /// 内存使用率之和
    pub total_ram_percent: f64,

    /// 读数个数（以 CPU 读数为准）
    pub sample_count: usize,

    /// 全部 CPU 读数，用于计算方差
    pub all_cpu_values: Vec<f64>,

    /// 全部内存读数，用于计算方差
    pub all_ram_values: Vec<f64>,
}

impl RunningStats {
    /// 创建一个空的累加器
    pub fn empty() -> Self {
        Self::default()
    }

    /// 累加一个样本的全部读数
    pub fn accumulate(&mut self, sample: &Sample) {
        for &cpu in &sample.cpu_utilization {
            self.total_cpu += cpu;
            self.sample_count += 1;
        }
        for &ram in &sample.ram_utilization {
            self.total_ram_percent += ram;
        }
        self.all_cpu_values.extend_from_slice(&sample.cpu_utilization);
        self.all_ram_values.extend_from_slice(&sample.ram_utilization);
    }

    /// (cpu_mean, ram_mean)；没有读数时均为 0
    pub fn mean(&self) -> (f64, f64) {
        if self.sample_count == 0 {
            return (0.0, 0.0);
        }
        let n = self.sample_count as f64;
        (self.total_cpu / n, self.total_ram_percent / n)
    }

    pub fn summary(&self) -> StatsSummary {
        let (cpu_mean, ram_mean) = self.mean();
        StatsSummary {
            sample_count: self.sample_count,
            cpu_mean,
            cpu_variance: variance(&self.all_cpu_values, cpu_mean),
            ram_mean,
            ram_variance: variance(&self.all_ram_values, ram_mean),
        }
    }
}

/// 总体方差；少于两个点时定义为 0
pub fn variance(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let sum: f64 = values.iter().map(|x| (x - mean).powi(2)).sum();
    sum / values.len() as f64
}

/// 运行结束时的均值与方差
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub sample_count: usize,
    pub cpu_mean: f64,
    pub cpu_variance: f64,
    pub ram_mean: f64,
    pub ram_variance: f64,
}
