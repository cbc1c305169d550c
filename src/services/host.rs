use sysinfo::System;

/// 无法读取主机内存时使用的容量 (MB)
pub const FALLBACK_TOTAL_MEMORY_MB: f64 = 16384.0;

/// 读取本机物理内存总量 (MB)
pub fn detect_total_memory_mb() -> Option<f64> {
    let mut sys = System::new();
    sys.refresh_memory();

    let total_bytes = sys.total_memory();
    if total_bytes == 0 {
        return None;
    }
    Some(total_bytes as f64 / 1024.0 / 1024.0)
}

/// 显式配置优先，其次是本机内存，最后是固定的后备值
pub fn resolve_total_memory_mb(configured: Option<f64>) -> f64 {
    if let Some(total) = configured {
        return total;
    }
    match detect_total_memory_mb() {
        Some(total) => {
            log::debug!("Detected host memory: {:.0} MB", total);
            total
        }
        None => {
            log::warn!(
                "Could not read host memory, assuming {} MB",
                FALLBACK_TOTAL_MEMORY_MB
            );
            FALLBACK_TOTAL_MEMORY_MB
        }
    }
}
