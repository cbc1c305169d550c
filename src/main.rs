use anyhow::Context;
use clap::Parser;

mod cli;
mod config;
mod document;
mod error;
mod metrics;
mod models;
mod report;
mod services;
mod state;

use cli::CommandArgs;
use config::RunConfig;
use report::{writer, ReportAssembler};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CommandArgs::parse();
    let config = RunConfig::from_args(args).context("invalid configuration")?;

    print_banner(&config);

    let state = match services::execute(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("❌ Run aborted: {}", e);
            let mut current_error: Option<&dyn std::error::Error> = std::error::Error::source(&e);
            while let Some(err) = current_error {
                log::error!("     - {}", err);
                current_error = err.source();
            }
            return Err(e.into());
        }
    };

    let reports = ReportAssembler::new(config.total_memory_mb).assemble(&state);
    writer::write_reports(&config.output, &reports)?;

    let stats = &reports.summary.stats;
    log::info!(
        "CPU mean {:.2}% (variance {:.2}), RAM mean {:.2}% (variance {:.2}) over {} reading(s)",
        stats.cpu_mean,
        stats.cpu_variance,
        stats.ram_mean,
        stats.ram_variance,
        stats.sample_count
    );

    print_summary(&config, &reports);
    Ok(())
}

fn print_banner(config: &RunConfig) {
    println!("═══════════════════════════════════════════════════════════");
    println!("  perf-delta v{}", env!("CARGO_PKG_VERSION"));
    println!("═══════════════════════════════════════════════════════════");
    println!("  Reports:      {} (*.{})", config.directory.display(), config.extension);
    match &config.baseline {
        Some(baseline) => println!("  Mode:         fixed baseline ({})", baseline.display()),
        None => println!("  Mode:         chained"),
    }
    println!("  Threshold:    {}%", config.threshold_percent);
    println!("  Total memory: {:.0} MB", config.total_memory_mb);
    println!();
}

fn print_summary(config: &RunConfig, reports: &report::ReportSet) {
    println!();
    if reports.has_findings() {
        println!(
            "Report generated successfully: {}",
            config.output.change_log.display()
        );
    } else if reports.summary.compared_ram {
        println!("No significant CPU/RAM usage increases detected.");
    } else {
        println!("No significant CPU usage increases detected.");
    }
    println!("📋 Process report:        {}", config.output.table.display());
    println!("📋 Process memory detail: {}", config.output.process_detail.display());
    if let Some(path) = &config.output.json_summary {
        println!("📋 JSON summary:          {}", path.display());
    }
    if let Some(path) = &config.output.metrics_file {
        println!("📋 Metrics file:          {}", path.display());
    }
}
