use audit_page::{Audit, AuditReport, LlmInsights, PerformanceSignals};
use clap::Parser;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(&args).await {
        Ok(report) => {
            let json = if args.pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            };
            match json {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    ::log::error!("Failed to serialize report: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            ::log::error!("Audit failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> audit_page::Result<AuditReport> {
    // Every input file is read before any crawling starts
    let mut audit = Audit::new(&args.url);
    if let Some(path) = &args.config {
        audit = audit.with_config_file(path)?;
    }
    audit = args.apply(audit);

    if let Some(path) = &args.signals {
        audit = audit.with_signals(PerformanceSignals::from_file(path)?);
    }
    if let Some(path) = &args.insights {
        audit = audit.with_insights(LlmInsights::from_file(path)?);
    }

    ::log::info!("Starting audit for: {}", args.url);
    let start_time = std::time::Instant::now();

    let report = audit.run().await?;

    ::log::info!(
        "Audit complete - {} pages, {} errors in {:.2} seconds",
        report.crawl.pages.len(),
        report.crawl.errors.len(),
        start_time.elapsed().as_secs_f64()
    );
    Ok(report)
}
