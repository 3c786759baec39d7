//! `stormwatch check`: one alert cycle, on demand.

use tabled::Tabled;

use stormwatch_core::{CycleSummary, FileStore, SubscriberFailure, build_runner};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&SubscriberFailure> for FailureRow {
    fn from(f: &SubscriberFailure) -> Self {
        Self {
            address: f.address.clone(),
            city: f.city.clone(),
            stage: f.stage.to_string(),
            error: f.error.clone(),
        }
    }
}

fn detail(summary: &CycleSummary) -> String {
    let mut out = output::detail_block(&[
        ("Subscribers", summary.total.to_string()),
        ("Processed", summary.processed.to_string()),
        ("Skipped", summary.skipped.to_string()),
        ("Notified", summary.notified.to_string()),
        ("Quiet", summary.quiet.to_string()),
        ("Failed", summary.failed.to_string()),
        ("Cancelled", summary.cancelled.to_string()),
        ("Duration", format!("{}ms", summary.duration().num_milliseconds())),
    ]);
    if summary.has_failures() {
        let rows: Vec<FailureRow> = summary.failures.iter().map(FailureRow::from).collect();
        out.push_str("\n\n");
        out.push_str(
            &tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string(),
        );
    }
    out
}

fn plain(summary: &CycleSummary) -> String {
    format!(
        "total={} processed={} skipped={} notified={} quiet={} failed={}",
        summary.total,
        summary.processed,
        summary.skipped,
        summary.notified,
        summary.quiet,
        summary.failed
    )
}

pub async fn handle(args: CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let engine = config::engine_config(global, &cfg)?;
    let runner = build_runner(&engine, FileStore::new(config::store_path(global, &cfg)))?;

    let summary = runner.run_once().await?;

    let out = output::render_single(global.output, &summary, detail, plain)?;
    output::print_output(&out, global.quiet);

    if args.strict && summary.has_failures() {
        return Err(CliError::CycleFailures {
            failed: summary.failed,
        });
    }
    Ok(())
}
