use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;
use subprobe_common::{config::Config, network::{Host, Outcome}};
use subprobe_core::export;
use subprobe_core::probe::HttpProbe;
use subprobe_core::scanner::{BatchCoordinator, BatchError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, warn};

use crate::mprint;
use crate::terminal::format::Tally;
use crate::terminal::{colors, print, spinner::ProgressObserver};

/// Probes `hosts`, prints the ranked results and optionally saves them.
pub async fn probe_hosts(
    hosts: Vec<Host>,
    args: &super::ProbeArgs,
    cfg: &Config,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    if hosts.is_empty() {
        print::header("zero hosts to probe", cfg.quiet);
        print::no_hosts();
        if let Some(path) = output {
            save_results(path, &[])?;
        }
        return Ok(());
    }

    let probe_cfg = args.to_config();
    let total = hosts.len();
    let span = info_span!("probing", indicatif.pb_show = true);

    let probe = Arc::new(HttpProbe::new().context("building http client")?);
    let mut coordinator = BatchCoordinator::new(&probe_cfg, probe)?
        .with_observer(Arc::new(ProgressObserver::new(span.clone())?));
    if let Some(hook) = args.hook()? {
        coordinator = coordinator.with_hook(Arc::new(hook));
    }

    print::header(
        &format!("checking hosts with {} requests", probe_cfg.method),
        cfg.quiet,
    );

    let cancel = CancellationToken::new();
    let interrupt = listen_for_interrupt(cancel.clone());
    let start_time = Instant::now();

    let outcome = coordinator.run(hosts, &cancel).instrument(span).await;
    interrupt.abort();
    drop(coordinator);

    let results = match outcome {
        Ok(results) => results,
        Err(BatchError::Cancelled { results, total }) => {
            warn!("Interrupted: {} of {total} hosts were probed", results.len());
            results
        }
        Err(e) => return Err(e.into()),
    };
    info!("All hosts processed.");

    let ranked = results.ranked();
    probing_ends(&ranked, total, start_time.elapsed(), cfg);

    if let Some(path) = output {
        save_results(path, &ranked)?;
        info!("Results saved to: {}", path.display());
    }
    Ok(())
}

fn listen_for_interrupt(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Stopping: waiting for in-flight probes to unwind");
            cancel.cancel();
        }
    })
}

fn probing_ends(ranked: &[Outcome], total: usize, total_time: Duration, cfg: &Config) {
    if cfg.quiet >= 2 {
        for record in export::to_records(ranked) {
            print::print(&record.to_string());
        }
        return;
    }

    print::header("probe results", cfg.quiet);
    print_outcomes(ranked);
    print_summary(&Tally::from_outcomes(ranked), total, total_time, cfg);
}

fn print_outcomes(ranked: &[Outcome]) {
    let key_width = print::host_column_width(ranked);
    for outcome in ranked {
        print::outcome_line(outcome, key_width);
    }
}

fn print_summary(tally: &Tally, total: usize, total_time: Duration, cfg: &Config) {
    let responsive: ColoredString = format!("{} responsive", tally.responsive).bold().green();
    let failed: ColoredString = format!(
        "{} timeouts, {} connection errors",
        tally.timeouts, tally.connection_errors
    )
    .bright_black();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString = &format!(
        "Probed {total} hosts in {total_time}: {responsive}, {failed}"
    )
    .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::summary(&output.to_string());
        }
        _ => {
            mprint!();
            info!("{}", output)
        }
    }
}

fn save_results(path: &Path, ranked: &[Outcome]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    export::write_lines(BufWriter::new(file), &export::to_records(ranked))
        .with_context(|| format!("writing results to {}", path.display()))
}
