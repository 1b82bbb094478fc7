//! `volley run <url>` – dispatch the load and report.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use volley_core::config::VolleyConfig;
use volley_core::report::{Summary, SummaryBuilder};
use volley_core::request::parse_header;
use volley_core::{
    CurlTransport, Dispatcher, ProgressStats, RequestTemplate, Transport, TransportOptions,
};

use crate::cli::render;
use crate::cli::RunArgs;

/// Lower bound for the progress refresh so a zero interval doesn't spin.
const MIN_INTERVAL_MS: u64 = 10;

/// Builds the request every worker sends from CLI arguments.
pub(crate) fn build_template(args: &RunArgs) -> Result<RequestTemplate> {
    let mut template = RequestTemplate::new(args.method, &args.url)
        .with_context(|| format!("invalid target {}", args.url))?;
    for line in &args.headers {
        let (name, value) = parse_header(line)?;
        template = template.header(name, value);
    }
    if let Some(data) = &args.data {
        template = template.body(data.as_bytes());
    }
    Ok(template)
}

/// Runs the dispatcher on a blocking task and calls `on_tick` with a fresh
/// snapshot every `interval` until that task finishes. Returns once every
/// outcome has been drained into the summary.
pub(crate) async fn drive<T, F>(
    dispatcher: Arc<Dispatcher<T>>,
    interval: Duration,
    mut on_tick: F,
) -> Result<Summary>
where
    T: Transport + 'static,
    F: FnMut(&ProgressStats),
{
    let start = Instant::now();
    let mut task = tokio::task::spawn_blocking({
        let dispatcher = Arc::clone(&dispatcher);
        move || {
            let mut summary = SummaryBuilder::new();
            for outcome in dispatcher.run_to_completion() {
                summary.record(&outcome);
            }
            summary
        }
    });

    // Poll until the dispatch task itself finishes; progress is only for display.
    let mut ticker = tokio::time::interval(interval);
    let summary = loop {
        tokio::select! {
            res = &mut task => break res.context("dispatch task join")?,
            _ = ticker.tick() => on_tick(&dispatcher.snapshot()),
        }
    };

    let elapsed = dispatcher.run_duration().unwrap_or_else(|| start.elapsed());
    Ok(summary.finish(elapsed))
}

pub async fn run_load(cfg: &VolleyConfig, args: RunArgs) -> Result<()> {
    let template = build_template(&args)?;
    let total = args.requests.unwrap_or(cfg.requests);
    let concurrency = args.concurrency.unwrap_or(cfg.concurrency);
    let interval_ms = args
        .interval_ms
        .unwrap_or(cfg.progress_interval_ms)
        .max(MIN_INTERVAL_MS);

    let transport = CurlTransport::new(TransportOptions::from_config(cfg));
    let dispatcher = Arc::new(
        Dispatcher::new(template, total, concurrency, transport)
            .context("invalid run parameters")?,
    );
    tracing::info!(total, concurrency, url = %args.url, "starting run");

    let quiet = args.quiet;
    let summary = drive(
        Arc::clone(&dispatcher),
        Duration::from_millis(interval_ms),
        |stats| {
            if !quiet {
                render::print_progress(stats);
            }
        },
    )
    .await?;
    if !quiet {
        render::print_progress(&dispatcher.snapshot());
        eprintln!();
    }
    tracing::info!(
        successes = summary.successes,
        failures = summary.failures,
        elapsed_secs = summary.elapsed_secs,
        "run completed"
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serialize summary")?
        );
    } else {
        render::print_summary(&summary);
    }
    Ok(())
}
