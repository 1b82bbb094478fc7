//! Console output: live progress line (stderr) and the final summary (stdout).

use volley_core::report::Summary;
use volley_core::ProgressStats;

pub(crate) fn format_progress(stats: &ProgressStats) -> String {
    format!(
        "  {} / {} requests sent ({:.1}%)  {} in flight  {:.1} req/s  elapsed {:.1}s",
        stats.claimed,
        stats.total,
        stats.fraction() * 100.0,
        stats.in_flight(),
        stats.requests_per_sec(),
        stats.elapsed_secs
    )
}

pub fn print_progress(stats: &ProgressStats) {
    eprint!("\r{}  ", format_progress(stats));
}

pub fn print_summary(summary: &Summary) {
    println!(
        "Time required to complete all requests: {:.3}s",
        summary.elapsed_secs
    );
    println!(
        "  Requests: {}  ok: {}  failed: {}  ({:.1} req/s, {} bytes received)",
        summary.total,
        summary.successes,
        summary.failures,
        summary.requests_per_sec,
        summary.bytes_received
    );
    if !summary.status_counts.is_empty() {
        println!("  Status codes:");
        for (status, count) in &summary.status_counts {
            println!("    {:>5}  {:>8}", status, count);
        }
    }
    if !summary.failure_counts.is_empty() {
        println!("  Failures:");
        for (kind, count) in &summary.failure_counts {
            println!("    {:<12}  {:>8}", kind, count);
        }
    }
    if let Some(lat) = &summary.latency {
        println!(
            "  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}",
            "min", "mean", "p50", "p90", "p99", "max"
        );
        println!(
            "  {:>8.2}  {:>8.2}  {:>8.2}  {:>8.2}  {:>8.2}  {:>8.2}  (ms)",
            lat.min_ms, lat.mean_ms, lat.p50_ms, lat.p90_ms, lat.p99_ms, lat.max_ms
        );
    }
}
