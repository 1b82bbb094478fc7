//! Claim-and-execute loop run by each pool thread.

use std::sync::atomic::Ordering;
use std::sync::mpsc::SyncSender;
use std::time::Instant;

use crate::outcome::Outcome;
use crate::transport::Transport;

use super::WorkPlan;

/// Claims work until none is left. The claim is a single atomic step; the
/// request itself runs with nothing held. Failures are emitted like any other
/// outcome and never end the loop. Returns the number of claims won.
pub(super) fn run_worker<T: Transport + ?Sized>(
    id: usize,
    plan: &WorkPlan,
    transport: &T,
    tx: SyncSender<Outcome>,
) -> u64 {
    let mut claims = 0u64;
    while let Some(claim) = plan.claim() {
        claims += 1;
        let start = Instant::now();
        let result = transport.execute(&plan.template);
        let elapsed = start.elapsed();
        if let Err(e) = &result {
            tracing::trace!(worker = id, claim, error = %e, "request failed");
        }
        // Capacity equals the request count, so this never blocks; the
        // receiver outlives every worker.
        let _ = tx.send(Outcome {
            claim,
            elapsed,
            result,
        });
        plan.completed.fetch_add(1, Ordering::AcqRel);
    }
    tracing::debug!(worker = id, claims, "worker exiting");
    claims
}
