//! Request dispatch engine.
//!
//! A `Dispatcher` owns the work plan (template, request count, concurrency and
//! the shared claim counter) and runs a fixed pool of worker threads that race
//! to claim units of work. Each claim produces exactly one `Outcome` on a
//! channel pre-sized to the request count, so workers never block on it.
//! Progress is a pure read of the claim counter and can be polled from any
//! thread while a run is in progress.

mod worker;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::PlanError;
use crate::outcome::Outcome;
use crate::progress::{self, ProgressStats};
use crate::request::RequestTemplate;
use crate::transport::Transport;

/// Immutable run configuration plus the shared counters.
#[derive(Debug)]
struct WorkPlan {
    template: RequestTemplate,
    total_count: u64,
    concurrency: usize,
    /// `total_count` as a channel capacity.
    capacity: usize,
    /// Claims handed out; never exceeds `total_count`.
    claimed: AtomicU64,
    /// Outcomes emitted.
    completed: AtomicU64,
}

impl WorkPlan {
    /// Reserve the next unit of work. Returns its 1-based claim number, or
    /// `None` once every unit has been claimed.
    fn claim(&self) -> Option<u64> {
        self.claimed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.total_count).then_some(n + 1)
            })
            .ok()
            .map(|prev| prev + 1)
    }
}

/// Runs `total_count` copies of one request across `concurrency` worker threads.
#[derive(Debug)]
pub struct Dispatcher<T> {
    plan: WorkPlan,
    transport: T,
    started: OnceLock<Instant>,
    finished: OnceLock<Duration>,
}

impl<T: Transport> Dispatcher<T> {
    /// Builds a dispatcher. Fails if `concurrency` is 0 or the count cannot
    /// size the output channel.
    pub fn new(
        template: RequestTemplate,
        total_count: u64,
        concurrency: usize,
        transport: T,
    ) -> Result<Self, PlanError> {
        if concurrency == 0 {
            return Err(PlanError::ZeroConcurrency);
        }
        let capacity =
            usize::try_from(total_count).map_err(|_| PlanError::CountTooLarge(total_count))?;
        Ok(Self {
            plan: WorkPlan {
                template,
                total_count,
                concurrency,
                capacity,
                claimed: AtomicU64::new(0),
                completed: AtomicU64::new(0),
            },
            transport,
            started: OnceLock::new(),
            finished: OnceLock::new(),
        })
    }

    /// Spawns `concurrency` workers and blocks until all of them have exited.
    ///
    /// The returned receiver already holds exactly `total_count` outcomes and
    /// is disconnected: iterating it ends after the last one. A second call
    /// finds no work left and returns an empty receiver.
    ///
    /// If a worker panics, the remaining workers are joined and the panic is
    /// resumed on the caller.
    pub fn run_to_completion(&self) -> Receiver<Outcome> {
        let plan = &self.plan;
        let transport = &self.transport;
        let (tx, rx) = mpsc::sync_channel(plan.capacity);
        let started = *self.started.get_or_init(Instant::now);

        tracing::info!(
            total = plan.total_count,
            concurrency = plan.concurrency,
            method = %plan.template.method(),
            url = %plan.template.url(),
            "dispatch started"
        );

        thread::scope(|s| {
            let handles: Vec<_> = (0..plan.concurrency)
                .map(|id| {
                    let tx = tx.clone();
                    s.spawn(move || worker::run_worker(id, plan, transport, tx))
                })
                .collect();
            // Workers hold the only senders now; the channel closes when the last one exits.
            drop(tx);

            let mut panic_payload = None;
            for (id, h) in handles.into_iter().enumerate() {
                if let Err(payload) = h.join() {
                    tracing::error!(worker = id, "worker panicked");
                    panic_payload.get_or_insert(payload);
                }
            }
            if let Some(payload) = panic_payload {
                std::panic::resume_unwind(payload);
            }
        });

        let elapsed = started.elapsed();
        let _ = self.finished.set(elapsed);
        tracing::info!(
            completed = plan.completed.load(Ordering::Acquire),
            elapsed_ms = elapsed.as_millis() as u64,
            "dispatch finished"
        );
        rx
    }

    /// Fraction of requests claimed, in [0.0, 1.0]. Safe to call from any
    /// thread at any time; 1.0 when there is no work at all.
    pub fn progress(&self) -> f64 {
        progress::fraction(self.plan.claimed.load(Ordering::Acquire), self.plan.total_count)
    }

    /// Claimed/completed counts and elapsed time.
    pub fn snapshot(&self) -> ProgressStats {
        let elapsed_secs = match (self.finished.get(), self.started.get()) {
            (Some(done), _) => done.as_secs_f64(),
            (None, Some(start)) => start.elapsed().as_secs_f64(),
            (None, None) => 0.0,
        };
        ProgressStats {
            claimed: self.plan.claimed.load(Ordering::Acquire),
            completed: self.plan.completed.load(Ordering::Acquire),
            total: self.plan.total_count,
            elapsed_secs,
        }
    }

    /// Wall time of the finished run, if it has finished.
    pub fn run_duration(&self) -> Option<Duration> {
        self.finished.get().copied()
    }

    pub fn total_count(&self) -> u64 {
        self.plan.total_count
    }

    pub fn concurrency(&self) -> usize {
        self.plan.concurrency
    }

    pub fn template(&self) -> &RequestTemplate {
        &self.plan.template
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
