//! Cancellable periodic task driven by a tokio interval.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A unit of work run on every tick of a [`PeriodicTask`].
pub trait Periodic: Send + 'static {
    /// Run one iteration. Failures are the job's to log; the task goes on.
    fn run_once(&mut self) -> impl Future<Output = ()> + Send;

    /// Called once after the task was cancelled.
    fn stopped(&mut self) {}
}

/// Owns a spawned job that runs every `period`.
///
/// Iterations run inline, so at most one is in flight; ticks that fall due
/// while an iteration overruns are skipped rather than queued. The first
/// iteration runs immediately. Dropping the handle cancels the task at its
/// next await point between iterations.
pub struct PeriodicTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Spawn `job` on the current tokio runtime.
    pub fn spawn<P: Periodic>(mut job: P, period: Duration) -> Self {
        let (shutdown, mut cancelled) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancelled.changed() => break,
                    _ = ticker.tick() => job.run_once().await,
                }
            }
            job.stopped();
            tracing::debug!("periodic task stopped");
        });
        Self { shutdown, handle }
    }

    /// Cancel the task and wait for the current iteration, if any, to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.handle.await {
            tracing::warn!(%err, "periodic task ended abnormally");
        }
    }
}
