//! Status poller
//!
//! Polls the gateway for every non-terminal run on a fixed interval and
//! merges the replies into the registry. Each status check runs in its own
//! task, so a slow or failing check never delays the others or the next
//! tick.
//!
//! The poller keeps no per-run state: the set of runs to check is recomputed
//! from the registry on every tick. Checks only hold a weak reference to the
//! registry; a reply that arrives after the registry was dropped is ignored.

use std::sync::{Arc, Mutex, Weak};

use testrun_core::domain::run::RunId;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::TrackerError;
use crate::gateway::Gateway;
use crate::registry::RunRegistry;

/// Handle on the running tick loop
struct ActiveLoop {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Timer-driven status poller with an explicit start/stop lifecycle
pub struct StatusPoller {
    registry: Weak<RunRegistry>,
    gateway: Arc<dyn Gateway>,
    interval: Duration,
    active: Mutex<Option<ActiveLoop>>,
}

impl StatusPoller {
    /// Creates a stopped poller
    pub fn new(registry: &Arc<RunRegistry>, gateway: Arc<dyn Gateway>, interval: Duration) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            gateway,
            interval,
            active: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Starts the tick loop on the current tokio runtime
    ///
    /// The first tick fires one interval after start. Returns `false` when
    /// the loop is already running.
    pub fn start(&self) -> bool {
        let mut active = lock(&self.active);

        if let Some(existing) = active.as_ref() {
            if !existing.handle.is_finished() {
                return false;
            }
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            self.registry.clone(),
            Arc::clone(&self.gateway),
            self.interval,
            cancel.clone(),
        ));

        info!("Starting status poller (interval: {:?})", self.interval);
        *active = Some(ActiveLoop { cancel, handle });
        true
    }

    /// Stops issuing ticks
    ///
    /// Once this returns no new status check will be issued. Checks already
    /// in flight are left to finish and still merge their replies.
    pub async fn stop(&self) {
        let active = lock(&self.active).take();

        if let Some(ActiveLoop { cancel, handle }) = active {
            cancel.cancel();
            if let Err(e) = handle.await {
                warn!("Status poller task panicked: {}", e);
            }
            info!("Status poller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.active)
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    /// Runs a single tick and waits for all of its checks to complete
    ///
    /// Returns the number of status checks issued.
    pub async fn poll_once(&self) -> usize {
        let Some(registry) = self.registry.upgrade() else {
            return 0;
        };

        let handles = dispatch_checks(&registry, &self.gateway);
        drop(registry);

        let issued = handles.len();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Status check task panicked: {}", e);
            }
        }
        issued
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        if let Some(active) = lock(&self.active).take() {
            active.cancel.cancel();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_loop(
    registry: Weak<RunRegistry>,
    gateway: Arc<dyn Gateway>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let Some(registry) = registry.upgrade() else {
            debug!("Run registry dropped, status poller exiting");
            break;
        };

        // Fire and forget: completions land whenever they resolve
        let issued = dispatch_checks(&registry, &gateway).len();
        if issued > 0 {
            debug!("Issued {} status check(s) this tick", issued);
        }
    }
}

/// Spawns one status check per non-terminal run
fn dispatch_checks(registry: &Arc<RunRegistry>, gateway: &Arc<dyn Gateway>) -> Vec<JoinHandle<()>> {
    registry
        .pending()
        .into_iter()
        .map(|run_id| {
            tokio::spawn(check_run(
                Arc::downgrade(registry),
                Arc::clone(gateway),
                run_id,
            ))
        })
        .collect()
}

async fn check_run(registry: Weak<RunRegistry>, gateway: Arc<dyn Gateway>, run_id: RunId) {
    let report = match gateway.check_status(&run_id).await {
        Ok(report) => report,
        Err(source) => {
            let err = TrackerError::PollTransientFailure { run_id, source };
            warn!("{}", err);
            return;
        }
    };

    if report.id_test != run_id.as_str() {
        warn!(
            run_id = %run_id,
            reported = %report.id_test,
            "Discarding status reply for a different run"
        );
        return;
    }

    match registry.upgrade() {
        Some(registry) => {
            registry.merge(&run_id, report.into());
        }
        None => debug!(run_id = %run_id, "Registry gone, dropping late status reply"),
    }
}
