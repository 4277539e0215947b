//! Background stop-criterion polling.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use vicinity_core::Solution;

use super::StopCriterion;
use crate::state::SearchHandle;

/// The smallest allowed polling period.
pub(crate) const MIN_CHECK_PERIOD: Duration = Duration::from_millis(1);

/// A worker thread that polls the registered stop criteria at a fixed
/// period while a search runs. The first positive poll requests a stop on
/// the search; dropping the checker shuts the thread down and joins it.
pub(crate) struct StopCriterionChecker {
    shutdown: Arc<(Mutex<bool>, Condvar)>,
    thread: Option<JoinHandle<()>>,
}

impl StopCriterionChecker {
    pub(crate) fn spawn<S: Solution>(
        search: SearchHandle<S>,
        criteria: Vec<Arc<dyn StopCriterion<S>>>,
        period: Duration,
    ) -> Self {
        let shutdown = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Arc::clone(&shutdown);
        let thread = std::thread::Builder::new()
            .name(format!("{}-stop-criteria", search.name()))
            .spawn(move || {
                let (lock, condvar) = &*signal;
                let mut stopped = lock.lock();
                loop {
                    let timed_out = condvar.wait_for(&mut stopped, period).timed_out();
                    if *stopped {
                        break;
                    }
                    if !timed_out {
                        // spurious wakeup
                        continue;
                    }
                    if criteria.iter().any(|c| c.should_stop(&search)) {
                        debug!(event = "stop_criterion_fired", search = %search.name());
                        search.stop();
                        break;
                    }
                }
            })
            .expect("failed to spawn the stop-criterion checker thread");
        StopCriterionChecker {
            shutdown,
            thread: Some(thread),
        }
    }
}

impl Drop for StopCriterionChecker {
    fn drop(&mut self) {
        let (lock, condvar) = &*self.shutdown;
        *lock.lock() = true;
        condvar.notify_all();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
