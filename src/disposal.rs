//! Teardown plumbing shared by the engine and editor integrations.

use std::mem;
use std::sync::{Arc, Mutex};

use tracing::debug;

/// Something that releases held resources on teardown.
///
/// Implementations must tolerate repeated calls; the first call releases,
/// later calls do nothing.
pub trait Disposable: Send + Sync {
    fn dispose(&self);
}

/// A revocable event-handler registration.
///
/// Registering a handler with an editor yields an unregister closure; the
/// subscription owns that closure and runs it exactly once on dispose.
pub struct Subscription {
    unregister: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    pub fn new(unregister: impl FnOnce() + Send + 'static) -> Self {
        Subscription {
            unregister: Mutex::new(Some(Box::new(unregister))),
        }
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        let unregister = match self.unregister.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(unregister) = unregister {
            unregister();
        }
    }
}

/// Owns every teardown participant and releases them in registration order.
///
/// `dispose_all` drains the list, so each participant is released through
/// the coordinator at most once no matter how often teardown runs.
pub struct DisposalCoordinator {
    entries: Mutex<Vec<Arc<dyn Disposable>>>,
}

impl DisposalCoordinator {
    pub fn new() -> Self {
        DisposalCoordinator {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, entry: Arc<dyn Disposable>) {
        self.lock().push(entry);
    }

    /// Releases every registered entry, oldest first.
    pub fn dispose_all(&self) {
        let drained = mem::take(&mut *self.lock());
        if !drained.is_empty() {
            debug!(count = drained.len(), "releasing registered disposables");
        }
        for entry in drained {
            entry.dispose();
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn Disposable>>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            // A poisoned list is still a valid list; keep draining it
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for DisposalCoordinator {
    fn default() -> Self {
        DisposalCoordinator::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Probe {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        calls: AtomicUsize,
    }

    impl Probe {
        fn new(label: &'static str, log: Arc<Mutex<Vec<&'static str>>>) -> Arc<Probe> {
            Arc::new(Probe {
                label,
                log,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Disposable for Probe {
        fn dispose(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(self.label);
        }
    }

    #[test]
    fn test_subscription_runs_unregister_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.dispose();
        subscription.dispose();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispose_all_releases_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let coordinator = DisposalCoordinator::new();
        coordinator.register(Probe::new("cache", log.clone()));
        coordinator.register(Probe::new("listener", log.clone()));
        coordinator.register(Probe::new("status", log.clone()));

        coordinator.dispose_all();

        assert_eq!(*log.lock().unwrap(), vec!["cache", "listener", "status"]);
    }

    #[test]
    fn test_dispose_all_is_idempotent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let coordinator = DisposalCoordinator::new();
        let probe = Probe::new("cache", log.clone());
        coordinator.register(probe.clone());

        coordinator.dispose_all();
        coordinator.dispose_all();

        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_entries_registered_after_teardown_are_released_next_time() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let coordinator = DisposalCoordinator::new();
        let first = Probe::new("first", log.clone());
        coordinator.register(first.clone());
        coordinator.dispose_all();

        let late = Probe::new("late", log.clone());
        coordinator.register(late.clone());
        coordinator.dispose_all();

        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(late.calls.load(Ordering::SeqCst), 1);
    }
}
