use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::source::BlameSource;
use crate::disposal::Disposable;

/// Constructs the blame source for a file seen for the first time.
pub type SourceFactory = Box<dyn Fn(&Path) -> Arc<dyn BlameSource> + Send + Sync>;

/// Owner of every live blame source, keyed by absolute file path.
///
/// At most one source exists per file at any time: `get_or_create` checks
/// and inserts under a single lock acquisition, so two triggers racing on
/// the same freshly opened file still share one instance. The cache never
/// starts a retrieval itself; that happens inside the source on its first
/// `blame` call.
pub struct BlameCache {
    sources: Mutex<HashMap<PathBuf, Arc<dyn BlameSource>>>,
    factory: SourceFactory,
}

impl BlameCache {
    pub fn new(factory: SourceFactory) -> Self {
        BlameCache {
            sources: Mutex::new(HashMap::new()),
            factory,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<dyn BlameSource>>> {
        // A poisoned map is still a valid map; keep serving it
        match self.sources.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Return the live source for `file`, constructing and storing one if
    /// none exists yet.
    pub fn get_or_create(&self, file: &Path) -> Arc<dyn BlameSource> {
        let mut sources = self.lock();

        if let Some(existing) = sources.get(file) {
            return existing.clone();
        }

        debug!(file = %file.display(), "creating blame source");
        let source = (self.factory)(file);
        sources.insert(file.to_path_buf(), source.clone());
        source
    }

    /// Dispose and drop the entry for `file`; no-op when absent.
    pub fn dispose(&self, file: &Path) {
        let removed = self.lock().remove(file);

        if let Some(source) = removed {
            debug!(file = %file.display(), "disposing blame source");
            source.dispose();
        }
    }

    /// Dispose every live entry. Used at shutdown.
    pub fn dispose_all(&self) {
        let drained: Vec<(PathBuf, Arc<dyn BlameSource>)> = self.lock().drain().collect();

        for (file, source) in drained {
            debug!(file = %file.display(), "disposing blame source");
            source.dispose();
        }
    }
}

impl Disposable for BlameCache {
    fn dispose(&self) {
        self.dispose_all();
    }
}
