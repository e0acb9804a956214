//! Core engine of the LineBlame editor extension: per-file blame caching,
//! line-to-commit attribution, stale-result suppression and teardown
//! coordination. The host editor supplies the collaborators (retriever,
//! presenter, editor context, settings) and drives the engine from its
//! event glue.

pub mod blame;
pub mod config;
pub mod disposal;
pub mod engine;
pub mod links;
pub mod template;
pub mod view;

use std::path::Path;
use std::sync::Arc;

use blame::cache::{BlameCache, SourceFactory};
use blame::resolver::LineResolver;
use config::ConfigStore;
use disposal::{DisposalCoordinator, Subscription};
use engine::{BlameEngine, EditorContext};
use view::Presenter;

// ---------------------------------------------------------------------------
// Composition root
// ---------------------------------------------------------------------------

/// Owns the wired-together engine and everything released at shutdown.
///
/// The host builds one `LineBlame` at activation, drives
/// [`engine`](LineBlame::engine) from its event handlers, hands listener
/// registrations in as [`Subscription`]s, and calls
/// [`shutdown`](LineBlame::shutdown) at deactivation.
pub struct LineBlame {
    cache: Arc<BlameCache>,
    engine: Arc<BlameEngine>,
    disposal: DisposalCoordinator,
}

impl LineBlame {
    pub fn new(
        factory: SourceFactory,
        presenter: Arc<dyn Presenter>,
        config: Arc<dyn ConfigStore>,
        editor: Arc<dyn EditorContext>,
    ) -> Self {
        let cache = Arc::new(BlameCache::new(factory));
        let resolver = LineResolver::new(cache.clone());
        let engine = Arc::new(BlameEngine::new(resolver, presenter, config, editor));

        let disposal = DisposalCoordinator::new();
        disposal.register(cache.clone());

        LineBlame {
            cache,
            engine,
            disposal,
        }
    }

    pub fn engine(&self) -> &Arc<BlameEngine> {
        &self.engine
    }

    /// Drops the cached blame for a file the user closed or deleted.
    pub fn on_file_closed(&self, file: &Path) {
        self.cache.dispose(file);
    }

    /// Tracks a host event registration for release at shutdown.
    pub fn track(&self, subscription: Subscription) {
        self.disposal.register(Arc::new(subscription));
    }

    /// Releases every cache entry and tracked registration. Safe to call
    /// more than once.
    pub fn shutdown(&self) {
        self.disposal.dispose_all();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
