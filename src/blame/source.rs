use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::warn;

use super::types::BlameInfo;

/// Why a retrieval attempt failed. Only adapters report these; by the time
/// blame data reaches the core all of them have degraded to the empty
/// `BlameInfo`, so callers never need to tell the cases apart.
#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("file is not tracked")]
    NotTracked,
    #[error("no repository found for the file")]
    NoRepository,
    #[error("version-control tool unavailable: {0}")]
    ToolUnavailable(String),
    #[error("blame retrieval failed: {0}")]
    Other(String),
}

/// Produces blame data for a single file.
///
/// One instance exists per open file, owned by the [`BlameCache`]. The
/// contract mirrors what the cache relies on: `blame` is memoized (one
/// retrieval per instance, concurrent callers share the pending one) and
/// never fails, and `dispose` may be called any number of times.
///
/// [`BlameCache`]: super::cache::BlameCache
#[async_trait]
pub trait BlameSource: Send + Sync {
    /// Resolve the file's blame data, retrieving it on the first call.
    async fn blame(&self) -> BlameInfo;

    /// Release held resources. Idempotent.
    fn dispose(&self);
}

/// The one-shot fetch behind a [`CachedSource`]: invoke the underlying
/// version-control tool once and hand back structured blame data. The
/// subprocess handling and output parsing live in the outer extension's
/// adapter, not in this crate.
#[async_trait]
pub trait BlameRetriever: Send + Sync {
    async fn retrieve(&self) -> Result<BlameInfo, RetrieveError>;
}

/// Standard [`BlameSource`] implementation wrapping a retriever.
///
/// The first `blame` call starts the retrieval; callers arriving while it
/// is still in flight await the same attempt instead of starting another.
/// Failed retrievals are logged and memoized as the empty `BlameInfo`, so
/// a broken file is not re-queried on every cursor move either.
pub struct CachedSource<R> {
    retriever: R,
    cell: OnceCell<BlameInfo>,
    disposed: AtomicBool,
}

impl<R: BlameRetriever> CachedSource<R> {
    pub fn new(retriever: R) -> Self {
        CachedSource {
            retriever,
            cell: OnceCell::new(),
            disposed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl<R: BlameRetriever> BlameSource for CachedSource<R> {
    async fn blame(&self) -> BlameInfo {
        if self.disposed.load(Ordering::SeqCst) {
            return BlameInfo::default();
        }

        self.cell
            .get_or_init(|| async {
                match self.retriever.retrieve().await {
                    Ok(info) => info,
                    Err(err) => {
                        warn!("blame retrieval failed, treating file as unattributed: {err}");
                        BlameInfo::default()
                    }
                }
            })
            .await
            .clone()
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use super::*;
    use crate::blame::types::{BlameRecord, Signature};

    fn make_record(hash: &str, final_line: u32, num_lines: u32) -> BlameRecord {
        let signature = Signature {
            name: "Alice".to_string(),
            mail: "alice@example.com".to_string(),
            timestamp: 1700000000,
            timezone: "+0000".to_string(),
        };
        BlameRecord {
            hash: hash.to_string(),
            author: signature.clone(),
            committer: signature,
            summary: "Initial commit".to_string(),
            filename: "src/main.rs".to_string(),
            final_line,
            num_lines,
        }
    }

    struct CountingRetriever {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl BlameRetriever for CountingRetriever {
        async fn retrieve(&self) -> Result<BlameInfo, RetrieveError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Force a suspension point so concurrent callers interleave
            tokio::task::yield_now().await;
            if self.fail {
                Err(RetrieveError::NotTracked)
            } else {
                Ok(BlameInfo::from_records(vec![make_record("abc123", 1, 1)]))
            }
        }
    }

    fn counting_source(fail: bool) -> (CachedSource<CountingRetriever>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CachedSource::new(CountingRetriever {
            calls: calls.clone(),
            fail,
        });
        (source, calls)
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_fetch_once() {
        let (source, calls) = counting_source(false);

        let (a, b) = tokio::join!(source.blame(), source.blame());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.lines[&1], "abc123");
        assert_eq!(b.lines[&1], "abc123");
    }

    #[tokio::test]
    async fn test_repeated_calls_reuse_result() {
        let (source, calls) = counting_source(false);

        source.blame().await;
        source.blame().await;
        source.blame().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_and_is_memoized() {
        let (source, calls) = counting_source(true);

        let info = source.blame().await;
        assert!(info.is_empty());
        assert!(info.commits.is_empty());

        // The failed attempt is cached like any other result
        let again = source.blame().await;
        assert!(again.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent_and_stops_retrieval() {
        let (source, calls) = counting_source(false);

        source.dispose();
        source.dispose();

        let info = source.blame().await;
        assert!(info.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
