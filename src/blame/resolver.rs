use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use super::cache::BlameCache;
use super::types::CommitInfo;

/// Maps an editor cursor line to the commit that last changed it.
pub struct LineResolver {
    cache: Arc<BlameCache>,
}

impl LineResolver {
    pub fn new(cache: Arc<BlameCache>) -> Self {
        LineResolver { cache }
    }

    /// Attribute the given line of `file`.
    ///
    /// `line` is 0-based as editors report it; blame data is 1-based, so
    /// the lookup happens at `line + 1`. Returns the blank commit when the
    /// line has no attribution (or the file has no blame data at all).
    pub async fn resolve(&self, file: &Path, line: u32) -> CommitInfo {
        let info = self.cache.get_or_create(file).blame().await;

        let blame_line = line.saturating_add(1);

        match info.commit_for_line(blame_line) {
            Some(commit) => commit.clone(),
            None => {
                trace!(file = %file.display(), line, "no commit attributes this line");
                CommitInfo::blank()
            }
        }
    }
}
