use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hash value standing in for "no commit attributes this line".
///
/// Git reserves the all-zero object id for not-yet-committed content, so it
/// can never collide with a real commit hash.
pub const HASH_NO_COMMIT: &str = "0000000000000000000000000000000000000000";

/// Name, mail and timestamp of one side of a commit (author or committer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub name: String,
    pub mail: String,
    /// Unix epoch seconds.
    pub timestamp: u64,
    /// Offset string as git reports it, e.g. `+0200`.
    pub timezone: String,
}

impl Signature {
    fn blank() -> Self {
        Signature {
            name: String::new(),
            mail: String::new(),
            timestamp: 0,
            timezone: String::new(),
        }
    }
}

/// Everything known about a single commit that attributed at least one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub hash: String,
    pub author: Signature,
    pub committer: Signature,
    pub summary: String,
    pub filename: String,
    /// True exactly when this value is the blank placeholder produced for
    /// lines no commit attributes (uncommitted, untracked, unresolvable).
    pub generated: bool,
}

impl CommitInfo {
    /// The blank placeholder commit. The only constructor that sets
    /// `generated`, which keeps `generated == true` equivalent to
    /// `hash == HASH_NO_COMMIT`.
    pub fn blank() -> Self {
        CommitInfo {
            hash: HASH_NO_COMMIT.to_string(),
            author: Signature::blank(),
            committer: Signature::blank(),
            summary: String::new(),
            filename: String::new(),
            generated: true,
        }
    }

    /// Whether this is the blank placeholder rather than a real commit.
    pub fn is_blank(&self) -> bool {
        self.hash == HASH_NO_COMMIT
    }
}

/// One attribution record handed over by a blame source: a run of
/// consecutive lines last changed by a single commit.
///
/// This is the structured form an adapter produces after it has run the
/// version-control tool elsewhere; the core never sees raw tool output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlameRecord {
    pub hash: String,
    pub author: Signature,
    pub committer: Signature,
    pub summary: String,
    pub filename: String,
    /// First attributed line in the current revision, 1-based.
    pub final_line: u32,
    /// Number of consecutive lines this record covers.
    pub num_lines: u32,
}

/// Complete blame data for one file: every attributing commit plus a map
/// from 1-based line number to the hash that last changed it.
///
/// Produced once per file by a blame source and treated as read-only until
/// the source is disposed. The `Default` value (no commits, no lines) is
/// what every retrieval failure degrades to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlameInfo {
    pub commits: HashMap<String, CommitInfo>,
    pub lines: HashMap<u32, String>,
}

impl BlameInfo {
    /// Fold attribution records into the commits/lines maps.
    ///
    /// Records for the same commit share one `CommitInfo` entry; line
    /// numbers are kept 1-based as the records report them. Records
    /// carrying the zero hash (uncommitted lines) are dropped, leaving
    /// their lines unattributed.
    pub fn from_records(records: Vec<BlameRecord>) -> Self {
        let mut info = BlameInfo::default();

        for record in records {
            // Uncommitted lines carry the zero hash; only blank() may
            // produce a value with it
            if record.hash == HASH_NO_COMMIT {
                continue;
            }

            for line in record.final_line..record.final_line.saturating_add(record.num_lines) {
                info.lines.insert(line, record.hash.clone());
            }

            info.commits
                .entry(record.hash.clone())
                .or_insert_with(|| CommitInfo {
                    hash: record.hash,
                    author: record.author,
                    committer: record.committer,
                    summary: record.summary,
                    filename: record.filename,
                    generated: false,
                });
        }

        info
    }

    /// Look up the commit attributing the given 1-based line, if any.
    pub fn commit_for_line(&self, line: u32) -> Option<&CommitInfo> {
        let hash = self.lines.get(&line)?;
        self.commits.get(hash)
    }

    /// True when no line of the file could be attributed.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
