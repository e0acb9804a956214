//! `${token}` substitution for status and message templates.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::{Captures, Regex};

use crate::blame::types::CommitInfo;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("token pattern is valid"))
}

/// Expands every `${token}` in `template` from `commit`.
///
/// Recognized tokens: `hash`, `hash.short`, `author.name`, `author.mail`,
/// `committer.name`, `committer.mail`, `commit.summary`, `commit.filename`,
/// `time.ago`. Unrecognized tokens expand to the empty string; text outside
/// tokens passes through unchanged.
pub fn render(template: &str, commit: &CommitInfo, hash_length: usize) -> String {
    token_regex()
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "hash" => commit.hash.clone(),
            "hash.short" => short_hash(&commit.hash, hash_length),
            "author.name" => commit.author.name.clone(),
            "author.mail" => commit.author.mail.clone(),
            "committer.name" => commit.committer.name.clone(),
            "committer.mail" => commit.committer.mail.clone(),
            "commit.summary" => commit.summary.clone(),
            "commit.filename" => commit.filename.clone(),
            "time.ago" => time_ago(commit.author.timestamp),
            _ => String::new(),
        })
        .to_string()
}

/// First `length` characters of `hash`.
pub fn short_hash(hash: &str, length: usize) -> String {
    hash.chars().take(length).collect()
}

/// Human-readable distance from `timestamp` (epoch seconds) to now.
pub fn time_ago(timestamp: u64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    time_ago_at(timestamp, now)
}

fn time_ago_at(timestamp: u64, now: u64) -> String {
    // Clock skew can put a commit in the future; treat that as fresh
    let diff = now.saturating_sub(timestamp);

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        if mins == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{} minutes ago", mins)
        }
    } else if diff < 86400 {
        let hours = diff / 3600;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff < 2592000 {
        let days = diff / 86400;
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff < 31536000 {
        let months = diff / 2592000;
        if months == 1 {
            "1 month ago".to_string()
        } else {
            format!("{} months ago", months)
        }
    } else {
        let years = diff / 31536000;
        if years == 1 {
            "1 year ago".to_string()
        } else {
            format!("{} years ago", years)
        }
    }
}
