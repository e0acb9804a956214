//! Commit web-URL resolution.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::blame::types::CommitInfo;

/// Why no browsable URL could be produced for a commit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("line has no commit to link to")]
    NoCommit,
    #[error("no commit URL is configured")]
    MissingConfiguration,
    #[error("commit URL is not a well-formed web address: {0}")]
    MalformedUrl(String),
}

/// Substitutes the commit hash into the configured URL template and checks
/// the result is a web address.
///
/// The template's only recognized token is `${hash}`. A candidate that does
/// not parse as an http(s) URL is rejected rather than handed to the host.
pub fn resolve_commit_url(
    commit: &CommitInfo,
    template: Option<&str>,
) -> Result<String, LinkError> {
    if commit.is_blank() {
        return Err(LinkError::NoCommit);
    }
    let template = template.ok_or(LinkError::MissingConfiguration)?;

    let candidate = template.replace("${hash}", &commit.hash);
    if candidate.is_empty() {
        return Err(LinkError::MissingConfiguration);
    }

    match Url::parse(&candidate) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(candidate),
        _ => Err(LinkError::MalformedUrl(candidate)),
    }
}

fn web_remote_regex() -> &'static Regex {
    static WEB_REMOTE: OnceLock<Regex> = OnceLock::new();
    WEB_REMOTE.get_or_init(|| {
        Regex::new(r"^(git@|https://)([^:/]+)[:/](.*)\.git$").expect("remote pattern is valid")
    })
}

/// Best-effort transform from a clone remote to a commit web URL.
///
/// `git@host:path.git` and `https://host/path.git` become
/// `https://host/path/commit/<hash>`; anything else is returned unchanged.
pub fn default_web_path(remote: &str, hash: &str) -> String {
    match web_remote_regex().captures(remote) {
        Some(caps) => format!("https://{}/{}/commit/{}", &caps[2], &caps[3], hash),
        None => remote.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blame::types::Signature;

    fn make_commit(hash: &str) -> CommitInfo {
        CommitInfo {
            hash: hash.to_string(),
            author: Signature {
                name: "Alice".to_string(),
                mail: "alice@example.com".to_string(),
                timestamp: 1700000000,
                timezone: "+0000".to_string(),
            },
            committer: Signature {
                name: "Alice".to_string(),
                mail: "alice@example.com".to_string(),
                timestamp: 1700000000,
                timezone: "+0000".to_string(),
            },
            summary: "Fix parser".to_string(),
            filename: "src/parser.rs".to_string(),
            generated: false,
        }
    }

    #[test]
    fn test_resolve_substitutes_hash_into_template() {
        let commit = make_commit("deadbeef");

        let url = resolve_commit_url(
            &commit,
            Some("https://github.com/acme/widget/commit/${hash}"),
        );

        assert_eq!(
            url,
            Ok("https://github.com/acme/widget/commit/deadbeef".to_string())
        );
    }

    #[test]
    fn test_resolve_without_template_is_missing_configuration() {
        let commit = make_commit("deadbeef");

        assert_eq!(
            resolve_commit_url(&commit, None),
            Err(LinkError::MissingConfiguration)
        );
    }

    #[test]
    fn test_resolve_rejects_candidate_that_is_not_a_url() {
        let commit = make_commit("deadbeef");

        assert_eq!(
            resolve_commit_url(&commit, Some("not a url")),
            Err(LinkError::MalformedUrl("not a url".to_string()))
        );
    }

    #[test]
    fn test_resolve_rejects_non_web_schemes() {
        let commit = make_commit("deadbeef");

        let resolved = resolve_commit_url(&commit, Some("file:///repo/${hash}"));

        assert_eq!(
            resolved,
            Err(LinkError::MalformedUrl("file:///repo/deadbeef".to_string()))
        );
    }

    #[test]
    fn test_resolve_refuses_blank_commit() {
        let blank = CommitInfo::blank();

        assert_eq!(
            resolve_commit_url(&blank, Some("https://example.com/${hash}")),
            Err(LinkError::NoCommit)
        );
    }

    #[test]
    fn test_default_web_path_transforms_ssh_remote() {
        let url = default_web_path("git@github.com:user/repo.git", "deadbeef");

        assert_eq!(url, "https://github.com/user/repo/commit/deadbeef");
    }

    #[test]
    fn test_default_web_path_transforms_https_remote() {
        let url = default_web_path("https://gitlab.com/group/tool.git", "deadbeef");

        assert_eq!(url, "https://gitlab.com/group/tool/commit/deadbeef");
    }

    #[test]
    fn test_default_web_path_leaves_other_remotes_alone() {
        let url = default_web_path("/srv/git/repo", "deadbeef");

        assert_eq!(url, "/srv/git/repo");
    }
}
