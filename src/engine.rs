//! Trigger-driven orchestration: cursor snapshot, blame resolution, stale
//! suppression, presentation.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::blame::resolver::LineResolver;
use crate::config::ConfigStore;
use crate::links;
use crate::template;
use crate::view::Presenter;

/// Status indicator template. Not user-configurable.
const STATUS_FORMAT: &str = "${author.name} (${time.ago})";

/// Action button offered on the commit details message.
const VIEW_ACTION: &str = "View";

/// A cursor identity at one instant: which file, which 0-based line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPosition {
    pub file: PathBuf,
    pub line: u32,
}

/// Read side of the host editor.
pub trait EditorContext: Send + Sync {
    /// Current cursor identity, or `None` when no editor has focus.
    fn cursor(&self) -> Option<CursorPosition>;
}

/// Reacts to editor events and keeps the display in step with the cursor.
///
/// Every dependency is handed in by the composition root; the engine holds
/// no global state. Overlapping calls are independent: each snapshots the
/// cursor, resolves, and re-checks the cursor before touching the display,
/// so a slow resolution for a line the user has left never lands.
pub struct BlameEngine {
    resolver: LineResolver,
    presenter: Arc<dyn Presenter>,
    config: Arc<dyn ConfigStore>,
    editor: Arc<dyn EditorContext>,
}

impl BlameEngine {
    pub fn new(
        resolver: LineResolver,
        presenter: Arc<dyn Presenter>,
        config: Arc<dyn ConfigStore>,
        editor: Arc<dyn EditorContext>,
    ) -> Self {
        BlameEngine {
            resolver,
            presenter,
            config,
            editor,
        }
    }

    /// Handles a navigation or save event.
    ///
    /// Snapshots the cursor before resolving and re-reads it afterwards;
    /// a mismatch means the user moved on and the result is dropped with
    /// no display effect. An attributed line renders the status template,
    /// an unattributed one clears the indicator.
    pub async fn on_trigger(&self) {
        let snapshot = match self.editor.cursor() {
            Some(position) => position,
            None => {
                self.presenter.clear_status();
                return;
            }
        };

        trace!(
            file = %snapshot.file.display(),
            line = snapshot.line,
            "resolving blame for cursor"
        );
        let commit = self.resolver.resolve(&snapshot.file, snapshot.line).await;

        if self.editor.cursor().as_ref() != Some(&snapshot) {
            trace!("cursor moved during resolution; discarding result");
            return;
        }

        if commit.is_blank() {
            self.presenter.clear_status();
        } else {
            let text = template::render(STATUS_FORMAT, &commit, self.config.internal_hash_length());
            self.presenter.update_status(&text);
        }
    }

    /// Handles the user-invoked details command.
    ///
    /// Shows the configured info message for the commit under the cursor
    /// with a "View" action; choosing it opens the commit's web URL. URL
    /// problems surface as error messages and nothing else happens.
    pub async fn on_show_details(&self) {
        let snapshot = match self.editor.cursor() {
            Some(position) => position,
            None => return,
        };

        let commit = self.resolver.resolve(&snapshot.file, snapshot.line).await;

        if self.editor.cursor().as_ref() != Some(&snapshot) {
            trace!("cursor moved during resolution; dropping details");
            return;
        }

        if commit.is_blank() {
            self.presenter
                .show_info("Unable to blame the current line", &[])
                .await;
            return;
        }

        let message = template::render(
            &self.config.info_message_format(),
            &commit,
            self.config.internal_hash_length(),
        );
        let choice = self.presenter.show_info(&message, &[VIEW_ACTION]).await;
        if choice.as_deref() != Some(VIEW_ACTION) {
            return;
        }

        match links::resolve_commit_url(&commit, self.config.commit_url().as_deref()) {
            Ok(url) => self.presenter.open_url(&url),
            Err(err) => self.presenter.show_error(&err.to_string()),
        }
    }
}
