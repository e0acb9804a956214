//! Presentation contract implemented by the host editor integration.

use async_trait::async_trait;

/// Everything the engine may show the user.
///
/// Implementations render through the host editor (status bar, message
/// toasts, browser hand-off); the engine never touches UI primitives
/// directly.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Replaces the status indicator text.
    fn update_status(&self, text: &str);

    /// Clears the status indicator.
    fn clear_status(&self);

    /// Shows an informational message with optional action buttons and
    /// resolves to the chosen action label, or `None` when dismissed.
    async fn show_info(&self, message: &str, actions: &[&str]) -> Option<String>;

    /// Shows an error message.
    fn show_error(&self, message: &str);

    /// Opens `url` with the user's browser.
    fn open_url(&self, url: &str);
}
