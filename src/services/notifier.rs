//! Transient toast notifications.

use std::sync::Arc;
use std::time::Duration;

use crate::config::TimingConfig;
use crate::platform::Page;

/// Class carried by every toast element.
pub const TOAST_CLASS: &str = "toast";
/// Class that animates a toast into view.
pub const SHOW_CLASS: &str = "show";

/// Shows short-lived messages on a [`Page`].
#[derive(Clone)]
pub struct Notifier {
    page: Arc<dyn Page>,
    display: Duration,
    fade: Duration,
}

impl Notifier {
    pub fn new(page: Arc<dyn Page>, timing: &TimingConfig) -> Self {
        Self {
            page,
            display: timing.toast_display(),
            fade: timing.toast_fade(),
        }
    }

    /// Append a toast carrying `message` and schedule its removal.
    ///
    /// The toast is visible as soon as this returns. It loses its `show` class
    /// after the display time and is detached after the fade. Must be called
    /// from within a tokio runtime.
    pub fn notify(&self, message: &str) {
        let toast = self.page.append_to_body(TOAST_CLASS, message);
        self.page.add_class(toast, SHOW_CLASS);
        tracing::debug!(?toast, message, "toast shown");

        let page = self.page.clone();
        let (display, fade) = (self.display, self.fade);
        tokio::spawn(async move {
            tokio::time::sleep(display).await;
            page.remove_class(toast, SHOW_CLASS);
            tokio::time::sleep(fade).await;
            page.remove(toast);
            tracing::debug!(?toast, "toast removed");
        });
    }
}
