//! Navigation capability.

use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc;

/// Requests that the host move to another path of the application.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Forwards navigation requests to whoever owns the receiving end.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, path: &str) {
        if self.tx.send(path.to_string()).is_err() {
            tracing::debug!(path, "navigation receiver dropped");
        }
    }
}

/// Opens `base_url + path` in the user's browser.
#[derive(Debug, Clone)]
pub struct BrowserNavigator {
    base_url: String,
}

impl BrowserNavigator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Absolute URL for an application path.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        let url = self.url_for(path);
        if let Err(e) = open::that_detached(&url) {
            tracing::error!(%url, error = %e, "failed to open browser");
        }
    }
}

/// Remembers every requested path.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
