//! Clipboard capability.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::ClipboardError;

/// Asynchronous, fallible write access to a clipboard.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard, via arboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_owned();
        // arboard blocks on the display server
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()?;
            clipboard.set_text(text)?;
            Ok::<(), ClipboardError>(())
        })
        .await
        .map_err(|e| ClipboardError::Unavailable(e.to_string()))?
    }
}

/// Clipboard that keeps writes in memory and can be told to refuse them.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
    deny: AtomicBool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write.
    pub fn denied() -> Self {
        let clipboard = Self::default();
        clipboard.set_denied(true);
        clipboard
    }

    pub fn set_denied(&self, deny: bool) {
        self.deny.store(deny, Ordering::SeqCst);
    }

    /// Most recent successful write.
    pub fn contents(&self) -> Option<String> {
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.deny.load(Ordering::SeqCst) {
            return Err(ClipboardError::Denied);
        }
        self.writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_clipboard_records_writes() {
        let clipboard = MemoryClipboard::new();
        clipboard.write_text("one").await.unwrap();
        clipboard.write_text("two").await.unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("two"));
        assert_eq!(clipboard.write_count(), 2);
    }

    #[tokio::test]
    async fn test_denied_clipboard_rejects() {
        let clipboard = MemoryClipboard::denied();
        let err = clipboard.write_text("secret").await.unwrap_err();
        assert!(matches!(err, ClipboardError::Denied));
        assert_eq!(clipboard.contents(), None);
    }
}
