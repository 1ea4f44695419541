//! Copy-to-clipboard with visual feedback.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::TimingConfig;
use crate::platform::{Clipboard, ElementId, Page};

use super::Notifier;

/// Label shown on the target while feedback is active.
pub const COPIED_LABEL: &str = "Copied!";
pub const COPIED_MESSAGE: &str = "Copied to clipboard!";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy";

/// A label change waiting to be undone.
#[derive(Debug)]
struct PendingRestore {
    /// Label the element had before the first overlapping copy.
    original: String,
    /// Bumped by every copy; only the newest restore may fire.
    generation: u64,
}

/// Copies text and flashes a confirmation on the element that triggered it.
#[derive(Clone)]
pub struct ClipboardCopier {
    clipboard: Arc<dyn Clipboard>,
    page: Arc<dyn Page>,
    notifier: Notifier,
    feedback: Duration,
    pending: Arc<Mutex<HashMap<ElementId, PendingRestore>>>,
}

impl ClipboardCopier {
    pub fn new(
        clipboard: Arc<dyn Clipboard>,
        page: Arc<dyn Page>,
        notifier: Notifier,
        timing: &TimingConfig,
    ) -> Self {
        Self {
            clipboard,
            page,
            notifier,
            feedback: timing.copy_feedback(),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Write `text` to the clipboard and report the outcome.
    ///
    /// On success a toast confirms the copy and `target` reads "Copied!" until
    /// the feedback period ends. On failure a toast reports it, the error is
    /// logged, and `target` is left alone. Never fails from the caller's side.
    pub async fn copy_to_clipboard(&self, text: &str, target: ElementId) {
        match self.clipboard.write_text(text).await {
            Ok(()) => {
                self.notifier.notify(COPIED_MESSAGE);
                self.flash_label(target);
            }
            Err(e) => {
                self.notifier.notify(COPY_FAILED_MESSAGE);
                tracing::error!(error = %e, "copy failed");
            }
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<ElementId, PendingRestore>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flash_label(&self, target: ElementId) {
        let Some(current) = self.page.text(target) else {
            tracing::debug!(?target, "copy target is gone, skipping feedback");
            return;
        };

        let generation = {
            let mut pending = self.pending();
            let restore = pending.entry(target).or_insert(PendingRestore {
                original: current,
                generation: 0,
            });
            restore.generation += 1;
            restore.generation
        };
        self.page.set_text(target, COPIED_LABEL);

        let page = self.page.clone();
        let pending = self.pending.clone();
        let feedback = self.feedback;
        tokio::spawn(async move {
            tokio::time::sleep(feedback).await;
            let mut pending = pending.lock().unwrap_or_else(PoisonError::into_inner);
            if pending.get(&target).map(|r| r.generation) != Some(generation) {
                // a newer copy owns the restore
                return;
            }
            if let Some(restore) = pending.remove(&target) {
                page.set_text(target, &restore.original);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryPage;
    use crate::platform::MemoryClipboard;
    use crate::services::notifier::TOAST_CLASS;

    struct Fixture {
        page: Arc<MemoryPage>,
        clipboard: Arc<MemoryClipboard>,
        copier: ClipboardCopier,
        button: ElementId,
    }

    fn fixture(clipboard: MemoryClipboard) -> Fixture {
        let timing = TimingConfig::default();
        let page = Arc::new(MemoryPage::new());
        let clipboard = Arc::new(clipboard);
        let notifier = Notifier::new(page.clone(), &timing);
        let copier = ClipboardCopier::new(clipboard.clone(), page.clone(), notifier, &timing);
        let button = page.insert_element("copy-public", "Copy link");
        Fixture {
            page,
            clipboard,
            copier,
            button,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_copy_flashes_label() {
        let f = fixture(MemoryClipboard::new());

        f.copier.copy_to_clipboard("http://x/p/abc", f.button).await;

        assert_eq!(f.clipboard.contents().as_deref(), Some("http://x/p/abc"));
        assert_eq!(f.page.text(f.button).as_deref(), Some("Copied!"));
        assert_eq!(f.page.texts_with_class(TOAST_CLASS), vec![COPIED_MESSAGE]);

        tokio::time::sleep(Duration::from_millis(1501)).await;
        assert_eq!(f.page.text(f.button).as_deref(), Some("Copy link"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_copy_leaves_label() {
        let f = fixture(MemoryClipboard::denied());

        f.copier.copy_to_clipboard("secret", f.button).await;

        assert_eq!(f.page.text(f.button).as_deref(), Some("Copy link"));
        assert_eq!(f.page.texts_with_class(TOAST_CLASS), vec![COPY_FAILED_MESSAGE]);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(f.page.text(f.button).as_deref(), Some("Copy link"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_copies_restore_original_label() {
        let f = fixture(MemoryClipboard::new());

        f.copier.copy_to_clipboard("one", f.button).await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        f.copier.copy_to_clipboard("two", f.button).await;

        // first restore is superseded by the second copy
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(f.page.text(f.button).as_deref(), Some("Copied!"));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(f.page.text(f.button).as_deref(), Some("Copy link"));

        // a later copy captures the restored label again
        f.copier.copy_to_clipboard("three", f.button).await;
        tokio::time::sleep(Duration::from_millis(1501)).await;
        assert_eq!(f.page.text(f.button).as_deref(), Some("Copy link"));
        assert_eq!(f.clipboard.write_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_labels_are_tracked_per_element() {
        let f = fixture(MemoryClipboard::new());
        let other = f.page.insert_element("copy-private", "Copy private link");

        f.copier.copy_to_clipboard("a", f.button).await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        f.copier.copy_to_clipboard("b", other).await;

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert_eq!(f.page.text(f.button).as_deref(), Some("Copy link"));
        assert_eq!(f.page.text(other).as_deref(), Some("Copied!"));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(f.page.text(other).as_deref(), Some("Copy private link"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_target_still_copies() {
        let f = fixture(MemoryClipboard::new());
        f.page.remove(f.button);

        f.copier.copy_to_clipboard("orphan", f.button).await;

        assert_eq!(f.clipboard.contents().as_deref(), Some("orphan"));
        assert_eq!(f.page.texts_with_class(TOAST_CLASS), vec![COPIED_MESSAGE]);
    }
}
