//! Host capabilities: the page element tree, clipboard, navigation and clock.
//!
//! Everything the UI utilities touch in their environment goes through one of
//! these traits, so the utilities can run against in-memory fakes.

pub mod clipboard;
pub mod clock;
pub mod navigator;
pub mod page;

pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use clock::{Clock, MonotonicClock, SystemClock};
pub use navigator::{BrowserNavigator, ChannelNavigator, Navigator, RecordingNavigator};
pub use page::{ElementId, MemoryPage, Page};
