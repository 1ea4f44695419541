//! expiry-kit - UI utilities for expiring sessions
//!
//! Toast notifications, copy-to-clipboard with feedback, date formatting and
//! an expiry countdown, all rendering into an injected [`platform::Page`].

pub mod app;
pub mod config;
pub mod error;
pub mod links;
pub mod models;
pub mod platform;
pub mod screens;
pub mod services;

pub use config::Config;
pub use error::ClipboardError;
pub use services::{format_date, ClipboardCopier, Countdown, Notifier, Toolkit};
