//! The UI utilities.

pub mod copier;
pub mod countdown;
pub mod date_format;
pub mod notifier;

pub use copier::ClipboardCopier;
pub use countdown::{Countdown, CountdownHandle};
pub use date_format::{format_date, host_locale, DateFormatter};
pub use notifier::Notifier;

use std::sync::Arc;

use crate::config::Config;
use crate::platform::{Clipboard, Clock, Navigator, Page};

/// All four utilities wired to one set of capabilities.
#[derive(Clone)]
pub struct Toolkit {
    pub notifier: Notifier,
    pub copier: ClipboardCopier,
    pub dates: DateFormatter,
    pub countdown: Countdown,
}

impl Toolkit {
    pub fn new(
        config: &Config,
        page: Arc<dyn Page>,
        clipboard: Arc<dyn Clipboard>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let notifier = Notifier::new(page.clone(), &config.timing);
        let copier = ClipboardCopier::new(
            clipboard,
            page.clone(),
            notifier.clone(),
            &config.timing,
        );
        let countdown = Countdown::new(page, navigator, clock, notifier.clone(), &config.timing);

        Self {
            notifier,
            copier,
            dates: DateFormatter::new(
                config.display.date_format.clone(),
                host_locale(config.display.locale.as_deref()),
            ),
            countdown,
        }
    }
}
