//! Session expiry countdown.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::TimingConfig;
use crate::links::ROOT_PATH;
use crate::models::CountdownState;
use crate::platform::{Clock, ElementId, Navigator, Page};

use super::date_format::parse_timestamp;
use super::Notifier;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired";

/// Starts countdowns that render into page elements.
#[derive(Clone)]
pub struct Countdown {
    page: Arc<dyn Page>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
    tick: Duration,
    redirect_delay: Duration,
}

/// Owner of a running countdown.
///
/// Dropping the handle leaves the countdown running.
#[derive(Debug)]
pub struct CountdownHandle {
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Stop ticking. A redirect already scheduled by expiry still happens.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Whether the countdown has stopped, by expiry or cancellation.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// One countdown's fixed inputs.
struct Ticker {
    page: Arc<dyn Page>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    notifier: Notifier,
    element: ElementId,
    expires_at: DateTime<Utc>,
    redirect_delay: Duration,
}

impl Ticker {
    /// Render the current state; expiry also notifies and schedules the redirect.
    fn tick(&self) -> CountdownState {
        let state = CountdownState::at(self.expires_at, self.clock.now());
        self.page.set_html(self.element, &state.to_html());

        if state.is_expired() {
            tracing::info!(expires_at = %self.expires_at, "session expired");
            self.notifier.notify(SESSION_EXPIRED_MESSAGE);

            let navigator = self.navigator.clone();
            let delay = self.redirect_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                navigator.navigate(ROOT_PATH);
            });
        }
        state
    }
}

impl Countdown {
    pub fn new(
        page: Arc<dyn Page>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
        notifier: Notifier,
        timing: &TimingConfig,
    ) -> Self {
        Self {
            page,
            navigator,
            clock,
            notifier,
            tick: timing.countdown_tick(),
            redirect_delay: timing.redirect_delay(),
        }
    }

    /// Count down to `expires_at` in the element whose id is `element_id`.
    ///
    /// Renders immediately and then once per tick. When the instant has passed
    /// the element reads "Expired", a toast is shown, the navigator is sent to
    /// `/` after the redirect delay, and ticking stops.
    ///
    /// Returns `None` without touching the page when the element does not exist
    /// or `expires_at` cannot be parsed.
    pub fn start(&self, expires_at: &str, element_id: &str) -> Option<CountdownHandle> {
        let Some(element) = self.page.element_by_id(element_id) else {
            tracing::debug!(element_id, "countdown element not found");
            return None;
        };
        let Some(expires_at) = parse_timestamp(expires_at) else {
            tracing::warn!(expires_at, "unparsable expiry, countdown not started");
            return None;
        };
        Some(self.start_at(expires_at, element))
    }

    /// Count down to an already-parsed instant in a known element.
    pub fn start_at(&self, expires_at: DateTime<Utc>, element: ElementId) -> CountdownHandle {
        let ticker = Ticker {
            page: self.page.clone(),
            navigator: self.navigator.clone(),
            clock: self.clock.clone(),
            notifier: self.notifier.clone(),
            element,
            expires_at,
            redirect_delay: self.redirect_delay,
        };
        let period = self.tick;
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    Ok(()) = cancel_rx.changed() => {
                        tracing::debug!(?element, "countdown cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        if !ticker.page.contains(element) {
                            tracing::debug!(?element, "countdown element removed");
                            break;
                        }
                        if ticker.tick().is_expired() {
                            break;
                        }
                    }
                }
            }
        });

        CountdownHandle { cancel_tx, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryPage, MonotonicClock, RecordingNavigator};
    use crate::services::notifier::TOAST_CLASS;

    struct Fixture {
        page: Arc<MemoryPage>,
        navigator: Arc<RecordingNavigator>,
        clock: MonotonicClock,
        countdown: Countdown,
    }

    fn fixture() -> Fixture {
        let timing = TimingConfig::default();
        let page = Arc::new(MemoryPage::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let clock = MonotonicClock::new();
        let notifier = Notifier::new(page.clone(), &timing);
        let countdown = Countdown::new(
            page.clone(),
            navigator.clone(),
            Arc::new(clock),
            notifier,
            &timing,
        );
        Fixture {
            page,
            navigator,
            clock,
            countdown,
        }
    }

    fn expiry_in(clock: &MonotonicClock, ms: i64) -> String {
        (clock.now() + chrono::Duration::milliseconds(ms)).to_rfc3339()
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_countdown_renders_each_tick() {
        let f = fixture();
        let el = f.page.insert_element("countdown", "");

        let handle = f
            .countdown
            .start(&expiry_in(&f.clock, 3_661_000), "countdown")
            .unwrap();

        sleep_ms(1).await;
        assert_eq!(f.page.text(el).as_deref(), Some("Expires in: 1h 1m 1s"));

        sleep_ms(1000).await;
        assert_eq!(f.page.text(el).as_deref(), Some("Expires in: 1h 1m 0s"));
        assert_eq!(
            f.page.html(el).as_deref(),
            Some("Expires in: <strong>1h 1m 0s</strong>")
        );

        sleep_ms(60_000).await;
        assert_eq!(f.page.text(el).as_deref(), Some("Expires in: 1h 0m 0s"));
        assert!(!handle.is_finished());
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_days_are_not_shown() {
        let f = fixture();
        let el = f.page.insert_element("countdown", "");
        let ms = (24 + 6) * 3_600_000;

        f.countdown.start(&expiry_in(&f.clock, ms), "countdown").unwrap();
        sleep_ms(1).await;

        assert_eq!(f.page.text(el).as_deref(), Some("Expires in: 6h 0m 0s"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_past_expiry_expires_once() {
        let f = fixture();
        let el = f.page.insert_element("countdown", "");

        let handle = f.countdown.start(&expiry_in(&f.clock, -1), "countdown").unwrap();

        sleep_ms(1).await;
        assert_eq!(f.page.text(el).as_deref(), Some("Expired"));
        assert_eq!(
            f.page.texts_with_class(TOAST_CLASS),
            vec![SESSION_EXPIRED_MESSAGE]
        );
        assert!(f.navigator.visits().is_empty());

        sleep_ms(2000).await;
        assert_eq!(f.navigator.visits(), vec!["/"]);

        // no further ticks repeat the side effects
        sleep_ms(10_000).await;
        assert_eq!(f.navigator.visits(), vec!["/"]);
        assert!(f.page.texts_with_class(TOAST_CLASS).is_empty());
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_while_running() {
        let f = fixture();
        let el = f.page.insert_element("countdown", "");

        f.countdown.start(&expiry_in(&f.clock, 2500), "countdown").unwrap();

        sleep_ms(2001).await;
        assert_eq!(f.page.text(el).as_deref(), Some("Expires in: 0h 0m 0s"));

        sleep_ms(1000).await;
        assert_eq!(f.page.text(el).as_deref(), Some("Expired"));

        sleep_ms(2000).await;
        assert_eq!(f.navigator.visits(), vec!["/"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_element_is_noop() {
        let f = fixture();
        let revision = f.page.revision();

        let handle = f.countdown.start(&expiry_in(&f.clock, -1), "nowhere");

        assert!(handle.is_none());
        sleep_ms(5000).await;
        assert_eq!(f.page.revision(), revision);
        assert!(f.page.is_empty());
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparsable_expiry_is_noop() {
        let f = fixture();
        let el = f.page.insert_element("countdown", "--");
        let revision = f.page.revision();

        assert!(f.countdown.start("soon", "countdown").is_none());

        sleep_ms(5000).await;
        assert_eq!(f.page.revision(), revision);
        assert_eq!(f.page.text(el).as_deref(), Some("--"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticking() {
        let f = fixture();
        let el = f.page.insert_element("countdown", "");

        let handle = f
            .countdown
            .start(&expiry_in(&f.clock, 3_000), "countdown")
            .unwrap();
        sleep_ms(1).await;
        handle.cancel();
        sleep_ms(1).await;
        assert!(handle.is_finished());

        sleep_ms(10_000).await;
        assert_eq!(f.page.text(el).as_deref(), Some("Expires in: 0h 0m 3s"));
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_handle_keeps_running() {
        let f = fixture();
        let el = f.page.insert_element("countdown", "");

        drop(f.countdown.start(&expiry_in(&f.clock, 1_500), "countdown"));

        sleep_ms(2001).await;
        assert_eq!(f.page.text(el).as_deref(), Some("Expired"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_removed_element_stops_countdown() {
        let f = fixture();
        let el = f.page.insert_element("countdown", "");

        let handle = f
            .countdown
            .start(&expiry_in(&f.clock, 1_500), "countdown")
            .unwrap();
        sleep_ms(1).await;
        f.page.remove(el);

        sleep_ms(5000).await;
        assert!(handle.is_finished());
        assert!(f.navigator.visits().is_empty());
    }
}
