//! Main application state and event loop.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::platform::{ChannelNavigator, MemoryPage, SystemClipboard, SystemClock};
use crate::screens::watch::WatchTarget;
use crate::screens::{Screen, ScreenAction, WatchScreen};
use crate::services::Toolkit;

/// How the application ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppResult {
    /// The user quit.
    Exit,
    /// The page asked to move to another path, e.g. `/` after expiry.
    Navigated { path: String },
}

/// Application state.
pub struct App {
    watch_screen: WatchScreen,
    navigation: mpsc::UnboundedReceiver<String>,
    should_quit: bool,

    // Status bar info
    status_message: String,
}

impl App {
    /// Create a new application instance watching one session.
    pub fn new(config: Config, target: WatchTarget) -> Self {
        let page = Arc::new(MemoryPage::new());
        let (navigator, navigation) = ChannelNavigator::new();

        let toolkit = Toolkit::new(
            &config,
            page.clone(),
            Arc::new(SystemClipboard),
            Arc::new(navigator),
            Arc::new(SystemClock),
        );
        let watch_screen = WatchScreen::new(page, toolkit, &config.app.base_url, &target);

        Self {
            watch_screen,
            navigation,
            should_quit: false,
            status_message: "Watching session".to_string(),
        }
    }

    /// Run the application.
    pub async fn run(&mut self) -> Result<AppResult> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main event loop
        let result = self.event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    /// Main event loop.
    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<AppResult> {
        loop {
            // Draw UI
            terminal.draw(|f| self.draw(f))?;

            if let Ok(path) = self.navigation.try_recv() {
                tracing::info!(%path, "navigation requested");
                return Ok(AppResult::Navigated { path });
            }

            // Poll for events with timeout; timers keep running on the runtime meanwhile
            let ready = tokio::task::block_in_place(|| event::poll(Duration::from_millis(100)))?;
            if ready {
                if let Event::Key(key) = event::read()? {
                    match (key.modifiers, key.code) {
                        (KeyModifiers::CONTROL, KeyCode::Char('c'))
                        | (_, KeyCode::Char('q')) => {
                            self.should_quit = true;
                        }
                        _ => {
                            if let ScreenAction::StatusMessage(msg) =
                                self.watch_screen.handle_key(key).await
                            {
                                self.status_message = msg;
                            }
                        }
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(AppResult::Exit)
    }

    /// Draw the UI.
    fn draw(&mut self, f: &mut ratatui::Frame) {
        use ratatui::layout::{Constraint, Direction, Layout};
        use ratatui::style::{Color, Style};
        use ratatui::text::{Line, Span};
        use ratatui::widgets::Paragraph;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.watch_screen.draw(f, chunks[0]);

        // Status bar
        let status = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            Span::styled(&self.status_message, Style::default().fg(Color::Gray)),
            Span::raw(" │ "),
            Span::styled("c", Style::default().fg(Color::DarkGray)),
            Span::styled(" Copy link", Style::default().fg(Color::Gray)),
            Span::raw(" │ "),
            Span::styled("p", Style::default().fg(Color::DarkGray)),
            Span::styled(" Copy private", Style::default().fg(Color::Gray)),
            Span::raw(" │ "),
            Span::styled("q", Style::default().fg(Color::DarkGray)),
            Span::styled(" Quit", Style::default().fg(Color::Gray)),
        ]));
        f.render_widget(status, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_wires_screen_without_a_terminal() {
        let target = WatchTarget {
            expires_at: (chrono::Utc::now() + chrono::Duration::hours(6)).to_rfc3339(),
            public_id: Some("pub123".to_string()),
            private_id: None,
        };

        let mut app = App::new(Config::default(), target);

        assert_eq!(app.status_message, "Watching session");
        assert!(!app.should_quit);
        assert!(!app.watch_screen.countdown_finished());
        assert!(app.navigation.try_recv().is_err());
    }
}
