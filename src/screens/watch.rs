//! Watch screen - live countdown for one session, with copyable share links.

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use std::sync::Arc;

use crate::links::{private_link, public_link};
use crate::platform::{ElementId, MemoryPage, Page};
use crate::services::notifier::TOAST_CLASS;
use crate::services::{CountdownHandle, Toolkit};

use super::{Screen, ScreenAction};

pub const COUNTDOWN_ELEMENT: &str = "countdown";
pub const PUBLIC_BUTTON: &str = "copy-public";
pub const PRIVATE_BUTTON: &str = "copy-private";

/// A link and the element acting as its copy button.
struct ShareLink {
    url: String,
    button: ElementId,
}

/// Session identity shown on the watch screen.
#[derive(Debug, Clone, Default)]
pub struct WatchTarget {
    pub expires_at: String,
    pub public_id: Option<String>,
    pub private_id: Option<String>,
}

pub struct WatchScreen {
    page: Arc<MemoryPage>,
    toolkit: Toolkit,
    countdown_el: ElementId,
    expires_label: String,
    public: Option<ShareLink>,
    private: Option<ShareLink>,
    countdown: Option<CountdownHandle>,
}

impl WatchScreen {
    /// Build the page for `target` and start its countdown.
    pub fn new(
        page: Arc<MemoryPage>,
        toolkit: Toolkit,
        base_url: &str,
        target: &WatchTarget,
    ) -> Self {
        let countdown_el = page.insert_element(COUNTDOWN_ELEMENT, "");

        let public = target.public_id.as_deref().map(|id| ShareLink {
            url: public_link(base_url, id),
            button: page.insert_element(PUBLIC_BUTTON, "Copy link"),
        });
        let private = target.private_id.as_deref().map(|id| ShareLink {
            url: private_link(base_url, id),
            button: page.insert_element(PRIVATE_BUTTON, "Copy private link"),
        });

        let countdown = toolkit.countdown.start(&target.expires_at, COUNTDOWN_ELEMENT);
        if countdown.is_none() {
            page.set_text(countdown_el, "Unknown expiry");
        }

        Self {
            expires_label: toolkit.dates.format(&target.expires_at),
            page,
            toolkit,
            countdown_el,
            public,
            private,
            countdown,
        }
    }

    /// Whether the countdown has stopped ticking.
    pub fn countdown_finished(&self) -> bool {
        self.countdown.as_ref().map_or(true, |h| h.is_finished())
    }

    async fn copy(&self, link: Option<&ShareLink>, what: &str) -> ScreenAction {
        match link {
            Some(link) => {
                self.toolkit.copier.copy_to_clipboard(&link.url, link.button).await;
                ScreenAction::None
            }
            None => ScreenAction::StatusMessage(format!("No {} link for this session", what)),
        }
    }

    fn link_item(&self, title: &str, link: &ShareLink) -> ListItem<'static> {
        let label = self.page.text(link.button).unwrap_or_default();
        ListItem::new(Line::from(vec![
            Span::styled(format!("{:<9}", title), Style::default().fg(Color::Gray)),
            Span::styled(link.url.clone(), Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", label),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]))
    }

    fn draw_toasts(&self, f: &mut Frame, area: Rect) {
        let toasts = self.page.texts_with_class(TOAST_CLASS);
        let width = toasts
            .iter()
            .map(|t| t.chars().count() as u16 + 4)
            .max()
            .unwrap_or(0)
            .min(area.width);

        // newest toast sits at the bottom
        let mut y = area.bottom();
        for message in toasts.iter().rev() {
            if y < area.top() + 3 {
                break;
            }
            y -= 3;
            let rect = Rect::new(area.right().saturating_sub(width), y, width, 3);
            f.render_widget(Clear, rect);
            f.render_widget(
                Paragraph::new(message.as_str())
                    .block(Block::default().borders(Borders::ALL))
                    .style(Style::default().fg(Color::White)),
                rect,
            );
        }
    }
}

impl Drop for WatchScreen {
    fn drop(&mut self) {
        if let Some(handle) = &self.countdown {
            handle.cancel();
        }
    }
}

#[async_trait]
impl Screen for WatchScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Countdown
                Constraint::Length(3), // Expiry date
                Constraint::Min(0),    // Share links
            ])
            .split(area);

        let countdown_text = self.page.text(self.countdown_el).unwrap_or_default();
        let expired = self.countdown_finished();
        let countdown = Paragraph::new(countdown_text)
            .block(Block::default().borders(Borders::ALL).title("Session"))
            .style(if expired {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            });
        f.render_widget(countdown, chunks[0]);

        let expires = Paragraph::new(self.expires_label.as_str())
            .block(Block::default().borders(Borders::ALL).title("Expires at"));
        f.render_widget(expires, chunks[1]);

        let mut items = Vec::new();
        if let Some(link) = &self.public {
            items.push(self.link_item("Share", link));
        }
        if let Some(link) = &self.private {
            items.push(self.link_item("Inbox", link));
        }
        let links = List::new(items).block(Block::default().borders(Borders::ALL).title("Links"));
        f.render_widget(links, chunks[2]);

        self.draw_toasts(f, area);
    }

    async fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Char('c') => self.copy(self.public.as_ref(), "share").await,
            KeyCode::Char('p') => self.copy(self.private.as_ref(), "private").await,
            _ => ScreenAction::None,
        }
    }
}
