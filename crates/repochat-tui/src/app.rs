use std::sync::Arc;

use repochat_core::{ChatSession, IngestController, IngestOutcome, RequestGateway, SessionId};

/// The view currently on screen. Each variant owns its controller, so
/// leaving a view drops it along with any request it had outstanding.
pub enum Screen {
    Landing(IngestController),
    Chat(ChatSession),
}

pub struct App {
    pub should_quit: bool,
    pub screen: Screen,

    // Shown under the URL field when the input boundary refuses a locator
    pub notice: Option<String>,

    // Transcript scrolling
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub api_url: String,
    gateway: Arc<dyn RequestGateway>,
}

impl App {
    pub fn new(gateway: Arc<dyn RequestGateway>, api_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Landing(IngestController::new(Arc::clone(&gateway))),
            notice: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
            api_url: api_url.into(),
            gateway,
        }
    }

    /// Start directly in a chat view for an already-ingested repository.
    pub fn with_session(
        gateway: Arc<dyn RequestGateway>,
        api_url: impl Into<String>,
        session: SessionId,
    ) -> Self {
        let mut app = Self::new(gateway, api_url);
        app.open_chat(session);
        app
    }

    pub fn open_chat(&mut self, session: SessionId) {
        tracing::info!(%session, "opening chat view");
        self.screen = Screen::Chat(ChatSession::new(session, Arc::clone(&self.gateway)));
        self.notice = None;
        self.chat_scroll = 0;
    }

    /// Discard the chat view and return to the URL prompt.
    pub fn back_to_landing(&mut self) {
        self.screen = Screen::Landing(IngestController::new(Arc::clone(&self.gateway)));
        self.notice = None;
        self.chat_scroll = 0;
    }

    pub fn is_pending(&self) -> bool {
        match &self.screen {
            Screen::Landing(ingest) => ingest.state().is_pending(),
            Screen::Chat(chat) => chat.state().is_pending(),
        }
    }

    /// Called on every Tick: advance the animation and apply any finished
    /// request to the live controller.
    pub fn tick(&mut self) {
        if self.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }

        match &mut self.screen {
            Screen::Landing(ingest) => {
                if let Some(IngestOutcome::Ready(session)) = ingest.poll() {
                    self.open_chat(session);
                }
            }
            Screen::Chat(chat) => {
                if chat.poll().is_some() {
                    self.scroll_chat_to_bottom();
                }
            }
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.transcript_lines().saturating_sub(self.visible_height());
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max);
    }

    /// Scroll chat to bottom so the newest message (or "Thinking...") is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.transcript_lines();
        let visible_height = self.visible_height();
        if total_lines > visible_height {
            self.chat_scroll = total_lines.saturating_sub(visible_height);
        }
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    /// Rough count of wrapped lines the transcript occupies.
    fn transcript_lines(&self) -> u16 {
        let Screen::Chat(chat) = &self.screen else {
            return 0;
        };

        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for msg in chat.transcript() {
            total_lines = total_lines.saturating_add(1); // "You:" or "AI:"
            for line in msg.body.lines() {
                let char_count = line.chars().count();
                let wrapped = if char_count == 0 {
                    1
                } else {
                    (char_count / wrap_width) + 1
                };
                let wrapped = u16::try_from(wrapped).unwrap_or(u16::MAX);
                total_lines = total_lines.saturating_add(wrapped);
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if chat.state().is_pending() {
            total_lines = total_lines.saturating_add(2); // "AI:" + "Thinking..."
        }
        if chat.error().is_some() {
            total_lines = total_lines.saturating_add(1);
        }
        total_lines
    }
}
