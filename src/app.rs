use ratatui::{
    style::{Color, Style},
    widgets::Block,
};
use ratatui_textarea::TextArea;
use tracing::debug;

use crate::history::HistoryList;
use crate::orchestrator::{Chat, Mode};

/// Application result type.
pub type AppResult<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
    History,
}

/// App holds the state of the application
pub struct App<'a> {
    /// Input text area
    pub input_textarea: TextArea<'a>,
    /// Which part of the screen receives key presses.
    pub input_mode: InputMode,
    /// Response mode for the next submission
    pub mode: Mode,
    /// Tabs and in-flight replies
    pub chat: Chat,
    /// Past conversations shown in the sidebar
    pub history: HistoryList,
    pub sidebar_visible: bool,
    /// Expand the thought process of think-mode replies
    pub show_thoughts: bool,
    /// Vertical scroll
    pub vertical_scroll: usize,
    /// Ticks since start, drives the waiting indicator
    pub ticks: u64,
    /// Is the application running?
    pub running: bool,
}

fn styled_input_textarea() -> TextArea<'static> {
    let mut input_textarea = TextArea::default();
    input_textarea.set_block(Block::bordered().title("Input"));
    input_textarea.set_style(Style::default().fg(Color::Yellow));
    input_textarea.set_placeholder_text("Ask Anything");
    input_textarea
}

impl App<'_> {
    pub fn new(chat: Chat, history: HistoryList) -> Self {
        Self {
            input_textarea: styled_input_textarea(),
            input_mode: InputMode::Normal,
            mode: Mode::None,
            chat,
            history,
            sidebar_visible: true,
            show_thoughts: false,
            vertical_scroll: 0,
            ticks: 0,
            running: true,
        }
    }

    /// Handles the tick event of the terminal.
    pub fn tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    pub fn set_input_mode(&mut self, new_input_mode: InputMode) {
        self.input_mode = new_input_mode;
    }

    /// True while the active tab waits on a reply.
    pub fn is_waiting(&self) -> bool {
        self.chat.is_busy(&self.chat.tabs.active().id)
    }

    pub fn toggle_mode(&mut self, mode: Mode) {
        if self.is_waiting() {
            return;
        }
        self.mode = self.mode.toggle(mode);
    }

    pub fn submit_message(&mut self) {
        let text = self.input_textarea.lines().join("\n");
        if !self.chat.submit(&text, self.mode) {
            return;
        }
        self.mode = Mode::None;
        self.input_textarea = styled_input_textarea();
        self.vertical_scroll = 0;
        self.set_input_mode(InputMode::Normal);
    }

    pub fn new_tab(&mut self) {
        self.chat.new_tab();
        self.vertical_scroll = 0;
    }

    pub fn close_tab(&mut self) {
        self.chat.close_active_tab();
        self.vertical_scroll = 0;
    }

    pub fn next_tab(&mut self) {
        self.chat.select_next_tab();
        self.vertical_scroll = 0;
    }

    pub fn previous_tab(&mut self) {
        self.chat.select_previous_tab();
        self.vertical_scroll = 0;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        if !self.sidebar_visible && self.input_mode == InputMode::History {
            self.set_input_mode(InputMode::Normal);
        }
    }

    pub fn focus_history(&mut self) {
        self.sidebar_visible = true;
        self.set_input_mode(InputMode::History);
    }

    pub fn open_selected_history(&mut self) {
        if let Some(entry) = self.history.selected() {
            let title = entry.title.clone();
            self.chat.open_history(&title);
            self.vertical_scroll = 0;
        }
        self.set_input_mode(InputMode::Normal);
    }

    pub fn cycle_model(&mut self) {
        self.chat.model = self.chat.model.next();
        debug!(model = %self.chat.model, "switched model");
    }

    pub fn toggle_thoughts(&mut self) {
        self.show_thoughts = !self.show_thoughts;
    }

    pub fn increment_vertical_scroll(&mut self) {
        self.vertical_scroll = self.vertical_scroll.saturating_add(1);
    }

    pub fn decrement_vertical_scroll(&mut self) {
        self.vertical_scroll = self.vertical_scroll.saturating_sub(1);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
