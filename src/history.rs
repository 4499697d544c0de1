use ratatui::{
    style::Stylize,
    text::{Line, Span},
    widgets::{ListItem, ListState},
};

/// A past conversation listed in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    pub last_message: String,
    pub date: String,
}

impl HistoryEntry {
    pub fn new(id: &str, title: &str, last_message: &str, date: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            last_message: last_message.to_string(),
            date: date.to_string(),
        }
    }
}

pub fn sample_history() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry::new(
            "chat-1",
            "Project Planning",
            "Let's discuss the timeline for the new feature",
            "Today",
        ),
        HistoryEntry::new(
            "chat-2",
            "Code Review",
            "Can you review my React component?",
            "Yesterday",
        ),
        HistoryEntry::new(
            "chat-3",
            "Bug Investigation",
            "I'm seeing an error in the console",
            "2 days ago",
        ),
    ]
}

#[derive(Debug)]
pub struct HistoryList {
    pub items: Vec<HistoryEntry>,
    pub state: ListState,
}

impl FromIterator<HistoryEntry> for HistoryList {
    fn from_iter<I: IntoIterator<Item = HistoryEntry>>(iter: I) -> Self {
        let items = iter.into_iter().collect();
        let mut state = ListState::default();
        state.select_first();
        Self { items, state }
    }
}

impl HistoryList {
    pub fn selected(&self) -> Option<&HistoryEntry> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let next = self.state.selected().map_or(0, |i| (i + 1) % self.items.len());
        self.state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len();
        let previous = self.state.selected().map_or(0, |i| (i + len - 1) % len);
        self.state.select(Some(previous));
    }
}

impl From<&HistoryEntry> for ListItem<'_> {
    fn from(value: &HistoryEntry) -> Self {
        let lines = vec![
            Line::from(Span::raw(value.title.clone())),
            Line::from(Span::raw(format!("  {}", value.date)).dim()),
        ];
        ListItem::new(lines)
    }
}
