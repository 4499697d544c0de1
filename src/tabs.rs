use std::sync::Arc;

/// Title given to every freshly opened tab.
pub const NEW_TAB_TITLE: &str = "New Chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    pub completed: bool,
    pub thought_process: Option<String>,
}

impl Message {
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            role: Role::User,
            completed: true,
            thought_process: None,
        }
    }

    /// Empty reply waiting to be filled in once the response is known.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: String::new(),
            role: Role::System,
            completed: false,
            thought_process: None,
        }
    }
}

/// Fields to overwrite on an existing message. `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub completed: Option<bool>,
    pub thought_process: Option<Option<String>>,
}

impl MessagePatch {
    fn apply(self, message: &mut Message) {
        if let Some(content) = self.content {
            message.content = content;
        }
        if let Some(completed) = self.completed {
            message.completed = completed;
        }
        if let Some(thought_process) = self.thought_process {
            message.thought_process = thought_process;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub active: bool,
    pub messages: Vec<Message>,
}

impl Tab {
    fn new(id: String) -> Self {
        Self {
            id,
            title: NEW_TAB_TITLE.to_string(),
            active: true,
            messages: Vec::new(),
        }
    }

    fn with_active(&self, active: bool) -> Self {
        Self {
            active,
            ..self.clone()
        }
    }
}

/// Immutable snapshot of the open tabs.
///
/// Every operation returns a new snapshot. Tabs an operation does not touch
/// are shared with the previous snapshot, so `Arc::ptr_eq` tells whether a
/// tab changed. The collection is never empty and exactly one tab is active.
#[derive(Debug, Clone)]
pub struct TabStore {
    tabs: Vec<Arc<Tab>>,
    next_id: u64,
}

impl Default for TabStore {
    fn default() -> Self {
        Self {
            tabs: vec![Arc::new(Tab::new("tab-1".to_string()))],
            next_id: 2,
        }
    }
}

impl TabStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Tab>> {
        self.tabs.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Tab>> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn active(&self) -> &Arc<Tab> {
        self.tabs
            .iter()
            .find(|tab| tab.active)
            .unwrap_or(&self.tabs[0])
    }

    pub fn active_index(&self) -> usize {
        self.tabs.iter().position(|tab| tab.active).unwrap_or(0)
    }

    fn activate_only(&self, index: usize) -> Vec<Arc<Tab>> {
        self.tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| {
                let active = i == index;
                if tab.active == active {
                    Arc::clone(tab)
                } else {
                    Arc::new(tab.with_active(active))
                }
            })
            .collect()
    }

    fn replace_tab(&self, id: &str, f: impl FnOnce(&mut Tab)) -> Self {
        let Some(index) = self.tabs.iter().position(|tab| tab.id == id) else {
            return self.clone();
        };
        let mut tabs = self.tabs.clone();
        let mut tab = Tab::clone(&tabs[index]);
        f(&mut tab);
        tabs[index] = Arc::new(tab);
        Self {
            tabs,
            next_id: self.next_id,
        }
    }

    /// Appends a new empty tab and makes it the only active one.
    pub fn create_tab(&self) -> Self {
        let mut tabs: Vec<Arc<Tab>> = self
            .tabs
            .iter()
            .map(|tab| {
                if tab.active {
                    Arc::new(tab.with_active(false))
                } else {
                    Arc::clone(tab)
                }
            })
            .collect();
        tabs.push(Arc::new(Tab::new(format!("tab-{}", self.next_id))));
        Self {
            tabs,
            next_id: self.next_id + 1,
        }
    }

    /// Removes a tab. The last remaining tab cannot be closed.
    ///
    /// Closing the active tab activates the tab that slides into its
    /// position, or the new last tab.
    pub fn close_tab(&self, id: &str) -> Self {
        if self.tabs.len() <= 1 {
            return self.clone();
        }
        let Some(index) = self.tabs.iter().position(|tab| tab.id == id) else {
            return self.clone();
        };
        let was_active = self.tabs[index].active;
        let mut tabs = self.tabs.clone();
        tabs.remove(index);
        if was_active {
            let next = index.min(tabs.len() - 1);
            tabs[next] = Arc::new(tabs[next].with_active(true));
        }
        Self {
            tabs,
            next_id: self.next_id,
        }
    }

    pub fn select_tab(&self, id: &str) -> Self {
        match self.tabs.iter().position(|tab| tab.id == id) {
            Some(index) => Self {
                tabs: self.activate_only(index),
                next_id: self.next_id,
            },
            None => self.clone(),
        }
    }

    pub fn select_next(&self) -> Self {
        let index = (self.active_index() + 1) % self.tabs.len();
        Self {
            tabs: self.activate_only(index),
            next_id: self.next_id,
        }
    }

    pub fn select_previous(&self) -> Self {
        let len = self.tabs.len();
        let index = (self.active_index() + len - 1) % len;
        Self {
            tabs: self.activate_only(index),
            next_id: self.next_id,
        }
    }

    /// Appends messages to one tab. Messages whose id is already present in
    /// that tab are dropped.
    pub fn append_messages(&self, tab_id: &str, messages: Vec<Message>) -> Self {
        self.replace_tab(tab_id, |tab| {
            for message in messages {
                if tab.messages.iter().all(|m| m.id != message.id) {
                    tab.messages.push(message);
                }
            }
        })
    }

    pub fn update_message(&self, tab_id: &str, message_id: &str, patch: MessagePatch) -> Self {
        let known = self
            .get(tab_id)
            .is_some_and(|tab| tab.messages.iter().any(|m| m.id == message_id));
        if !known {
            return self.clone();
        }
        self.replace_tab(tab_id, |tab| {
            if let Some(message) = tab.messages.iter_mut().find(|m| m.id == message_id) {
                patch.apply(message);
            }
        })
    }

    pub fn rename_active_tab(&self, title: impl Into<String>) -> Self {
        let id = self.active().id.clone();
        let title = title.into();
        self.replace_tab(&id, |tab| tab.title = title)
    }

    /// Opens a past conversation in a fresh tab labelled with its title.
    pub fn open_history(&self, title: &str) -> Self {
        self.create_tab().rename_active_tab(title)
    }
}
