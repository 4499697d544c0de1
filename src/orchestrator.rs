use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::greeting::greeting_response;
use crate::models::Model;
use crate::presenter::StreamingPresenter;
use crate::prompts::concise_answer_prompt;
use crate::provider::{GenerateRequest, ProviderError, ResponseProvider};
use crate::tabs::{Message, MessagePatch, TabStore};

/// Shown in place of a reply whenever the provider fails.
pub const APOLOGY: &str =
    "Sorry, something went wrong while generating a response. Please try again.";

const TITLE_LENGTH: usize = 20;

/// Response variant chosen for a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    None,
    File,
    Translate,
    Think,
}

impl Mode {
    /// Selecting the current mode again switches back to `None`.
    pub fn toggle(self, mode: Mode) -> Self {
        if self == mode {
            Mode::None
        } else {
            mode
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::None => "chat",
            Mode::File => "file",
            Mode::Translate => "translate",
            Mode::Think => "think",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingResponse,
    Streaming,
}

/// In-flight reply of one tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamState {
    pub message_id: String,
    pub phase: Phase,
    /// Prefix revealed so far.
    pub content: String,
}

/// Progress of a send, reported back from its task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Resolved {
        tab_id: String,
        message_id: String,
    },
    Chunk {
        tab_id: String,
        message_id: String,
        content: String,
    },
    Completed {
        tab_id: String,
        message_id: String,
        content: String,
        thought_process: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub content: String,
    pub thought_process: Option<String>,
}

impl Resolution {
    fn answer(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            thought_process: None,
        }
    }

    fn apology(error: ProviderError) -> Self {
        warn!(%error, "provider failed, answering with apology");
        Self::answer(APOLOGY)
    }
}

/// Title for a tab named after its first message.
pub fn tab_title(text: &str) -> String {
    let mut title: String = text.chars().take(TITLE_LENGTH).collect();
    if text.chars().count() > TITLE_LENGTH {
        title.push_str("...");
    }
    title
}

/// Works out the reply text for a prompt. Never fails: provider errors turn
/// into [`APOLOGY`].
///
/// Think mode is all or nothing. If the reasoning pass fails the answer pass
/// is skipped, and if the answer pass fails the reasoning is discarded.
pub async fn resolve(
    provider: &dyn ResponseProvider,
    model: Model,
    prompt: &str,
    mode: Mode,
) -> Resolution {
    if let Some(reply) = greeting_response(prompt) {
        debug!("greeting matched, skipping provider");
        return Resolution::answer(reply);
    }
    match mode {
        Mode::Think => {
            let reasoning = match provider
                .generate(GenerateRequest {
                    thinking: true,
                    ..GenerateRequest::plain(model, prompt)
                })
                .await
            {
                Ok(reasoning) => reasoning,
                Err(e) => return Resolution::apology(e),
            };
            match provider
                .generate(GenerateRequest::plain(model, concise_answer_prompt(prompt)))
                .await
            {
                Ok(answer) => Resolution {
                    content: answer,
                    thought_process: Some(reasoning),
                },
                Err(e) => Resolution::apology(e),
            }
        }
        Mode::Translate => {
            let request = GenerateRequest {
                translate: true,
                ..GenerateRequest::plain(model, prompt)
            };
            match provider.generate(request).await {
                Ok(text) => Resolution::answer(text),
                Err(e) => Resolution::apology(e),
            }
        }
        Mode::None | Mode::File => {
            match provider.generate(GenerateRequest::plain(model, prompt)).await {
                Ok(text) => Resolution::answer(text),
                Err(e) => Resolution::apology(e),
            }
        }
    }
}

/// Owns the tabs and drives every send from submission to the committed
/// reply.
///
/// Sends run on spawned tasks and report back through [`ChatEvent`]s, which
/// the owner feeds into [`Chat::apply`]. Only `apply` and the tab actions
/// write state, so the store never needs a lock.
pub struct Chat {
    pub tabs: TabStore,
    pub model: Model,
    streams: HashMap<String, StreamState>,
    provider: Arc<dyn ResponseProvider>,
    presenter: StreamingPresenter,
    events: mpsc::UnboundedSender<ChatEvent>,
    next_message: u64,
}

impl Chat {
    pub fn new(
        provider: Arc<dyn ResponseProvider>,
        presenter: StreamingPresenter,
        model: Model,
    ) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let chat = Self {
            tabs: TabStore::new(),
            model,
            streams: HashMap::new(),
            provider,
            presenter,
            events,
            next_message: 0,
        };
        (chat, events_rx)
    }

    pub fn stream_state(&self, tab_id: &str) -> Option<&StreamState> {
        self.streams.get(tab_id)
    }

    pub fn is_busy(&self, tab_id: &str) -> bool {
        self.streams.contains_key(tab_id)
    }

    /// Starts a send on the active tab. Returns false when the text is blank
    /// or the tab is still waiting on a previous reply.
    pub fn submit(&mut self, text: &str, mode: Mode) -> bool {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank submission");
            return false;
        }
        let tab = Arc::clone(self.tabs.active());
        if self.is_busy(&tab.id) {
            debug!(tab_id = %tab.id, "ignoring submission while a reply is in flight");
            return false;
        }

        self.next_message += 1;
        let user_id = format!("user-{}", self.next_message);
        let message_id = format!("system-{}", self.next_message);
        self.tabs = self.tabs.append_messages(
            &tab.id,
            vec![Message::user(user_id, text), Message::placeholder(&message_id)],
        );
        if tab.messages.is_empty() {
            self.tabs = self.tabs.rename_active_tab(tab_title(text));
        }
        self.streams.insert(
            tab.id.clone(),
            StreamState {
                message_id: message_id.clone(),
                phase: Phase::AwaitingResponse,
                content: String::new(),
            },
        );
        info!(tab_id = %tab.id, %message_id, mode = mode.label(), model = %self.model, "send accepted");

        let provider = Arc::clone(&self.provider);
        let presenter = self.presenter;
        let events = self.events.clone();
        let model = self.model;
        let prompt = text.to_string();
        let tab_id = tab.id.clone();
        tokio::spawn(async move {
            let resolution = resolve(provider.as_ref(), model, &prompt, mode).await;
            let _ = events.send(ChatEvent::Resolved {
                tab_id: tab_id.clone(),
                message_id: message_id.clone(),
            });
            let content = presenter
                .stream(resolution.content, |prefix| {
                    let _ = events.send(ChatEvent::Chunk {
                        tab_id: tab_id.clone(),
                        message_id: message_id.clone(),
                        content: prefix,
                    });
                })
                .await;
            let thought_process = match mode {
                Mode::Think => resolution.thought_process,
                _ => None,
            };
            let _ = events.send(ChatEvent::Completed {
                tab_id,
                message_id,
                content,
                thought_process,
            });
        });
        true
    }

    /// Folds a progress event into the state. Events for closed tabs or
    /// unknown messages change nothing.
    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Resolved { tab_id, message_id } => {
                if let Some(stream) = self.current_stream(&tab_id, &message_id) {
                    stream.phase = Phase::Streaming;
                    stream.content.clear();
                }
            }
            ChatEvent::Chunk {
                tab_id,
                message_id,
                content,
            } => {
                if let Some(stream) = self.current_stream(&tab_id, &message_id) {
                    stream.content = content;
                }
            }
            ChatEvent::Completed {
                tab_id,
                message_id,
                content,
                thought_process,
            } => {
                if self.current_stream(&tab_id, &message_id).is_some() {
                    self.streams.remove(&tab_id);
                }
                self.tabs = self.tabs.update_message(
                    &tab_id,
                    &message_id,
                    MessagePatch {
                        content: Some(content),
                        completed: Some(true),
                        thought_process: Some(thought_process),
                    },
                );
                info!(%tab_id, %message_id, "reply completed");
            }
        }
    }

    fn current_stream(&mut self, tab_id: &str, message_id: &str) -> Option<&mut StreamState> {
        self.streams
            .get_mut(tab_id)
            .filter(|stream| stream.message_id == message_id)
    }

    pub fn new_tab(&mut self) {
        self.tabs = self.tabs.create_tab();
        debug!(tab_id = %self.tabs.active().id, "opened tab");
    }

    pub fn close_tab(&mut self, id: &str) {
        let before = self.tabs.len();
        self.tabs = self.tabs.close_tab(id);
        if self.tabs.len() < before {
            self.streams.remove(id);
            debug!(tab_id = %id, "closed tab");
        }
    }

    pub fn close_active_tab(&mut self) {
        let id = self.tabs.active().id.clone();
        self.close_tab(&id);
    }

    pub fn select_tab(&mut self, id: &str) {
        self.tabs = self.tabs.select_tab(id);
    }

    pub fn select_next_tab(&mut self) {
        self.tabs = self.tabs.select_next();
    }

    pub fn select_previous_tab(&mut self) {
        self.tabs = self.tabs.select_previous();
    }

    pub fn open_history(&mut self, title: &str) {
        self.tabs = self.tabs.open_history(title);
        debug!(%title, "opened history entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::Role;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers from a script, then echoes the prompt.
    #[derive(Default)]
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedProvider {
        fn with(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::default(),
            })
        }

        fn requests(&self) -> Vec<GenerateRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResponseProvider for ScriptedProvider {
        async fn generate(&self, request: GenerateRequest) -> Result<String, ProviderError> {
            self.requests.lock().unwrap().push(request.clone());
            let scripted = self.replies.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| Ok(format!("echo {}", request.prompt)))
        }
    }

    fn chat_with(provider: Arc<ScriptedProvider>) -> (Chat, mpsc::UnboundedReceiver<ChatEvent>) {
        Chat::new(
            provider,
            StreamingPresenter::new(2, Duration::ZERO),
            Model::default(),
        )
    }

    /// Applies events until `count` replies have completed.
    async fn drain(
        chat: &mut Chat,
        rx: &mut mpsc::UnboundedReceiver<ChatEvent>,
        count: usize,
    ) -> Vec<ChatEvent> {
        let mut seen = Vec::new();
        let mut completed = 0;
        while completed < count {
            let event = rx.recv().await.expect("event channel open");
            if matches!(event, ChatEvent::Completed { .. }) {
                completed += 1;
            }
            seen.push(event.clone());
            chat.apply(event);
        }
        seen
    }

    #[test]
    fn titles_are_cut_at_twenty_characters() {
        assert_eq!(tab_title("hello"), "hello");
        assert_eq!(tab_title("exactly twenty chars"), "exactly twenty chars");
        assert_eq!(
            tab_title("abcdefghijklmnopqrstuvwxyz1234"),
            "abcdefghijklmnopqrst..."
        );
        assert_eq!(tab_title("ééééééééééééééééééééé"), "éééééééééééééééééééé...");
    }

    #[test]
    fn mode_toggles_back_to_none() {
        assert_eq!(Mode::None.toggle(Mode::Think), Mode::Think);
        assert_eq!(Mode::Think.toggle(Mode::Think), Mode::None);
        assert_eq!(Mode::Think.toggle(Mode::Translate), Mode::Translate);
    }

    #[tokio::test]
    async fn greeting_bypasses_the_provider() {
        let provider = ScriptedProvider::with(vec![]);
        let (mut chat, mut rx) = chat_with(provider.clone());

        assert!(chat.submit("hello", Mode::None));
        let tab = chat.tabs.active().clone();
        assert_eq!(tab.title, "hello");
        assert_eq!(tab.messages.len(), 2);
        assert_eq!(tab.messages[0].role, Role::User);
        assert_eq!(tab.messages[0].content, "hello");
        assert_eq!(tab.messages[1].role, Role::System);
        assert!(!tab.messages[1].completed);
        assert_eq!(
            chat.stream_state(&tab.id).map(|s| s.phase),
            Some(Phase::AwaitingResponse)
        );

        drain(&mut chat, &mut rx, 1).await;
        let reply = &chat.tabs.active().messages[1];
        assert!(reply.completed);
        assert_eq!(reply.content, "Hello there! How can I assist you today?");
        assert!(provider.requests().is_empty());
        assert!(!chat.is_busy(&tab.id));
    }

    #[tokio::test]
    async fn long_first_message_truncates_the_title() {
        let (mut chat, mut rx) = chat_with(ScriptedProvider::with(vec![]));
        let text = "abcdefghijklmnopqrstuvwxyz1234";
        assert_eq!(text.len(), 30);
        assert!(chat.submit(text, Mode::None));
        assert_eq!(chat.tabs.active().title, "abcdefghijklmnopqrst...");

        drain(&mut chat, &mut rx, 1).await;
        assert!(chat.submit("second message", Mode::None));
        assert_eq!(chat.tabs.active().title, "abcdefghijklmnopqrst...");
        drain(&mut chat, &mut rx, 1).await;
        assert_eq!(chat.tabs.active().messages.len(), 4);
    }

    #[tokio::test]
    async fn provider_failure_becomes_an_apology() {
        let provider = ScriptedProvider::with(vec![Err(ProviderError::QuotaExceeded)]);
        let (mut chat, mut rx) = chat_with(provider);

        assert!(chat.submit("what is ownership?", Mode::None));
        drain(&mut chat, &mut rx, 1).await;
        let reply = &chat.tabs.active().messages[1];
        assert_eq!(reply.content, APOLOGY);
        assert!(reply.completed);
        assert_eq!(reply.thought_process, None);
    }

    #[tokio::test]
    async fn blank_and_overlapping_sends_are_rejected() {
        let (mut chat, mut rx) = chat_with(ScriptedProvider::with(vec![]));
        assert!(!chat.submit("   ", Mode::None));
        assert!(chat.tabs.active().messages.is_empty());

        assert!(chat.submit("first", Mode::None));
        assert!(!chat.submit("second", Mode::None));
        assert_eq!(chat.tabs.active().messages.len(), 2);
        drain(&mut chat, &mut rx, 1).await;
    }

    #[tokio::test]
    async fn streaming_reveals_prefixes_in_order() {
        let provider = ScriptedProvider::with(vec![Ok("a b c d e".to_string())]);
        let (mut chat, mut rx) = chat_with(provider);

        assert!(chat.submit("letters please", Mode::None));
        let events = drain(&mut chat, &mut rx, 1).await;
        let chunks: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                ChatEvent::Chunk { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(chunks, vec!["a b ", "a b c d ", "a b c d e "]);
        assert!(matches!(events.first(), Some(ChatEvent::Resolved { .. })));
        assert_eq!(chat.tabs.active().messages[1].content, "a b c d e");
    }

    #[tokio::test]
    async fn think_mode_keeps_the_reasoning() {
        let provider = ScriptedProvider::with(vec![
            Ok("step one, step two".to_string()),
            Ok("the answer".to_string()),
        ]);
        let (mut chat, mut rx) = chat_with(provider.clone());

        assert!(chat.submit("why is the sky blue", Mode::Think));
        drain(&mut chat, &mut rx, 1).await;

        let reply = &chat.tabs.active().messages[1];
        assert_eq!(reply.content, "the answer");
        assert_eq!(reply.thought_process.as_deref(), Some("step one, step two"));

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].thinking);
        assert!(!requests[1].thinking);
    }

    #[tokio::test]
    async fn think_mode_stops_after_a_failed_reasoning_pass() {
        let provider = ScriptedProvider::with(vec![Err(ProviderError::InvalidCredential)]);
        let (mut chat, mut rx) = chat_with(provider.clone());

        assert!(chat.submit("explain lifetimes", Mode::Think));
        drain(&mut chat, &mut rx, 1).await;

        let reply = &chat.tabs.active().messages[1];
        assert_eq!(reply.content, APOLOGY);
        assert_eq!(reply.thought_process, None);
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn translate_mode_flags_the_request() {
        let provider = ScriptedProvider::with(vec![]);
        let (mut chat, mut rx) = chat_with(provider.clone());

        assert!(chat.submit("good morning", Mode::Translate));
        drain(&mut chat, &mut rx, 1).await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].translate);
        assert_eq!(chat.tabs.active().messages[1].thought_process, None);
    }

    #[tokio::test]
    async fn sends_in_different_tabs_stay_separate() {
        let (mut chat, mut rx) = chat_with(ScriptedProvider::with(vec![]));
        assert!(chat.submit("first tab question", Mode::None));
        let first = chat.tabs.active().id.clone();

        chat.new_tab();
        let second = chat.tabs.active().id.clone();
        assert!(chat.submit("second tab question", Mode::None));
        assert!(chat.is_busy(&first));
        assert!(chat.is_busy(&second));

        drain(&mut chat, &mut rx, 2).await;
        let first_tab = chat.tabs.get(&first).unwrap();
        let second_tab = chat.tabs.get(&second).unwrap();
        assert_eq!(first_tab.messages[1].content, "echo first tab question");
        assert_eq!(second_tab.messages[1].content, "echo second tab question");
        assert!(chat.stream_state(&first).is_none());
        assert!(chat.stream_state(&second).is_none());
    }

    #[tokio::test]
    async fn closing_a_busy_tab_drops_its_reply() {
        let (mut chat, mut rx) = chat_with(ScriptedProvider::with(vec![]));
        chat.new_tab();
        let busy = chat.tabs.active().id.clone();
        assert!(chat.submit("going away", Mode::None));

        chat.close_tab(&busy);
        assert!(chat.tabs.get(&busy).is_none());
        assert!(!chat.is_busy(&busy));

        drain(&mut chat, &mut rx, 1).await;
        assert_eq!(chat.tabs.len(), 1);
        assert!(chat.tabs.active().messages.is_empty());
    }

    #[test]
    fn stale_events_are_ignored() {
        let (mut chat, _rx) = chat_with(ScriptedProvider::with(vec![]));
        let before = chat.tabs.clone();

        chat.apply(ChatEvent::Chunk {
            tab_id: "tab-1".into(),
            message_id: "system-42".into(),
            content: "stray".into(),
        });
        chat.apply(ChatEvent::Completed {
            tab_id: "tab-7".into(),
            message_id: "system-1".into(),
            content: "stray".into(),
            thought_process: None,
        });
        assert!(Arc::ptr_eq(before.active(), chat.tabs.active()));
        assert!(chat.stream_state("tab-1").is_none());
    }
}
