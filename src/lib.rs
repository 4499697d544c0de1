/// Application.
pub mod app;

/// Command line configuration.
pub mod cli;

/// Terminal events handler.
pub mod event;

/// Widget renderer.
pub mod ui;

/// Terminal user interface.
pub mod tui;

/// Event handler.
pub mod handler;

/// Canned replies for greetings.
pub mod greeting;

/// Sidebar chat history.
pub mod history;

/// File logging.
pub mod logging;

/// Supported models.
pub mod models;

/// Send lifecycle: submission, resolution, streaming and commit.
pub mod orchestrator;

/// Word-by-word reveal of finished replies.
pub mod presenter;

/// Instruction texts sent with each request.
pub mod prompts;

/// Response providers.
pub mod provider;

/// Tab and message store.
pub mod tabs;
