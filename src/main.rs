use anyhow::Context;
use clap::Parser;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use tracing::info;

use hova::app::{App, AppResult};
use hova::cli::{Cli, ProviderKind};
use hova::event::{Event, EventHandler};
use hova::handler::handle_key_events;
use hova::history::sample_history;
use hova::logging;
use hova::orchestrator::Chat;
use hova::presenter::StreamingPresenter;
use hova::provider::{CannedProvider, GenaiProvider, ResponseProvider};
use hova::tui::Tui;

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();
    let log_path = logging::init(&cli.log_level).context("Failed to set up logging")?;
    info!(log = %log_path.display(), provider = ?cli.provider, model = %cli.model, "starting hova");

    let provider: Arc<dyn ResponseProvider> = match cli.provider {
        ProviderKind::Genai => Arc::new(GenaiProvider::new(&cli.system_prompt, cli.temperature)),
        ProviderKind::Canned => Arc::new(CannedProvider),
    };
    let presenter = StreamingPresenter::new(cli.chunk_size.into(), cli.word_delay());
    let (chat, mut chat_events) = Chat::new(provider, presenter, cli.model);

    // Create an application.
    let mut app = App::new(chat, sample_history().into_iter().collect());

    // Initialize the terminal user interface.
    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    let events = EventHandler::new(250);
    let mut tui = Tui::new(terminal, events);
    tui.init().context("Failed to initialize terminal")?;

    // Start the main loop.
    while app.running {
        // Render the user interface.
        tui.draw(&mut app)
            .context("Failed to render user interface")?;
        // Handle terminal events and reply progress, whichever comes first.
        tokio::select! {
            event = tui.events.next() => match event.context("Unable to get next event")? {
                Event::Tick => app.tick(),
                Event::Key(key_event) => {
                    handle_key_events(key_event, &mut app).context("Error handling key events")?
                }
                Event::Mouse(_) | Event::Resize(_, _) => {}
            },
            Some(chat_event) = chat_events.recv() => app.chat.apply(chat_event),
        }
    }

    // Exit the user interface.
    tui.exit().context("Failed during application shutdown")?;
    info!("bye");
    Ok(())
}
