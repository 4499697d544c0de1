use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, List, ListItem, Paragraph, Tabs},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::app::{App, InputMode};
use crate::orchestrator::{Phase, StreamState};
use crate::tabs::{Message, Role};

const SIDEBAR_WIDTH: u16 = 28;

pub fn render(f: &mut Frame, app: &mut App) {
    f.render_widget(
        Block::bordered()
            .title("hova")
            .title_alignment(Alignment::Center)
            .border_type(BorderType::Rounded),
        f.area(),
    );
    let inner = f.area().inner(ratatui::layout::Margin::new(1, 1));

    let main_area = if app.sidebar_visible {
        let [sidebar_area, main_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .areas(inner);
        render_sidebar(f, app, sidebar_area);
        main_area
    } else {
        inner
    };

    let [tabs_area, messages_area, help_area, input_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(5),
    ])
    .areas(main_area);

    render_tabs(f, app, tabs_area);
    render_messages(f, app, messages_area);
    render_help(f, app, help_area);

    let mut input_title = format!("Input [{}]", app.mode.label());
    if app.is_waiting() {
        input_title = "Waiting for response...".to_string();
    }
    app.input_textarea.set_block(
        Block::bordered()
            .title(input_title)
            .border_style(focus_style(app.input_mode == InputMode::Editing)),
    );
    f.render_widget(&app.input_textarea, input_area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app.history.items.iter().map(ListItem::from).collect();
    let list = List::new(items)
        .block(
            Block::bordered()
                .title("Recent Chats")
                .border_style(focus_style(app.input_mode == InputMode::History)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, area, &mut app.history.state);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .chat
        .tabs
        .iter()
        .map(|tab| {
            if app.chat.is_busy(&tab.id) {
                Line::from(format!("{} *", tab.title))
            } else {
                Line::from(tab.title.clone())
            }
        })
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::bordered().title(format!("Model: {}", app.chat.model)))
        .select(app.chat.tabs.active_index())
        .highlight_style(Style::default().fg(Color::Yellow).bold());
    f.render_widget(tabs, area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let msg: Vec<Span> = match app.input_mode {
        InputMode::Normal => vec![
            "q".bold(),
            " quit, ".into(),
            "i".bold(),
            " edit, ".into(),
            "t/w".bold(),
            " new/close tab, ".into(),
            "Tab".bold(),
            " switch, ".into(),
            "h".bold(),
            " history, ".into(),
            "m".bold(),
            " model, ".into(),
            "o".bold(),
            " thoughts".into(),
        ],
        InputMode::Editing => vec![
            "Esc".bold(),
            " stop editing, ".into(),
            "Alt+Enter".bold(),
            " send, ".into(),
            "^T".bold(),
            " translate, ".into(),
            "^R".bold(),
            " think, ".into(),
            "^F".bold(),
            " file".into(),
        ],
        InputMode::History => vec![
            "j/k".bold(),
            " move, ".into(),
            "Enter".bold(),
            " open, ".into(),
            "Esc".bold(),
            " back".into(),
        ],
    };
    f.render_widget(Paragraph::new(Line::from(msg)), area);
}

fn waiting_dots(ticks: u64) -> String {
    ".".repeat((ticks % 3) as usize + 1)
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: usize, style: Style) {
    for line in textwrap::wrap(text, width.max(1)) {
        lines.push(Line::styled(line.into_owned(), style));
    }
}

fn message_lines(
    message: &Message,
    stream: Option<&StreamState>,
    app: &App,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    match message.role {
        Role::User => {
            lines.push(Line::from("You".yellow().bold()));
            push_wrapped(&mut lines, &message.content, width, Style::default());
        }
        Role::System => {
            lines.push(Line::from("hova".green().bold()));
            if let Some(thoughts) = message.thought_process.as_deref().filter(|t| !t.is_empty()) {
                if app.show_thoughts {
                    lines.push(Line::from("▾ Thought Process".dim()));
                    push_wrapped(&mut lines, thoughts, width, Style::default().dim().italic());
                } else {
                    lines.push(Line::from("▸ Thought Process".dim()));
                }
            }
            let live = stream.filter(|s| s.message_id == message.id);
            match live.map(|s| s.phase) {
                Some(Phase::AwaitingResponse) => {
                    lines.push(Line::from(waiting_dots(app.ticks)));
                }
                Some(Phase::Streaming) => {
                    let content = live.map(|s| s.content.as_str()).unwrap_or_default();
                    push_wrapped(&mut lines, content, width, Style::default().fg(Color::Green));
                }
                None => push_wrapped(
                    &mut lines,
                    &message.content,
                    width,
                    Style::default().fg(Color::Green),
                ),
            }
        }
    }
    lines.push(Line::default());
    lines
}

fn render_messages(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::bordered().title("Chat");
    let inner = block.inner(area);
    let tab = app.chat.tabs.active().clone();

    if tab.messages.is_empty() {
        f.render_widget(block, area);
        let banner = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(Color::Green))
            .lines(vec!["hova".into()])
            .centered()
            .build();
        let [_, banner_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Fill(1),
        ])
        .areas(inner);
        f.render_widget(banner, banner_area);
        return;
    }

    let width = inner.width.saturating_sub(1) as usize;
    let view: &App = app;
    let stream = view.chat.stream_state(&tab.id);
    let lines: Vec<Line> = tab
        .messages
        .iter()
        .flat_map(|message| message_lines(message, stream, view, width))
        .collect();

    // Scroll is counted from the bottom so new output stays in view.
    let height = inner.height as usize;
    let max_scroll = lines.len().saturating_sub(height);
    app.vertical_scroll = app.vertical_scroll.min(max_scroll);
    let top = (max_scroll - app.vertical_scroll) as u16;

    let messages = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((top, 0));
    f.render_widget(messages, area);
}
