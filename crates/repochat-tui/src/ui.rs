use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use repochat_core::{ChatSession, IngestController, InputBuffer, Origin};

use crate::app::{App, Screen};
use crate::markdown::parse_markdown_line;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let pending = app.is_pending();
    if let Screen::Landing(ingest) = &app.screen {
        render_landing(ingest, app.notice.as_deref(), app.animation_frame, frame, body_area);
    } else {
        render_chat(app, frame, body_area);
    }

    render_footer(app, pending, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Repository Q&A ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!(" {} ", app.api_url), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, pending: bool, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let (mode_text, mut hints) = match app.screen {
        Screen::Landing(_) => (
            " INGEST ",
            vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" start chat ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" quit ", label_style),
            ],
        ),
        Screen::Chat(_) => (
            " CHAT ",
            vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" PgUp/PgDn ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" new repo ", label_style),
            ],
        ),
    };
    hints.extend([
        Span::styled(" Ctrl+C ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let mode_style = if pending {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else {
        Style::default().bg(Color::Blue).fg(Color::White)
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    spans.extend(hints);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Text field with horizontal scrolling; places the cursor when `editable`.
fn render_input(
    input: &InputBuffer,
    placeholder: &str,
    title: &str,
    editable: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let border_color = if editable { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());

    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_col) = input.visible(inner_width);

    let paragraph = if input.is_empty() {
        Paragraph::new(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let fg = if editable { Color::Cyan } else { Color::DarkGray };
        Paragraph::new(visible_text).style(Style::default().fg(fg))
    };

    frame.render_widget(paragraph.block(block), area);

    if editable {
        frame.set_cursor_position((area.x + cursor_col as u16 + 1, area.y + 1));
    }
}

fn render_landing(
    ingest: &IngestController,
    notice: Option<&str>,
    animation_frame: u8,
    frame: &mut Frame,
    area: Rect,
) {
    let [column] = Layout::horizontal([Constraint::Max(72)])
        .flex(Flex::Center)
        .areas(area);
    let [card] = Layout::vertical([Constraint::Length(11)])
        .flex(Flex::Center)
        .areas(column);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" GitHub Repository Q&A ");
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let [label_area, input_area, status_area, message_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Min(0),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(" GitHub Repository URL").style(Style::default().fg(Color::Gray)),
        label_area,
    );

    let pending = ingest.state().is_pending();
    render_input(
        ingest.input(),
        "https://github.com/username/repo",
        " URL ",
        !pending,
        frame,
        input_area,
    );

    let status = if pending {
        let dots = ".".repeat(animation_frame as usize + 1);
        Span::styled(
            format!(" Indexing{dots} (This may take a minute)"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(
            " Start Chat [Enter]",
            Style::default().fg(Color::Indexed(99)).bold(),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(status)), status_area);

    // A fresh notice outranks the error left by the last ingest
    let message = if let Some(notice) = notice {
        Some(Span::styled(format!(" {notice}"), Style::default().fg(Color::Yellow)))
    } else {
        ingest
            .error()
            .map(|e| Span::styled(format!(" Error: {e}"), Style::default().fg(Color::Red)))
    };
    if let Some(message) = message {
        frame.render_widget(
            Paragraph::new(Line::from(message)).wrap(Wrap { trim: true }),
            message_area,
        );
    }
}

fn transcript_text(chat: &ChatSession, animation_frame: u8) -> Text<'static> {
    if chat.transcript().is_empty() && !chat.state().is_pending() && chat.error().is_none() {
        return Text::from(Span::styled(
            "Ask a question about the repository...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines: Vec<Line> = Vec::new();

    for msg in chat.transcript() {
        match msg.origin {
            Origin::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
                for line in msg.body.lines() {
                    lines.push(Line::from(line.to_string()));
                }
            }
            Origin::Assistant => {
                lines.push(Line::from(Span::styled(
                    "AI:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                for line in msg.body.lines() {
                    lines.push(parse_markdown_line(line));
                }
            }
        }
        lines.push(Line::default());
    }

    if chat.state().is_pending() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat(animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{dots}"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    if let Some(error) = chat.error() {
        lines.push(Line::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        )));
    }

    Text::from(lines)
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [title_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let Screen::Chat(chat) = &app.screen else {
        return;
    };

    let title = Line::from(vec![
        Span::raw(" Chat with: "),
        Span::styled(
            chat.session_id().to_string(),
            Style::default().fg(Color::Indexed(99)).bold(),
        ),
    ])
    .centered();
    frame.render_widget(Paragraph::new(title), title_area);

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let transcript = Paragraph::new(transcript_text(chat, app.animation_frame))
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(transcript, chat_area);

    render_input(
        chat.input(),
        "Ask about the repository...",
        " Ask ",
        !chat.state().is_pending(),
        frame,
        input_area,
    );
}
