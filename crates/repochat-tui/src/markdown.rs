//! Just enough markdown for answers about code: `**bold**` and `` `inline code` ``.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

fn code_style() -> Style {
    Style::default().fg(Color::Green)
}

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Convert one line of an answer into styled spans. Unclosed markers are
/// kept as literal text.
pub fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        let (marker, style) = if rest.starts_with("**") {
            ("**", bold_style())
        } else if rest.starts_with('`') {
            ("`", code_style())
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                plain.push(c);
            }
            rest = chars.as_str();
            continue;
        };

        let after = &rest[marker.len()..];
        match after.find(marker) {
            Some(end) if end > 0 => {
                if !plain.is_empty() {
                    spans.push(Span::raw(std::mem::take(&mut plain)));
                }
                spans.push(Span::styled(after[..end].to_string(), style));
                rest = &after[end + marker.len()..];
            }
            _ => {
                plain.push_str(marker);
                rest = after;
            }
        }
    }

    if !plain.is_empty() {
        spans.push(Span::raw(plain));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}
