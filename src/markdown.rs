//! Card Description Markdown
//!
//! pulldown-cmark with strikethrough, tables and task lists, plus the
//! color syntax `%r%red text%r%`. Raw HTML in descriptions is shown as
//! text, never injected.

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser};

/// Color codes and their hex values
const COLORS: &[(&str, &str)] = &[
    ("r", "#e74c3c"), // red
    ("g", "#27ae60"), // green
    ("b", "#3498db"), // blue
    ("y", "#f1c40f"), // yellow
    ("o", "#e67e22"), // orange
    ("p", "#9b59b6"), // purple
];

pub fn parse_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, get_options());
    let events = transform_events(parser);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    for event in parser {
        match event {
            Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),
            Event::Text(text) if contains_color_syntax(&text) => {
                events.extend(process_colors(&text));
            }
            other => events.push(other),
        }
    }
    events
}

fn contains_color_syntax(text: &str) -> bool {
    COLORS
        .iter()
        .any(|(code, _)| text.contains(&format!("%{}%", code)))
}

/// Earliest color marker in `text`: (byte offset, marker, hex color)
fn find_marker(text: &str) -> Option<(usize, String, &'static str)> {
    COLORS
        .iter()
        .filter_map(|(code, color)| {
            let marker = format!("%{}%", code);
            text.find(&marker).map(|pos| (pos, marker, *color))
        })
        .min_by_key(|(pos, _, _)| *pos)
}

fn process_colors(text: &str) -> Vec<Event<'static>> {
    let mut events = Vec::new();
    let mut remaining = text;

    while let Some((pos, marker, color)) = find_marker(remaining) {
        if pos > 0 {
            events.push(Event::Text(CowStr::from(remaining[..pos].to_string())));
        }
        let after = &remaining[pos + marker.len()..];
        match after.find(&marker) {
            Some(end) => {
                events.push(Event::Html(CowStr::from(format!(
                    "<span style=\"color: {}\">",
                    color
                ))));
                if end > 0 {
                    events.push(Event::Text(CowStr::from(after[..end].to_string())));
                }
                events.push(Event::Html(CowStr::from("</span>")));
                remaining = &after[end + marker.len()..];
            }
            // unmatched marker stays literal
            None => {
                events.push(Event::Text(CowStr::from(marker)));
                remaining = after;
            }
        }
    }
    if !remaining.is_empty() {
        events.push(Event::Text(CowStr::from(remaining.to_string())));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = parse_markdown("**forte** e ~~riscado~~");
        assert!(html.contains("<strong>forte</strong>"));
        assert!(html.contains("<del>riscado</del>"));
    }

    #[test]
    fn test_color_syntax() {
        let html = parse_markdown("antes %r%urgente%r% depois");
        assert!(html.contains("<span style=\"color: #e74c3c\">urgente</span>"));
        assert!(html.starts_with("<p>antes "));
    }

    #[test]
    fn test_unmatched_marker_is_literal() {
        let html = parse_markdown("50%g% feito");
        assert!(html.contains("50%g% feito"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = parse_markdown("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
