use std::sync::LazyLock;

use log::warn;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd, html};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::MarkdownConfig;

// Initialize syntax highlighting resources once
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Title used when the converted page has no level-1 heading.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Markdown to HTML converter.
pub struct MarkdownRenderer {
    theme: Option<&'static Theme>,
}

impl MarkdownRenderer {
    pub fn new(config: &MarkdownConfig) -> Self {
        let theme = if config.highlight {
            let theme = THEME_SET.themes.get(&config.syntax_theme);
            if theme.is_none() {
                warn!(
                    "Unknown syntax theme '{}', code highlighting disabled",
                    config.syntax_theme
                );
            }
            theme
        } else {
            None
        };

        Self { theme }
    }

    /// Renders without syntax highlighting.
    pub fn plain() -> Self {
        Self { theme: None }
    }

    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let Some(theme) = self.theme else {
            let mut out = String::new();
            html::push_html(&mut out, parser);
            return out;
        };

        let events: Vec<Event> = parser.collect();
        let mut processed_events = Vec::with_capacity(events.len());
        let mut i = 0;

        while i < events.len() {
            match &events[i] {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) if !lang.is_empty() => {
                    let mut code = String::new();
                    i += 1;

                    while i < events.len() {
                        match &events[i] {
                            Event::End(TagEnd::CodeBlock) => break,
                            Event::Text(text) => code.push_str(text),
                            _ => {}
                        }
                        i += 1;
                    }

                    processed_events.push(Event::Html(highlight(&code, lang, theme).into()));
                }
                event => processed_events.push(event.clone()),
            }
            i += 1;
        }

        let mut out = String::new();
        html::push_html(&mut out, processed_events.into_iter());
        out
    }
}

fn highlight(code: &str, lang: &str, theme: &Theme) -> String {
    let fallback = || format!("<pre><code>{}</code></pre>\n", html_escape::encode_text(code));

    // Info strings may carry attributes after the language token
    let token = lang.split_whitespace().next().unwrap_or_default();
    match SYNTAX_SET.find_syntax_by_token(token) {
        Some(syntax) => highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme)
            .unwrap_or_else(|_| fallback()),
        None => fallback(),
    }
}

/// Inner text of the first `<h1>…</h1>` that sits on a single line, or
/// [`UNKNOWN_TITLE`]. The closing tag is the last one on that line.
pub fn extract_title(html: &str) -> String {
    const OPEN: &str = "<h1>";
    const CLOSE: &str = "</h1>";

    let mut rest = html;
    while let Some(start) = rest.find(OPEN) {
        rest = &rest[start + OPEN.len()..];
        let line = rest.find('\n').map_or(rest, |end| &rest[..end]);
        if let Some(end) = line.rfind(CLOSE) {
            return line[..end].to_string();
        }
    }

    UNKNOWN_TITLE.to_string()
}
