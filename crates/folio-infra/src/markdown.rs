//! Markdown to HTML via pulldown-cmark.
//!
//! On top of the stock renderer:
//! - headings get `id` attributes slugged from their text, de-duplicated in
//!   document order (`intro`, `intro-1`, ...)
//! - absolute `http(s)` links open in a new tab
//! - raw HTML in the source is escaped and shown as text

use std::collections::HashSet;

use pulldown_cmark::{Event, Options, Parser, Tag, html};

use folio_core::ports::MarkdownRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownMarkdown;

impl PulldownMarkdown {
    pub fn new() -> Self {
        Self
    }

    fn options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
    }
}

impl MarkdownRenderer for PulldownMarkdown {
    fn render(&self, markdown: &str) -> String {
        let events: Vec<Event<'_>> = Parser::new_ext(markdown, Self::options()).collect();
        let ids = heading_ids(&events);
        let mut ids = ids.iter().map(String::as_str);
        // One flag per open link, true when we emitted the anchor ourselves.
        let mut open_links: Vec<bool> = Vec::new();

        let events = events.into_iter().map(|event| match event {
            Event::Start(Tag::Heading(level, _, classes)) => {
                Event::Start(Tag::Heading(level, ids.next(), classes))
            }
            Event::Start(Tag::Link(kind, dest, title)) => {
                if is_external(&dest) {
                    open_links.push(true);
                    Event::Html(external_anchor(&dest, &title).into())
                } else {
                    open_links.push(false);
                    Event::Start(Tag::Link(kind, dest, title))
                }
            }
            Event::End(Tag::Link(kind, dest, title)) => {
                if open_links.pop().unwrap_or(false) {
                    Event::Html("</a>".into())
                } else {
                    Event::End(Tag::Link(kind, dest, title))
                }
            }
            Event::Html(raw) => Event::Text(raw),
            other => other,
        });

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events);
        out
    }
}

fn heading_ids(events: &[Event<'_>]) -> Vec<String> {
    let mut used = HashSet::new();
    let mut ids = Vec::new();
    let mut text: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading(..)) => text = Some(String::new()),
            Event::Text(t) | Event::Code(t) => {
                if let Some(buf) = text.as_mut() {
                    buf.push_str(t);
                }
            }
            Event::End(Tag::Heading(..)) => {
                let base = slugify(&text.take().unwrap_or_default());
                let mut id = base.clone();
                let mut n = 0;
                while !used.insert(id.clone()) {
                    n += 1;
                    id = format!("{base}-{n}");
                }
                ids.push(id);
            }
            _ => {}
        }
    }
    ids
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug.to_string()
    }
}

fn is_external(dest: &str) -> bool {
    dest.split_once("://")
        .is_some_and(|(scheme, _)| {
            scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
        })
}

fn external_anchor(dest: &str, title: &str) -> String {
    let mut anchor = format!(
        r#"<a href="{}" target="_blank" rel="noopener noreferrer""#,
        html_escape(dest)
    );
    if !title.is_empty() {
        anchor.push_str(&format!(r#" title="{}""#, html_escape(title)));
    }
    anchor.push('>');
    anchor
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
