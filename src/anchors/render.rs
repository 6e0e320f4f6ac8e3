// src/anchors/render.rs
// =============================================================================
// Renders Markdown to HTML so anchors can be collected from the markup.
//
// pulldown-cmark turns Markdown into a stream of events. Before the events
// are written out as HTML we give every heading without an explicit id an
// id derived from its text, the same way GitHub-style renderers do:
//
//   "## Getting Started!"   ->   <h2 id="getting-started">
//
// Explicit ids written with heading attributes (`## Title {#custom}`) are
// left alone.
// =============================================================================

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

/// Markdown extensions enabled for rendering.
fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Renders `source` to an HTML fragment.
pub fn render_markdown(source: &str, auto_heading_ids: bool) -> String {
    let parser = Parser::new_ext(source, markdown_options());
    let mut output = String::with_capacity(source.len() * 3 / 2);

    if auto_heading_ids {
        html::push_html(&mut output, with_heading_ids(parser).into_iter());
    } else {
        html::push_html(&mut output, parser);
    }

    output
}

// Buffers the event stream and fills in the id of every heading that has
// none. The heading's Start event is emitted before its text, so we remember
// where it sits and patch it once the matching End arrives.
fn with_heading_ids<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    // (index of the Start event in `out`, heading text so far)
    let mut open_heading: Option<(usize, String)> = None;

    for event in events {
        match &event {
            Event::Start(Tag::Heading { id: None, .. }) => {
                open_heading = Some((out.len(), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buffer)) = open_heading.as_mut() {
                    buffer.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, text)) = open_heading.take() {
                    let slug = slugify(&text);
                    if !slug.is_empty() {
                        let unique = unique_slug(slug, &mut seen);
                        if let Some(Event::Start(Tag::Heading { id, .. })) = out.get_mut(start) {
                            *id = Some(CowStr::from(unique));
                        }
                    }
                }
            }
            _ => {}
        }
        out.push(event);
    }

    out
}

/// Turns heading text into an anchor name.
///
/// Letters and digits are kept (lower-cased); every run of anything else
/// becomes a single `-`, and no `-` is left at either end.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

// Second and later headings with the same text get "-1", "-2", ...
fn unique_slug(slug: String, seen: &mut HashMap<String, usize>) -> String {
    match seen.get_mut(&slug) {
        Some(count) => {
            *count += 1;
            format!("{}-{}", slug, count)
        }
        None => {
            seen.insert(slug.clone(), 0);
            slug
        }
    }
}
