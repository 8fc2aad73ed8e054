//! Markup to plain text plus numbered outgoing links.
//!
//! Parsing goes through html5ever (via `scraper`), which never rejects
//! input: broken markup simply yields less text and fewer links.

use scraper::{ElementRef, Html};
use url::Url;

use crate::models::Link;

/// Elements whose text is never shown to a reader.
const HIDDEN_ELEMENTS: [&str; 5] = ["head", "script", "style", "template", "svg"];

/// Elements that start a new line of text.
const BLOCK_ELEMENTS: [&str; 27] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "p", "pre", "tr",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    pub links: Vec<Link>,
}

pub fn extract(markup: &str, base_url: &str) -> Extracted {
    let document = Html::parse_document(markup);
    Extracted {
        text: visible_text(&document),
        links: links(&document, base_url),
    }
}

/// All visible text nodes in document order, whitespace collapsed and
/// block elements on their own lines.
pub fn visible_text(document: &Html) -> String {
    let mut out = TextBuilder::default();
    for node in document.root_element().descendants() {
        if let Some(element) = node.value().as_element() {
            if BLOCK_ELEMENTS.contains(&element.name()) {
                out.break_line();
            }
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            out.push_words(text);
        }
    }
    out.finish()
}

/// Every `<a href>` in document order with its href made absolute.
pub fn links(document: &Html, base_url: &str) -> Vec<Link> {
    let base = Url::parse(base_url).ok();
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "a")
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = resolve(base.as_ref(), href);
            let label = anchor.text().collect::<Vec<_>>().join(" ");
            let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
            let text = if label.is_empty() { url.clone() } else { label };
            Some(Link { text, url })
        })
        .collect()
}

/// Resolves `href` against `base`. Hrefs that are already absolute are kept
/// as written; anything unresolvable is returned trimmed but untouched.
pub fn resolve(base: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    base.and_then(|base| base.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_string())
}

#[derive(Default)]
struct TextBuilder {
    buf: String,
}

impl TextBuilder {
    fn push_words(&mut self, text: &str) {
        for word in text.split_whitespace() {
            if !self.buf.is_empty() && !self.buf.ends_with('\n') {
                self.buf.push(' ');
            }
            self.buf.push_str(word);
        }
    }

    fn break_line(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    fn finish(self) -> String {
        self.buf.trim_end().to_string()
    }
}
