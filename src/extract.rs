//! Article body extraction.
//!
//! Rendered pages are full of navigation, captions and cookie banners. The
//! extractor narrows the search to a known article-body container when the
//! page has one, keeps only paragraph text long enough to be prose, and puts
//! the page headline in front.
//!
//! # Scope resolution
//!
//! 1. Each `id` selector in the configured order; first match wins.
//! 2. Each `class` selector in the configured order; first match wins.
//! 3. The whole document.
//!
//! The headline is always looked up in the whole document, never in the
//! narrowed scope.

use crate::config::{BodySelector, SelectorKind};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// Which part of the page paragraphs were collected from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A configured body selector matched.
    Matched(BodySelector),
    /// Nothing matched; the whole document was searched.
    Document,
}

/// Text pulled out of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub headline: Option<String>,
    /// Paragraphs in document order; each is longer than the minimum.
    pub paragraphs: Vec<String>,
    /// Paragraphs discarded for being too short.
    pub dropped: usize,
    pub scope: Scope,
}

impl ExtractedText {
    /// Headline (if any) followed by the kept paragraphs.
    pub fn blocks(&self) -> impl Iterator<Item = &str> {
        self.headline
            .as_deref()
            .into_iter()
            .chain(self.paragraphs.iter().map(String::as_str))
    }

    /// Number of blocks yielded by [`blocks`](Self::blocks).
    pub fn kept(&self) -> usize {
        self.paragraphs.len() + usize::from(self.headline.is_some())
    }
}

/// Parse `markup` and run [`extract`] on it.
pub fn extract_from_markup(
    markup: &str,
    selectors: &[BodySelector],
    min_chars: usize,
) -> ExtractedText {
    let document = Html::parse_document(markup);
    extract(&document, selectors, min_chars)
}

/// Extract the headline and prose paragraphs of `document`.
///
/// # Arguments
///
/// * `document` - Parsed page markup
/// * `selectors` - Known article body containers, tried ids first then classes
/// * `min_chars` - Paragraphs of this many characters or fewer are dropped
///
/// # Returns
///
/// The first `h1` of the whole document as the headline, verbatim and even
/// when empty, plus the long paragraphs found under the matched container
/// (or the whole document when none matched). Short paragraphs only survive
/// as a count in [`ExtractedText::dropped`].
pub fn extract(document: &Html, selectors: &[BodySelector], min_chars: usize) -> ExtractedText {
    let (root, scope) = match find_body(document, selectors) {
        Some((element, selector)) => (element, Scope::Matched(selector.clone())),
        None => {
            debug!("No known body container matched; searching whole document");
            (document.root_element(), Scope::Document)
        }
    };

    let (paragraphs, dropped): (Vec<String>, Vec<String>) = root
        .select(&PARAGRAPH)
        .map(|p| p.text().collect::<String>())
        .partition(|text| text.chars().count() > min_chars);

    let headline = document
        .select(&HEADLINE)
        .next()
        .map(|h| h.text().collect::<String>());

    let extracted = ExtractedText {
        headline,
        paragraphs,
        dropped: dropped.len(),
        scope,
    };
    debug!(
        kept = extracted.kept(),
        dropped = extracted.dropped,
        scope = ?extracted.scope,
        "Extracted article text"
    );
    extracted
}

/// First element matching the selector list: all ids first, then all classes.
fn find_body<'a, 'b>(
    document: &'a Html,
    selectors: &'b [BodySelector],
) -> Option<(ElementRef<'a>, &'b BodySelector)> {
    let ids = selectors.iter().filter(|s| s.kind == SelectorKind::Id);
    let classes = selectors.iter().filter(|s| s.kind == SelectorKind::Class);

    ids.chain(classes).find_map(|selector| {
        let css = match selector.kind {
            SelectorKind::Id => format!("[id=\"{}\"]", escape_attr(&selector.value)),
            SelectorKind::Class => format!("[class~=\"{}\"]", escape_attr(&selector.value)),
        };
        match Selector::parse(&css) {
            Ok(parsed) => document
                .select(&parsed)
                .next()
                .map(|element| (element, selector)),
            Err(e) => {
                warn!(value = %selector.value, error = %e, "Skipping unparseable body selector");
                None
            }
        }
    })
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
