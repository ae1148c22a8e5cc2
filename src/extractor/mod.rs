//! Turns the schedule page markup into [`MatchRecord`]s.
//!
//! The content region is scanned left to right over its `h2` (day),
//! `h3` (match) and `p` (annotation) descendants in document order:
//!
//! ```text
//! h2 "Sábado"                     → current day
//! h3 "16h00 – Flamengo x Vasco"   → new record under current day
//! p  "Canais: Globo, Premiere"    → channels of that record
//! ```
//!
//! Headings that are not match entries and stray paragraphs are skipped
//! without error.

pub mod node;

use scraper::{Html, Selector};

use crate::app::{MatchcastError, Result};
use crate::config::DEFAULT_CONTENT_SELECTOR;
use crate::domain::MatchRecord;

pub use node::NodeKind;

#[derive(Debug, Clone)]
pub struct Extractor {
    content: Selector,
    content_source: String,
    nodes: Selector,
}

impl Extractor {
    pub fn new(content_selector: &str) -> Result<Self> {
        let content = Selector::parse(content_selector).map_err(|e| {
            MatchcastError::InvalidSelector(format!("{}: {}", content_selector, e))
        })?;
        let nodes = Selector::parse(NodeKind::SELECTOR)
            .map_err(|e| MatchcastError::InvalidSelector(e.to_string()))?;

        Ok(Self {
            content,
            content_source: content_selector.to_string(),
            nodes,
        })
    }

    /// Extract every match listed in `markup`, in page order.
    ///
    /// Fails with [`MatchcastError::ContentNotFound`] when the content region
    /// is absent.
    pub fn extract(&self, markup: &str) -> Result<Vec<MatchRecord>> {
        let document = Html::parse_document(markup);

        let region = document
            .select(&self.content)
            .next()
            .ok_or_else(|| MatchcastError::ContentNotFound(self.content_source.clone()))?;

        let mut matches: Vec<MatchRecord> = Vec::new();
        let mut current_day = String::new();

        for element in region.select(&self.nodes) {
            let Some(kind) = NodeKind::of(&element) else {
                continue;
            };

            match kind {
                NodeKind::DayHeading => {
                    current_day = node::element_text(&element);
                }
                NodeKind::MatchHeading => {
                    let text = node::element_text(&element);
                    match node::parse_match_heading(&text) {
                        Some((time, fixture)) => {
                            matches.push(MatchRecord::new(current_day.as_str(), time, fixture));
                        }
                        None => tracing::trace!("Skipping non-match heading: {:?}", text),
                    }
                }
                NodeKind::Annotation => {
                    let Some(last) = matches.last_mut().filter(|m| !m.has_channels()) else {
                        continue;
                    };
                    if let Some(channels) = node::parse_channels(&node::element_text(&element)) {
                        last.channels = channels.to_string();
                    }
                }
            }
        }

        tracing::debug!("Extracted {} matches", matches.len());
        Ok(matches)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        // The built-in selector is a valid literal.
        Self::new(DEFAULT_CONTENT_SELECTOR).expect("default content selector is valid")
    }
}

/// Extract with the default content region.
pub fn extract(markup: &str) -> Result<Vec<MatchRecord>> {
    Extractor::default().extract(markup)
}
