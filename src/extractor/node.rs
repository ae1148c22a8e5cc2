use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

/// Prefix marking an annotation paragraph as a channel list.
pub const CHANNELS_PREFIX: &str = "Canais:";

/// `20h30 – Team A x Team B`. The separator is an en dash.
static MATCH_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}h\d{2})\s*–\s*(.+)").expect("match heading pattern is valid")
});

/// The three element kinds the walk cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    DayHeading,
    MatchHeading,
    Annotation,
}

impl NodeKind {
    /// Selector matching every element [`NodeKind::of`] classifies.
    pub const SELECTOR: &'static str = "h2, h3, p";

    pub fn of(element: &ElementRef<'_>) -> Option<Self> {
        match element.value().name() {
            "h2" => Some(Self::DayHeading),
            "h3" => Some(Self::MatchHeading),
            "p" => Some(Self::Annotation),
            _ => None,
        }
    }
}

/// All descendant text of an element, trimmed.
///
/// Text nodes are joined as-is and the result trimmed once, so
/// `18h30 – <strong>Grêmio</strong> x Inter` keeps its inner spaces. Trimming
/// each fragment before joining would yield `Grêmiox Inter`.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Split a match heading into `(time, fixture)`.
///
/// Returns `None` for headings that are not match entries.
pub fn parse_match_heading(text: &str) -> Option<(&str, &str)> {
    let caps = MATCH_HEADING_RE.captures(text)?;
    let time = caps.get(1)?.as_str();
    let fixture = caps.get(2)?.as_str().trim();
    Some((time, fixture))
}

/// Channel list carried by an annotation, if it is a `Canais:` line.
pub fn parse_channels(text: &str) -> Option<&str> {
    text.strip_prefix(CHANNELS_PREFIX).map(str::trim)
}
