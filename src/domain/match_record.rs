use serde::{Deserialize, Serialize};

/// One broadcast listing scraped from the schedule page.
///
/// Serializes as an object with exactly the fields `day`, `time`, `match`
/// and `channels`, all strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Day heading the match was listed under, verbatim.
    pub day: String,
    /// Kickoff time in `HHhMM` form.
    pub time: String,
    /// Fixture description, e.g. "Team A x Team B".
    #[serde(rename = "match")]
    pub fixture: String,
    /// Broadcast channels, empty until a `Canais:` line is seen.
    pub channels: String,
}

impl MatchRecord {
    pub fn new(day: impl Into<String>, time: impl Into<String>, fixture: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            time: time.into(),
            fixture: fixture.into(),
            channels: String::new(),
        }
    }

    pub fn has_channels(&self) -> bool {
        !self.channels.is_empty()
    }

    /// Case-insensitive comparison against a requested day label.
    pub fn is_on(&self, day: &str) -> bool {
        self.day.to_lowercase() == day.to_lowercase()
    }
}
