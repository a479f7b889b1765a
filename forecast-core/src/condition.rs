use serde::{Deserialize, Serialize};

/// Visual category for a provider condition text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Storm,
    Fog,
    Windy,
    Unknown,
}

/// Keyword groups checked in order; the first group with a hit wins.
const KEYWORD_GROUPS: &[(IconCategory, &[&str])] = &[
    (IconCategory::Clear, &["sunny", "clear"]),
    (IconCategory::Cloudy, &["cloud", "overcast"]),
    (IconCategory::Rain, &["rain", "drizzle"]),
    (IconCategory::Snow, &["snow", "sleet", "ice", "blizzard"]),
    (IconCategory::Storm, &["storm", "thunder", "lightning"]),
    (IconCategory::Fog, &["fog", "mist", "haze"]),
    (IconCategory::Windy, &["wind", "breeze"]),
];

impl IconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::Clear => "clear",
            IconCategory::Cloudy => "cloudy",
            IconCategory::Rain => "rain",
            IconCategory::Snow => "snow",
            IconCategory::Storm => "storm",
            IconCategory::Fog => "fog",
            IconCategory::Windy => "windy",
            IconCategory::Unknown => "unknown",
        }
    }

    /// Emoji glyph used by text renderers.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconCategory::Clear => "☀️",
            IconCategory::Cloudy => "☁️",
            IconCategory::Rain => "🌧️",
            IconCategory::Snow => "❄️",
            IconCategory::Storm => "⛈️",
            IconCategory::Fog => "🌫️",
            IconCategory::Windy => "💨",
            IconCategory::Unknown => "⛅",
        }
    }

    pub const fn all() -> &'static [IconCategory] {
        &[
            IconCategory::Clear,
            IconCategory::Cloudy,
            IconCategory::Rain,
            IconCategory::Snow,
            IconCategory::Storm,
            IconCategory::Fog,
            IconCategory::Windy,
            IconCategory::Unknown,
        ]
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a free-text condition (e.g. "Partly cloudy") into an [`IconCategory`].
///
/// Matching is a case-insensitive substring search over ordered keyword groups,
/// so "Cloudy with rain" is `Cloudy`. Text matching no group is `Unknown`.
pub fn classify(condition_text: &str) -> IconCategory {
    let lower = condition_text.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(IconCategory::Unknown)
}
