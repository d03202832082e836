use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column – one parallel sequence of a table
// ---------------------------------------------------------------------------

/// A table column. `None` marks a missing value (JSON `null` or an absent key).
pub type Column<T> = Vec<Option<T>>;

// ---------------------------------------------------------------------------
// MainComponent – dominant soil fraction of a layer
// ---------------------------------------------------------------------------

/// Main soil component reported by the classify endpoint.
///
/// The API spells the first variant `rocks`; both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainComponent {
    #[serde(alias = "rocks")]
    Rock,
    Gravel,
    Sand,
    Silt,
    Clay,
    Peat,
}

impl MainComponent {
    pub const ALL: [MainComponent; 6] = [
        MainComponent::Rock,
        MainComponent::Gravel,
        MainComponent::Sand,
        MainComponent::Silt,
        MainComponent::Clay,
        MainComponent::Peat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MainComponent::Rock => "rock",
            MainComponent::Gravel => "gravel",
            MainComponent::Sand => "sand",
            MainComponent::Silt => "silt",
            MainComponent::Clay => "clay",
            MainComponent::Peat => "peat",
        }
    }
}

impl fmt::Display for MainComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MainComponent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "rocks" => Ok(MainComponent::Rock),
            "gravel" => Ok(MainComponent::Gravel),
            "sand" => Ok(MainComponent::Sand),
            "silt" => Ok(MainComponent::Silt),
            "clay" => Ok(MainComponent::Clay),
            "peat" => Ok(MainComponent::Peat),
            other => Err(format!("unknown main component '{other}'")),
        }
    }
}
