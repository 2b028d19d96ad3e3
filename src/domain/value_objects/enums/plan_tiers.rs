use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Basic,
    Standard,
    Premium,
}

impl Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tier = match self {
            PlanTier::Basic => "basic",
            PlanTier::Standard => "standard",
            PlanTier::Premium => "premium",
        };
        write!(f, "{}", tier)
    }
}

impl PlanTier {
    /// Reads a tier back from its column. Unknown text falls back to `Basic`.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "standard" => PlanTier::Standard,
            "premium" => PlanTier::Premium,
            _ => PlanTier::Basic,
        }
    }
}
