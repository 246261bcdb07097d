use serde::{Deserialize, Serialize};

/// Steps of one replay, in the order they execute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Arrange,
    Given,
    Describe,
    Validate,
    Act,
    Assert,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arrange => "arrange",
            Self::Given => "given",
            Self::Describe => "describe",
            Self::Validate => "validate",
            Self::Act => "act",
            Self::Assert => "assert",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
