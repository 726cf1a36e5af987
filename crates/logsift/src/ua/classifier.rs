use std::fmt;
use std::str::FromStr;

use super::heuristic::HeuristicStrategy;
use super::model::UaClassification;

/// One classification engine. Both implementations produce the same output
/// shape; `ua_lc` is the ASCII-lowercased form of `ua`, index-aligned with
/// the original.
pub(crate) trait UaStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, ua: &str, ua_lc: &str) -> UaClassification;
}

/// Which engine to use for the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnginePreference {
    /// Profile tables when compiled in, heuristics otherwise.
    #[default]
    Auto,
    /// Force the heuristic fallback.
    Heuristic,
}

impl EnginePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnginePreference::Auto => "auto",
            EnginePreference::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for EnginePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EnginePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(EnginePreference::Auto),
            "heuristic" | "heuristics" => Ok(EnginePreference::Heuristic),
            _ => Err(format!("invalid ua engine: {s}")),
        }
    }
}

/// User-agent classifier with the engine fixed at construction time.
///
/// `classify` is a pure function of its input: no state is carried between
/// calls and the engine choice is never re-evaluated per line.
pub struct Classifier {
    strategy: Box<dyn UaStrategy>,
}

impl Classifier {
    pub fn for_preference(preference: EnginePreference) -> Self {
        match preference {
            EnginePreference::Heuristic => Self::heuristic(),
            EnginePreference::Auto => Self::auto(),
        }
    }

    fn auto() -> Self {
        #[cfg(feature = "ua-profiles")]
        {
            Self::profiles()
        }
        #[cfg(not(feature = "ua-profiles"))]
        {
            Self::heuristic()
        }
    }

    pub fn heuristic() -> Self {
        Self {
            strategy: Box::new(HeuristicStrategy),
        }
    }

    #[cfg(feature = "ua-profiles")]
    pub fn profiles() -> Self {
        Self {
            strategy: Box::new(super::profiles::ProfileStrategy),
        }
    }

    /// Engine label reported in run metadata.
    pub fn engine_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Classify one user-agent string. Never fails; empty input yields the
    /// all-absent shape.
    pub fn classify(&self, ua: &str) -> UaClassification {
        if ua.is_empty() {
            return UaClassification::empty();
        }
        let ua_lc = ua.to_ascii_lowercase();
        self.strategy.classify(ua, &ua_lc)
    }
}
