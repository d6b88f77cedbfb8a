use std::fmt;
use std::str::FromStr;

use super::error::PolicyError;

/// Fixed enumeration of comparison criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    Runtime,
    Effect,
    Resolution,
    BitDepth,
    Bitrate,
    Quality,
    FrameRate,
    Filesize,
    Codec,
    Subtitle,
    /// Reserved for the fallback position; never part of the editable chain.
    DateAdded,
}

/// How a rule's `priority` is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Single `asc` / `desc` direction token.
    Directional,
    /// Ordered list of preferred tags; earlier wins.
    Categorical,
    /// Built-in ordering owned by the backend evaluator.
    Fixed,
}

impl RuleId {
    pub const ALL: [RuleId; 11] = [
        RuleId::Runtime,
        RuleId::Effect,
        RuleId::Resolution,
        RuleId::BitDepth,
        RuleId::Bitrate,
        RuleId::Quality,
        RuleId::FrameRate,
        RuleId::Filesize,
        RuleId::Codec,
        RuleId::Subtitle,
        RuleId::DateAdded,
    ];

    /// Default order of the editable chain.
    pub const CHAIN: [RuleId; 10] = [
        RuleId::Runtime,
        RuleId::Effect,
        RuleId::Resolution,
        RuleId::BitDepth,
        RuleId::Bitrate,
        RuleId::Quality,
        RuleId::FrameRate,
        RuleId::Filesize,
        RuleId::Codec,
        RuleId::Subtitle,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            RuleId::Runtime => "runtime",
            RuleId::Effect => "effect",
            RuleId::Resolution => "resolution",
            RuleId::BitDepth => "bit_depth",
            RuleId::Bitrate => "bitrate",
            RuleId::Quality => "quality",
            RuleId::FrameRate => "frame_rate",
            RuleId::Filesize => "filesize",
            RuleId::Codec => "codec",
            RuleId::Subtitle => "subtitle",
            RuleId::DateAdded => "date_added",
        }
    }

    pub const fn kind(self) -> RuleKind {
        match self {
            RuleId::Runtime
            | RuleId::Filesize
            | RuleId::Bitrate
            | RuleId::BitDepth
            | RuleId::FrameRate
            | RuleId::DateAdded => RuleKind::Directional,
            RuleId::Effect => RuleKind::Categorical,
            RuleId::Resolution
            | RuleId::Quality
            | RuleId::Codec
            | RuleId::Subtitle => RuleKind::Fixed,
        }
    }

    pub const fn is_fallback(self) -> bool {
        matches!(self, RuleId::DateAdded)
    }

    /// Operator-facing name.
    pub const fn label(self) -> &'static str {
        match self {
            RuleId::Runtime => "Runtime",
            RuleId::Effect => "Dynamic range",
            RuleId::Resolution => "Resolution",
            RuleId::BitDepth => "Bit depth",
            RuleId::Bitrate => "Bitrate",
            RuleId::Quality => "Quality",
            RuleId::FrameRate => "Frame rate",
            RuleId::Filesize => "File size",
            RuleId::Codec => "Codec",
            RuleId::Subtitle => "Subtitles",
            RuleId::DateAdded => "Date added",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RuleId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| PolicyError::UnknownRule(wanted.to_string()))
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Directional => write!(f, "directional"),
            RuleKind::Categorical => write!(f, "categorical"),
            RuleKind::Fixed => write!(f, "fixed"),
        }
    }
}

/// Preferred end of a directional comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Prefer smaller / older.
    Asc,
    /// Prefer larger / newer.
    Desc,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(PolicyError::InvalidDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionalRule {
    pub(crate) id: RuleId,
    pub(crate) enabled: bool,
    pub(crate) direction: Direction,
}

impl DirectionalRule {
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Categorical rule; `labels` are display-form tags, most preferred first.
/// Always non-empty and duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalRule {
    pub(crate) id: RuleId,
    pub(crate) enabled: bool,
    pub(crate) labels: Vec<String>,
}

impl CategoricalRule {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedRule {
    pub(crate) id: RuleId,
    pub(crate) enabled: bool,
}

/// One criterion of the editable chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Directional(DirectionalRule),
    Categorical(CategoricalRule),
    Fixed(FixedRule),
}

impl Rule {
    pub fn id(&self) -> RuleId {
        match self {
            Rule::Directional(rule) => rule.id,
            Rule::Categorical(rule) => rule.id,
            Rule::Fixed(rule) => rule.id,
        }
    }

    pub fn kind(&self) -> RuleKind {
        self.id().kind()
    }

    pub fn enabled(&self) -> bool {
        match self {
            Rule::Directional(rule) => rule.enabled,
            Rule::Categorical(rule) => rule.enabled,
            Rule::Fixed(rule) => rule.enabled,
        }
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        match self {
            Rule::Directional(rule) => rule.enabled = enabled,
            Rule::Categorical(rule) => rule.enabled = enabled,
            Rule::Fixed(rule) => rule.enabled = enabled,
        }
    }
}

/// The always-last `date_added` tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackRule {
    pub(crate) enabled: bool,
    pub(crate) direction: Direction,
}

impl FallbackRule {
    pub const ID: RuleId = RuleId::DateAdded;

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Default for FallbackRule {
    /// Oldest wins unless the operator says otherwise.
    fn default() -> Self {
        Self {
            enabled: true,
            direction: Direction::Asc,
        }
    }
}
