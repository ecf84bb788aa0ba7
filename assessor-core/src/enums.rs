//! Enum types for assessment tests and the browse list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SUBJECT
// ============================================================================

/// Ecosystem a test belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Subject {
    #[default]
    #[serde(rename = "ANGULAR")]
    Angular,
    #[serde(rename = "NESTJS")]
    NestJs,
    #[serde(rename = "RXJS")]
    RxJs,
}

impl Subject {
    /// Every subject in display order.
    pub const ALL: [Subject; 3] = [Subject::Angular, Subject::NestJs, Subject::RxJs];

    /// Wire representation (also used as the searchable text).
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Angular => "ANGULAR",
            Subject::NestJs => "NESTJS",
            Subject::RxJs => "RXJS",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            Subject::Angular => "Angular",
            Subject::NestJs => "NestJS",
            Subject::RxJs => "RxJS",
        }
    }

    /// The subject after this one, wrapping around.
    pub fn cycle_next(&self) -> Subject {
        match self {
            Subject::Angular => Subject::NestJs,
            Subject::NestJs => Subject::RxJs,
            Subject::RxJs => Subject::Angular,
        }
    }

    /// The subject before this one, wrapping around.
    pub fn cycle_prev(&self) -> Subject {
        match self {
            Subject::Angular => Subject::RxJs,
            Subject::NestJs => Subject::Angular,
            Subject::RxJs => Subject::NestJs,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Subject {
    type Err = SubjectParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "angular" => Ok(Subject::Angular),
            "nestjs" => Ok(Subject::NestJs),
            "rxjs" => Ok(Subject::RxJs),
            _ => Err(SubjectParseError(s.to_string())),
        }
    }
}

/// Error when parsing an invalid subject string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectParseError(pub String);

impl fmt::Display for SubjectParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid subject: {}", self.0)
    }
}

impl std::error::Error for SubjectParseError {}

// ============================================================================
// BROWSE LIST PARAMETERS
// ============================================================================

/// Subject facet of the browse list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubjectFacet {
    #[default]
    All,
    Only(Subject),
}

impl SubjectFacet {
    /// Whether a test with `subject` passes this facet.
    pub fn admits(&self, subject: Subject) -> bool {
        match self {
            SubjectFacet::All => true,
            SubjectFacet::Only(only) => *only == subject,
        }
    }

    /// All -> Angular -> NestJS -> RxJS -> All.
    pub fn cycle_next(&self) -> SubjectFacet {
        match self {
            SubjectFacet::All => SubjectFacet::Only(Subject::Angular),
            SubjectFacet::Only(Subject::RxJs) => SubjectFacet::All,
            SubjectFacet::Only(subject) => SubjectFacet::Only(subject.cycle_next()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubjectFacet::All => "All",
            SubjectFacet::Only(subject) => subject.label(),
        }
    }
}

impl fmt::Display for SubjectFacet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectFacet::All => write!(f, "ALL"),
            SubjectFacet::Only(subject) => write!(f, "{}", subject),
        }
    }
}

/// Sort order of the browse list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recently updated first.
    #[default]
    Updated,
    /// Name A to Z.
    Name,
    /// Highest level first.
    Level,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Updated => "updated",
            SortKey::Name => "name",
            SortKey::Level => "level",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Updated => "Recently updated",
            SortKey::Name => "Name A→Z",
            SortKey::Level => "Level high→low",
        }
    }

    pub fn cycle_next(&self) -> SortKey {
        match self {
            SortKey::Updated => SortKey::Name,
            SortKey::Name => SortKey::Level,
            SortKey::Level => SortKey::Updated,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SortKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "updated" => Ok(SortKey::Updated),
            "name" => Ok(SortKey::Name),
            "level" => Ok(SortKey::Level),
            _ => Err(SortKeyParseError(s.to_string())),
        }
    }
}

/// Error when parsing an invalid sort key string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeyParseError(pub String);

impl fmt::Display for SortKeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid sort key: {}", self.0)
    }
}

impl std::error::Error for SortKeyParseError {}
