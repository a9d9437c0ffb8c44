//! Entry types - one vocabulary item of the style guide
//!
//! Every entry carries a usage recommendation, which the source document
//! expresses loosely (booleans, `yes`/`no` words, the `avoid` sentinel, or
//! nothing at all). `UsageRecommendation` is the normalized form stored in
//! the `item.use_it` column:
//! - `yes`: the word is recommended
//! - `no`: the word should not be used
//! - `avoid`: the word is discouraged but tolerated
//! - `unknown`: the guide has no ruling

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the store when an entry is inserted.
///
/// Unique and stable for the duration of one load; identifiers follow the
/// input order of the records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl EntryId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Normalized usage recommendation of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UsageRecommendation {
    #[serde(rename = "yes")]
    Use,
    #[serde(rename = "no")]
    DoNotUse,
    #[serde(rename = "avoid")]
    Avoid,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl UsageRecommendation {
    /// Get the stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageRecommendation::Use => "yes",
            UsageRecommendation::DoNotUse => "no",
            UsageRecommendation::Avoid => "avoid",
            UsageRecommendation::Unknown => "unknown",
        }
    }

    /// Get all usage recommendations
    pub fn all() -> &'static [UsageRecommendation] {
        &[
            UsageRecommendation::Use,
            UsageRecommendation::DoNotUse,
            UsageRecommendation::Avoid,
            UsageRecommendation::Unknown,
        ]
    }

    /// Normalize a raw `use_it` value from the source document.
    ///
    /// `avoid` wins over truthiness, null means unknown, and everything else
    /// follows the truthiness of the value. YAML 1.1 boolean words are
    /// recognised even though the parser hands them over as strings.
    pub fn normalize(value: &Value) -> Self {
        match value {
            Value::Null => UsageRecommendation::Unknown,
            Value::Bool(true) => UsageRecommendation::Use,
            Value::Bool(false) => UsageRecommendation::DoNotUse,
            Value::String(text) => Self::normalize_text(text),
            Value::Number(number) => match number.as_f64() {
                Some(n) if n == 0.0 => UsageRecommendation::DoNotUse,
                _ => UsageRecommendation::Use,
            },
            Value::Sequence(items) => Self::from_truthy(!items.is_empty()),
            Value::Mapping(map) => Self::from_truthy(!map.is_empty()),
            Value::Tagged(tagged) => Self::normalize(&tagged.value),
        }
    }

    fn normalize_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "avoid" => UsageRecommendation::Avoid,
            "unknown" => UsageRecommendation::Unknown,
            "" | "no" | "n" | "false" | "off" => UsageRecommendation::DoNotUse,
            _ => UsageRecommendation::Use,
        }
    }

    fn from_truthy(truthy: bool) -> Self {
        if truthy {
            UsageRecommendation::Use
        } else {
            UsageRecommendation::DoNotUse
        }
    }
}

impl FromStr for UsageRecommendation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yes" => Ok(UsageRecommendation::Use),
            "no" => Ok(UsageRecommendation::DoNotUse),
            "avoid" => Ok(UsageRecommendation::Avoid),
            "unknown" => Ok(UsageRecommendation::Unknown),
            _ => Err(Error::InvalidUsage(s.to_string())),
        }
    }
}

impl fmt::Display for UsageRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attributes of an entry about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub name: String,
    pub class: String,
    pub desc: String,
    pub use_it: UsageRecommendation,
    #[serde(rename = "type")]
    pub kind: String,
}

impl NewEntry {
    pub fn new(
        name: impl Into<String>,
        class: impl Into<String>,
        desc: impl Into<String>,
        use_it: UsageRecommendation,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            desc: desc.into(),
            use_it,
            kind: kind.into(),
        }
    }
}

/// A stored `item` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    pub class: String,
    pub desc: String,
    pub use_it: UsageRecommendation,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Entry {
    /// Get a short description for display
    pub fn short_description(&self) -> String {
        format!("{} ({} {}, use: {})", self.name, self.class, self.kind, self.use_it)
    }
}
