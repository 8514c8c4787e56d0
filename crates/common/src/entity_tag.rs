//! Entity tags and the matchers used by conditional headers.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseError;

const WEAK_PREFIX: &str = "W/";
const ASTERISK: &str = "*";

/// An entity tag, either strong (`"abc"`) or weak (`W/"abc"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag {
    weak: bool,
    opaque: String,
}

impl EntityTag {
    /// Creates a tag from its opaque part (without quotes).
    pub fn new(weak: bool, opaque: impl Into<String>) -> Result<Self, ParseError> {
        let opaque = opaque.into();
        if opaque.contains('"') {
            return Err(ParseError::InvalidEntityTag(opaque));
        }
        Ok(Self { weak, opaque })
    }

    pub fn strong(opaque: impl Into<String>) -> Result<Self, ParseError> {
        Self::new(false, opaque)
    }

    pub fn weak(opaque: impl Into<String>) -> Result<Self, ParseError> {
        Self::new(true, opaque)
    }

    /// Returns the strong tag `"rev:<revision>"` for an entity revision.
    pub fn from_revision(revision: i64) -> Self {
        Self {
            weak: false,
            opaque: format!("rev:{revision}"),
        }
    }

    pub fn is_weak(&self) -> bool {
        self.weak
    }

    pub fn opaque(&self) -> &str {
        &self.opaque
    }

    /// Both tags are strong and their opaque parts are equal.
    pub fn strong_compare(&self, other: &EntityTag) -> bool {
        !self.weak && !other.weak && self.opaque == other.opaque
    }

    /// The opaque parts are equal, regardless of weakness.
    pub fn weak_compare(&self, other: &EntityTag) -> bool {
        self.opaque == other.opaque
    }
}

impl std::fmt::Display for EntityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.weak {
            f.write_str(WEAK_PREFIX)?;
        }
        write!(f, "\"{}\"", self.opaque)
    }
}

impl FromStr for EntityTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidEntityTag(s.to_string());
        let (weak, quoted) = match s.strip_prefix(WEAK_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let opaque = quoted
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(invalid)?;
        Self::new(weak, opaque).map_err(|_| invalid())
    }
}

impl Serialize for EntityTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single `if-match`/`if-none-match` entry: `*` or an entity tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityTagMatcher {
    Asterisk,
    Tag(EntityTag),
}

impl EntityTagMatcher {
    /// `*` matches any existing entity; tags must compare strongly.
    pub fn strong_match(&self, tag: &EntityTag) -> bool {
        match self {
            EntityTagMatcher::Asterisk => true,
            EntityTagMatcher::Tag(own) => own.strong_compare(tag),
        }
    }

    /// `*` matches any existing entity; tags must compare weakly.
    pub fn weak_match(&self, tag: &EntityTag) -> bool {
        match self {
            EntityTagMatcher::Asterisk => true,
            EntityTagMatcher::Tag(own) => own.weak_compare(tag),
        }
    }

    pub fn is_asterisk(&self) -> bool {
        matches!(self, EntityTagMatcher::Asterisk)
    }
}

impl std::fmt::Display for EntityTagMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityTagMatcher::Asterisk => f.write_str(ASTERISK),
            EntityTagMatcher::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for EntityTagMatcher {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ASTERISK {
            Ok(EntityTagMatcher::Asterisk)
        } else {
            s.parse().map(EntityTagMatcher::Tag)
        }
    }
}

/// A non-empty, comma-separated list of entity tag matchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTagMatchers(Vec<EntityTagMatcher>);

impl EntityTagMatchers {
    pub fn new(matchers: Vec<EntityTagMatcher>) -> Result<Self, ParseError> {
        if matchers.is_empty() {
            return Err(ParseError::InvalidEntityTagMatchers(String::new()));
        }
        Ok(Self(matchers))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityTagMatcher> {
        self.0.iter()
    }

    pub fn contains_asterisk(&self) -> bool {
        self.0.iter().any(EntityTagMatcher::is_asterisk)
    }

    pub fn any_strong_match(&self, tag: &EntityTag) -> bool {
        self.0.iter().any(|m| m.strong_match(tag))
    }

    pub fn any_weak_match(&self, tag: &EntityTag) -> bool {
        self.0.iter().any(|m| m.weak_match(tag))
    }
}

impl std::fmt::Display for EntityTagMatchers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, matcher) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{matcher}")?;
        }
        Ok(())
    }
}

impl FromStr for EntityTagMatchers {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let matchers = s
            .split(',')
            .map(|part| part.trim().parse())
            .collect::<Result<Vec<EntityTagMatcher>, _>>()
            .map_err(|_| ParseError::InvalidEntityTagMatchers(s.to_string()))?;
        Self::new(matchers).map_err(|_| ParseError::InvalidEntityTagMatchers(s.to_string()))
    }
}

impl Serialize for EntityTagMatchers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityTagMatchers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
