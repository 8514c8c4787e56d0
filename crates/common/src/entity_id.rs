//! Namespaced entity identifiers (`namespace:name`).

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ParseError;

const MAX_ID_LEN: usize = 256;

/// Identifier of the form `namespace:name`.
///
/// The namespace is empty or dot-separated segments each starting with a
/// letter followed by letters, digits or `_`. The name is non-empty and
/// contains neither `/` nor control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    id: String,
    separator: usize,
}

impl EntityId {
    pub fn new(id: impl Into<String>) -> Result<Self, ParseError> {
        let id = id.into();
        let invalid = |reason| ParseError::InvalidEntityId {
            id: id.clone(),
            reason,
        };

        if id.len() > MAX_ID_LEN {
            return Err(invalid("longer than 256 characters"));
        }
        let separator = id.find(':').ok_or_else(|| invalid("missing ':' separator"))?;
        let (namespace, name) = (&id[..separator], &id[separator + 1..]);

        if !namespace.is_empty() && !namespace.split('.').all(is_valid_namespace_segment) {
            return Err(invalid("invalid namespace"));
        }
        if name.is_empty() {
            return Err(invalid("empty name"));
        }
        if name.chars().any(|c| c == '/' || c.is_control()) {
            return Err(invalid("name contains '/' or control characters"));
        }

        Ok(Self { id, separator })
    }

    /// Builds an id from its parts.
    pub fn of(namespace: &str, name: &str) -> Result<Self, ParseError> {
        Self::new(format!("{namespace}:{name}"))
    }

    pub fn namespace(&self) -> &str {
        &self.id[..self.separator]
    }

    pub fn name(&self) -> &str {
        &self.id[self.separator + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

fn is_valid_namespace_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

impl FromStr for EntityId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

macro_rules! typed_entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(EntityId);

        impl $name {
            pub fn new(id: impl Into<String>) -> Result<Self, ParseError> {
                EntityId::new(id).map(Self)
            }

            pub fn of(namespace: &str, name: &str) -> Result<Self, ParseError> {
                EntityId::of(namespace, name).map(Self)
            }

            pub fn namespace(&self) -> &str {
                self.0.namespace()
            }

            pub fn name(&self) -> &str {
                self.0.name()
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            pub fn as_entity_id(&self) -> &EntityId {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$name> for EntityId {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_entity_id!(
    /// Identifier of a Thing.
    ThingId
);

typed_entity_id!(
    /// Identifier of a Policy.
    PolicyId
);
