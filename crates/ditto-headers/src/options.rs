//! Enumerated header values.

use std::str::FromStr;

/// Error for a string that is none of an enum's values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown value <{value}>, expected one of {expected:?}")]
pub struct UnknownValue {
    pub value: String,
    pub expected: &'static [&'static str],
}

macro_rules! header_enum {
    (
        $(#[$doc:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All accepted header values.
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownValue {
                        value: s.to_string(),
                        expected: Self::VALUES,
                    }),
                }
            }
        }
    };
}

header_enum!(
    /// Whether a signal targets the persisted twin or the live device.
    Channel {
        Twin => "twin",
        Live => "live",
    }
);

header_enum!(
    /// What to do when a modification would not change the entity.
    IfEqual {
        Update => "update",
        Skip => "skip",
        SkipMinimizing => "skip-minimizing",
    }
);

header_enum!(
    /// Fallback when a live command times out.
    LiveChannelTimeoutStrategy {
        Fail => "fail",
        UseTwin => "use-twin",
    }
);

header_enum!(
    /// Kinds of responses a sender is prepared to receive.
    ResponseType {
        Response => "response",
        Error => "error",
        Nack => "nack",
    }
);

header_enum!(
    /// Direction of a live message relative to the thing.
    MessageDirection {
        To => "TO",
        From => "FROM",
    }
);

/// JSON schema version signals are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonSchemaVersion {
    V2,
}

impl JsonSchemaVersion {
    pub const LATEST: JsonSchemaVersion = JsonSchemaVersion::V2;

    pub fn as_int(self) -> i32 {
        match self {
            JsonSchemaVersion::V2 => 2,
        }
    }

    pub fn for_int(version: i32) -> Option<Self> {
        match version {
            2 => Some(JsonSchemaVersion::V2),
            _ => None,
        }
    }
}

impl std::fmt::Display for JsonSchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_int())
    }
}
