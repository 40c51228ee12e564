//! Newtype identifiers.
//!
//! Every piece of provenance that has an identity is a distinct newtype over a
//! non-empty `String`. This keeps a [`MessageId`] from being passed where a
//! [`MessageUrl`] is expected, and makes the "provenance is never empty"
//! invariant a property of the type rather than of each call site.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display,
// and a serde impl that rejects the empty string.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| {
                    concat!(stringify!($name), " must not be empty").to_string()
                })
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies the message a metadata block was found in.
    ///
    /// A commit SHA for pushes; the numeric GitHub id rendered in decimal for
    /// pull requests and issue comments.
    MessageId
}

string_id! {
    /// Canonical, human-facing URL of a message (commit page, pull request,
    /// or comment permalink).
    MessageUrl
}

string_id! {
    /// Name under which the extracted records are published to the host
    /// (e.g. `"metadata"`).
    OutputName
}

impl Default for OutputName {
    fn default() -> Self {
        Self("metadata".to_string())
    }
}
