use crate::error::{ModelError, Result};

/// Wire representation accepted for identifiers. Backends report ids either
/// as strings or as bare integers; both normalize to the string form.
#[cfg(feature = "serde")]
#[doc(hidden)]
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum IdRepr {
    Text(String),
    Number(i64),
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(try_from = "IdRepr", into = "String")
        )]
        pub struct $name(String);

        impl $name {
            /// Build an id, rejecting blank values.
            pub fn new(raw: impl Into<String>) -> Result<Self> {
                let raw = raw.into();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(ModelError::InvalidId(format!(
                        "{} cannot be empty",
                        $label
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }

        #[cfg(feature = "serde")]
        impl TryFrom<IdRepr> for $name {
            type Error = ModelError;

            fn try_from(repr: IdRepr) -> Result<Self> {
                match repr {
                    IdRepr::Text(text) => Self::new(text),
                    IdRepr::Number(number) => Self::new(number.to_string()),
                }
            }
        }
    };
}

string_id!(
    /// Identifier of one duplicate/multi-version issue on the backend.
    TaskId,
    "task id"
);

string_id!(
    /// Identifier of one stored rendition of a media item.
    VersionId,
    "version id"
);

string_id!(
    /// Identifier of a media library, used for policy scope restriction.
    LibraryId,
    "library id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected() {
        assert!(TaskId::new("   ").is_err());
        assert_eq!(TaskId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn numeric_ids_deserialize_as_strings() {
        let ids: Vec<TaskId> = serde_json::from_str(r#"[7, "abc"]"#).unwrap();
        assert_eq!(ids[0].as_str(), "7");
        assert_eq!(ids[1].as_str(), "abc");
        assert_eq!(serde_json::to_string(&ids[0]).unwrap(), r#""7""#);
    }
}
