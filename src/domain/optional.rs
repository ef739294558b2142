//! Present-or-omitted wire values.
//!
//! Discord omits fields that did not change. A field that was omitted must
//! not be confused with a field that was sent as `null` or as an empty
//! value, so optional payload fields are carried as [`Optional<T>`] and
//! merge code branches on [`Optional::is_specified`], never on the value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A payload field that may be absent from the wire.
///
/// Use it with `#[serde(default, skip_serializing_if = "Optional::is_unspecified")]`
/// so that a missing key deserializes to [`Optional::Unspecified`] and an
/// unspecified value is never written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Optional<T> {
    /// The field was not part of the payload.
    #[default]
    Unspecified,
    /// The field was present, possibly with a `null` or empty value.
    Specified(T),
}

impl<T> Optional<T> {
    /// Returns true if the field was present.
    #[must_use]
    pub const fn is_specified(&self) -> bool {
        matches!(self, Self::Specified(_))
    }

    /// Returns true if the field was omitted.
    #[must_use]
    pub const fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }

    /// Borrows the inner value.
    #[must_use]
    pub const fn as_ref(&self) -> Optional<&T> {
        match self {
            Self::Specified(value) => Optional::Specified(value),
            Self::Unspecified => Optional::Unspecified,
        }
    }

    /// Returns the value if it was specified.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Specified(value) => Some(value),
            Self::Unspecified => None,
        }
    }

    /// Maps the specified value, keeping omission.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Optional<U> {
        match self {
            Self::Specified(value) => Optional::Specified(f(value)),
            Self::Unspecified => Optional::Unspecified,
        }
    }

    /// Returns `self` if specified, otherwise `other`.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Specified(_) => self,
            Self::Unspecified => other,
        }
    }

    /// Writes the value into `slot` only if it was specified.
    pub fn assign_to(self, slot: &mut T) {
        if let Self::Specified(value) = self {
            *slot = value;
        }
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self {
        Self::Specified(value)
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Specified(value) => value.serialize(serializer),
            Self::Unspecified => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self::Specified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Payload {
        #[serde(default, skip_serializing_if = "Optional::is_unspecified")]
        nick: Optional<Option<String>>,
    }

    #[test]
    fn test_missing_field_is_unspecified() {
        let payload: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.nick, Optional::Unspecified);
    }

    #[test]
    fn test_null_field_is_specified_none() {
        let payload: Payload = serde_json::from_str(r#"{"nick":null}"#).unwrap();
        assert_eq!(payload.nick, Optional::Specified(None));
    }

    #[test]
    fn test_empty_field_is_specified_empty() {
        let payload: Payload = serde_json::from_str(r#"{"nick":""}"#).unwrap();
        assert_eq!(payload.nick, Optional::Specified(Some(String::new())));
    }

    #[test]
    fn test_unspecified_is_skipped_when_serializing() {
        let omitted = Payload {
            nick: Optional::Unspecified,
        };
        let cleared = Payload {
            nick: Optional::Specified(None),
        };

        assert_eq!(serde_json::to_string(&omitted).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&cleared).unwrap(), r#"{"nick":null}"#);
    }

    #[test]
    fn test_assign_to_respects_omission() {
        let mut value = 5;
        Optional::Unspecified.assign_to(&mut value);
        assert_eq!(value, 5);

        Optional::Specified(9).assign_to(&mut value);
        assert_eq!(value, 9);
    }

    #[test]
    fn test_or_prefers_specified() {
        assert_eq!(Optional::Specified(1).or(Optional::Specified(2)), Optional::Specified(1));
        assert_eq!(Optional::Unspecified.or(Optional::Specified(2)), Optional::Specified(2));
    }
}
