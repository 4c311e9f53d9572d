//! Validated primitive types shared across patientor crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was the empty string
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` and ensures it is not `""`. Whitespace-only text is accepted, and the text is
/// kept exactly as supplied (untrimmed) so records echo back what the client submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted into an owned `String`
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the input has at least one character,
    /// or `Err(TextError::Empty)` otherwise.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_text_verbatim() {
        let text = NonEmptyText::new(" Dr. X ").expect("non-empty");
        assert_eq!(text.as_str(), " Dr. X ");
    }

    #[test]
    fn rejects_only_the_empty_string() {
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));

        let blank = NonEmptyText::new("   \t").expect("whitespace is still text");
        assert_eq!(blank.as_str(), "   \t");
    }

    #[test]
    fn deserialize_rejects_non_strings() {
        assert!(serde_json::from_str::<NonEmptyText>("42").is_err());
        assert!(serde_json::from_str::<NonEmptyText>("{}").is_err());
        assert!(serde_json::from_str::<NonEmptyText>("\"\"").is_err());

        let ok: NonEmptyText = serde_json::from_str("\"Annual\"").expect("string parses");
        assert_eq!(ok.to_string(), "Annual");
    }
}
