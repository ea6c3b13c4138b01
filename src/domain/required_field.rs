/// A text field the waitlist form cannot be submitted without. Any instance is
/// guaranteed to hold at least one non-whitespace character.
///
/// # Examples
/// Use the `parse` function to build a `RequiredField` from a string.
/// Surrounding whitespace is dropped.
/// ```
/// use waitlist::domain::RequiredField;
///
/// let city = RequiredField::parse("  Paris ".to_string()).unwrap();
/// assert_eq!("Paris", city.as_ref());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredField(String);

impl RequiredField {
    /// Returns `Err` with the rejected input when `s` is empty or all whitespace.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(format!("{:?} is not a valid value for a required field.", s))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for RequiredField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
