use derive_more::{AsRef, Display};

/// Display name of a user-defined exercise.
///
/// Surrounding whitespace is removed and inner runs of whitespace are collapsed into a single
/// space, so that "Cable  Fly " and "Cable Fly" are the same name.
#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseName(String);

impl ExerciseName {
    pub const MAX_LENGTH: usize = 64;

    pub fn new(name: &str) -> Result<Self, NameError> {
        if name.chars().any(char::is_control) {
            return Err(NameError::ControlCharacter);
        }

        let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");

        if normalized.is_empty() {
            return Err(NameError::Empty);
        }

        let len = normalized.chars().count();

        if len > Self::MAX_LENGTH {
            return Err(NameError::TooLong(len));
        }

        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ExerciseName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
    #[error("Name must be 64 characters or fewer ({0} > 64)")]
    TooLong(usize),
    #[error("Name must not contain control characters")]
    ControlCharacter,
}
