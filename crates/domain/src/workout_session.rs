use std::collections::BTreeMap;

use chrono::NaiveDate;
use derive_more::{Deref, Display};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::{
    Catalog, CompositionError, CreateError, DeleteError, ExerciseKey, OptionKey, ReadError,
    Settings, StrengthSet, TemplateID, UserID, compute_effective_targets,
};

#[allow(async_fn_in_trait)]
pub trait WorkoutSessionService {
    async fn create_session(
        &self,
        user_id: UserID,
        session: WorkoutSession,
    ) -> Result<SessionID, CreateSessionError>;
    async fn get_sessions(
        &self,
        user_id: UserID,
        range: DateRange,
    ) -> Result<Vec<WorkoutSession>, ReadError>;
    async fn delete_session(
        &self,
        user_id: UserID,
        id: SessionID,
    ) -> Result<SessionID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutSessionRepository {
    /// Store the session with all its entries and sets, or nothing at all.
    async fn create_session(
        &self,
        user_id: UserID,
        session: WorkoutSession,
    ) -> Result<SessionID, CreateError>;
    /// Sessions within the range, newest first by date and start time.
    async fn read_sessions(
        &self,
        user_id: UserID,
        range: DateRange,
    ) -> Result<Vec<WorkoutSession>, ReadError>;
    async fn delete_session(
        &self,
        user_id: UserID,
        id: SessionID,
    ) -> Result<SessionID, DeleteError>;
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionID(Uuid);

impl SessionID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for SessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for SessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

/// Calendar date in the fixed-width `YYYYMMDD` form.
///
/// The fixed width makes the lexicographic order of the text equal to the chronological order.
#[derive(Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionDate(String);

impl SessionDate {
    pub fn new(value: &str) -> Result<Self, SessionDateError> {
        if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SessionDateError::InvalidFormat(value.to_string()));
        }

        let (Ok(year), Ok(month), Ok(day)) = (
            value[0..4].parse::<i32>(),
            value[4..6].parse::<u32>(),
            value[6..8].parse::<u32>(),
        ) else {
            return Err(SessionDateError::InvalidFormat(value.to_string()));
        };

        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(SessionDateError::InvalidDate(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrengthEntry {
    pub exercise_key: ExerciseKey,
    pub sets: Vec<StrengthSet>,
    pub variations: BTreeMap<TemplateID, OptionKey>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardioEntry {
    pub exercise_key: ExerciseKey,
    /// Duration in minutes.
    pub duration: f64,
    pub distance: Option<f64>,
    pub unit: Option<DistanceUnit>,
    pub variations: BTreeMap<TemplateID, OptionKey>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseEntry {
    Strength(StrengthEntry),
    Cardio(CardioEntry),
}

impl ExerciseEntry {
    #[must_use]
    pub fn exercise_key(&self) -> &ExerciseKey {
        match self {
            ExerciseEntry::Strength(entry) => &entry.exercise_key,
            ExerciseEntry::Cardio(entry) => &entry.exercise_key,
        }
    }

    #[must_use]
    pub fn variations(&self) -> &BTreeMap<TemplateID, OptionKey> {
        match self {
            ExerciseEntry::Strength(entry) => &entry.variations,
            ExerciseEntry::Cardio(entry) => &entry.variations,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: SessionID,
    pub date: SessionDate,
    pub start_time: String,
    pub end_time: String,
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutSession {
    /// Turn a session as entered by the user into the form that is committed.
    ///
    /// Sets without load or reps are dropped, as are strength entries left without sets. Every
    /// selected variation must be supported by the catalog exercise. Exercises outside of the
    /// catalog accept no variations.
    pub fn prepare_for_submission(
        &self,
        catalog: &Catalog,
        settings: &Settings,
    ) -> Result<WorkoutSession, SubmissionError> {
        if self.start_time.trim().is_empty() || self.end_time.trim().is_empty() {
            return Err(SubmissionError::MissingTime);
        }

        let mut exercises = vec![];

        for entry in &self.exercises {
            validate_variations(catalog, entry.exercise_key(), entry.variations()).map_err(
                |source| SubmissionError::Variation {
                    exercise: entry.exercise_key().clone(),
                    source,
                },
            )?;

            match entry {
                ExerciseEntry::Strength(strength) => {
                    let sets = strength
                        .sets
                        .iter()
                        .filter(|set| set.is_loggable())
                        .copied()
                        .collect::<Vec<_>>();

                    if !sets.is_empty() {
                        exercises.push(ExerciseEntry::Strength(StrengthEntry {
                            sets,
                            notes: non_empty(strength.notes.as_deref()),
                            ..strength.clone()
                        }));
                    }
                }
                ExerciseEntry::Cardio(cardio) => {
                    if !cardio.duration.is_finite() || cardio.duration <= 0.0 {
                        return Err(SubmissionError::InvalidDuration(cardio.exercise_key.clone()));
                    }

                    if cardio
                        .distance
                        .is_some_and(|distance| !distance.is_finite() || distance < 0.0)
                    {
                        return Err(SubmissionError::InvalidDistance(cardio.exercise_key.clone()));
                    }

                    exercises.push(ExerciseEntry::Cardio(CardioEntry {
                        unit: cardio
                            .distance
                            .and(cardio.unit.or(Some(settings.default_distance_unit))),
                        notes: non_empty(cardio.notes.as_deref()),
                        ..cardio.clone()
                    }));
                }
            }
        }

        if exercises.is_empty() {
            return Err(SubmissionError::Empty);
        }

        Ok(WorkoutSession {
            id: SessionID::nil(),
            date: self.date.clone(),
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            exercises,
        })
    }
}

fn validate_variations(
    catalog: &Catalog,
    key: &ExerciseKey,
    variations: &BTreeMap<TemplateID, OptionKey>,
) -> Result<(), CompositionError> {
    if variations.is_empty() {
        return Ok(());
    }

    match catalog.exercise(key) {
        Some(exercise) => {
            compute_effective_targets(catalog.templates(), exercise, variations).map(|_| ())
        }
        None => match variations.iter().next() {
            Some((template_id, option_key)) => Err(CompositionError::UnknownVariation {
                template_id: template_id.clone(),
                option_key: option_key.clone(),
            }),
            None => Ok(()),
        },
    }
}

fn non_empty(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(str::to_string)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("Workout must contain at least one exercise with a loggable set")]
    Empty,
    #[error("Workout must have a start and end time")]
    MissingTime,
    #[error("Duration of {0} must be greater than 0")]
    InvalidDuration(ExerciseKey),
    #[error("Distance of {0} must not be negative")]
    InvalidDistance(ExerciseKey),
    #[error("Invalid variation for {exercise}: {source}")]
    Variation {
        exercise: ExerciseKey,
        source: CompositionError,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum CreateSessionError {
    #[error(transparent)]
    Invalid(#[from] SubmissionError),
    #[error(transparent)]
    Create(#[from] CreateError),
}
