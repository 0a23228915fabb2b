use std::{collections::BTreeMap, str::FromStr};

use crate::{
    CardioEntry, CustomExercise, DistanceUnit, ExerciseCategory, ExerciseEntry, ExerciseKey,
    ExerciseName, ExerciseRecord, NameError, OptionKey, PersistedStat, RPE, RPEError, RepCount,
    RepMode, Reps, RepsError, SessionDate, SessionDateError, SessionID, StrengthEntry, StrengthSet,
    TemplateID, Time, TimeError, Weight, WeightError, WorkoutSession,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacySet {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    /// Right side count of a unilateral set, stored as `repsRight` or `repRight` in old documents.
    pub reps_right: Option<u32>,
    pub effort: Option<f32>,
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyKind {
    Strength,
    Cardio,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyExercise {
    pub kind: Option<LegacyKind>,
    pub exercise_type: String,
    pub sets: Option<Vec<LegacySet>>,
    pub duration: Option<f64>,
    pub distance: Option<f64>,
    pub unit: Option<String>,
    pub grip: Option<String>,
    pub movement_plane: Option<String>,
}

impl LegacyExercise {
    /// Old documents sometimes lack the kind, a duration without sets marks a cardio exercise.
    #[must_use]
    pub fn is_cardio(&self) -> bool {
        self.kind == Some(LegacyKind::Cardio) || (self.duration.is_some() && self.sets.is_none())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacySession {
    pub start_time: String,
    pub end_time: String,
    pub exercises: Vec<LegacyExercise>,
}

/// All sessions of one user on one day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyWorkoutDay {
    pub date: String,
    pub sessions: Vec<LegacySession>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyCustomGroup {
    pub group: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyRecordSet {
    pub date: String,
    pub weight: f64,
    pub reps: u32,
    pub reps_right: Option<u32>,
    pub total_volume: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyExerciseData {
    pub record_set: Option<LegacyRecordSet>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyUserMeta {
    pub custom_exercises: Vec<LegacyCustomGroup>,
    pub exercise_data: BTreeMap<String, LegacyExerciseData>,
}

/// Rep mode of every exercise found in the legacy data.
///
/// An exercise is unilateral as soon as one of its sets carries a right side count. The table is
/// built for a single migration run and passed explicitly to the conversions that need it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepModeTable(BTreeMap<ExerciseKey, RepMode>);

impl RepModeTable {
    #[must_use]
    pub fn scan(days: &[LegacyWorkoutDay]) -> Self {
        let mut table = BTreeMap::new();

        for exercise in days
            .iter()
            .flat_map(|day| &day.sessions)
            .flat_map(|session| &session.exercises)
            .filter(|exercise| exercise.kind != Some(LegacyKind::Cardio))
        {
            let has_right = exercise
                .sets
                .iter()
                .flatten()
                .any(|set| set.reps_right.is_some());
            let rep_mode = table
                .entry(ExerciseKey::from(exercise.exercise_type.as_str()))
                .or_insert(RepMode::Bilateral);
            if has_right {
                *rep_mode = RepMode::DualUnilateral;
            }
        }

        Self(table)
    }

    #[must_use]
    pub fn rep_mode(&self, key: &str) -> RepMode {
        self.0.get(key).copied().unwrap_or_default()
    }
}

/// Result of converting the legacy data of one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Migration {
    pub sessions: Vec<WorkoutSession>,
    pub custom_exercises: Vec<CustomExercise>,
    pub stats: BTreeMap<ExerciseKey, PersistedStat>,
}

pub fn migrate(
    days: &[LegacyWorkoutDay],
    meta: &LegacyUserMeta,
) -> Result<Migration, MigrationError> {
    let rep_modes = RepModeTable::scan(days);

    let mut sessions = vec![];
    for day in days {
        sessions.extend(convert_workout_day(day, &rep_modes)?);
    }

    Ok(Migration {
        sessions,
        custom_exercises: convert_custom_exercises(&meta.custom_exercises)?,
        stats: meta
            .exercise_data
            .iter()
            .map(|(key, data)| Ok((ExerciseKey::from(key.as_str()), convert_exercise_data(data)?)))
            .collect::<Result<_, MigrationError>>()?,
    })
}

pub fn convert_workout_day(
    day: &LegacyWorkoutDay,
    rep_modes: &RepModeTable,
) -> Result<Vec<WorkoutSession>, MigrationError> {
    let date = SessionDate::new(&day.date)?;

    day.sessions
        .iter()
        .map(|session| {
            Ok(WorkoutSession {
                id: SessionID::nil(),
                date: date.clone(),
                start_time: session.start_time.clone(),
                end_time: session.end_time.clone(),
                exercises: session
                    .exercises
                    .iter()
                    .map(|exercise| convert_exercise(exercise, rep_modes))
                    .collect::<Result<_, MigrationError>>()?,
            })
        })
        .collect()
}

pub fn convert_exercise(
    exercise: &LegacyExercise,
    rep_modes: &RepModeTable,
) -> Result<ExerciseEntry, MigrationError> {
    let exercise_key = ExerciseKey::from(exercise.exercise_type.as_str());
    let variations = convert_modifications(exercise);

    if exercise.is_cardio() {
        return Ok(ExerciseEntry::Cardio(CardioEntry {
            exercise_key,
            duration: exercise.duration.unwrap_or_default(),
            distance: exercise.distance,
            unit: exercise
                .unit
                .as_deref()
                .and_then(|unit| DistanceUnit::from_str(unit).ok()),
            variations,
            notes: None,
        }));
    }

    let rep_mode = rep_modes.rep_mode(&exercise_key);
    let sets = exercise
        .sets
        .iter()
        .flatten()
        .map(|set| convert_set(set, rep_mode))
        .collect::<Result<Vec<_>, SetError>>()
        .map_err(|source| MigrationError::Set {
            exercise: exercise_key.clone(),
            source,
        })?;

    Ok(ExerciseEntry::Strength(StrengthEntry {
        exercise_key,
        sets,
        variations,
        notes: None,
    }))
}

/// Missing numbers become 0. A unilateral set without a right side count gets the left count.
pub fn convert_set(set: &LegacySet, rep_mode: RepMode) -> Result<StrengthSet, SetError> {
    let reps = Reps::new(set.reps.unwrap_or_default())?;

    Ok(StrengthSet {
        weight: Weight::new(set.weight.unwrap_or_default())?,
        reps: match rep_mode {
            RepMode::Bilateral => RepCount::Bilateral(reps),
            RepMode::DualUnilateral => RepCount::Split {
                left: reps,
                right: set.reps_right.map(Reps::new).transpose()?.unwrap_or(reps),
            },
        },
        effort: set.effort.map(RPE::new).transpose()?,
        duration: set.duration.map(Time::new).transpose()?,
    })
}

/// Map the legacy grip and movement plane onto the current variation templates.
#[must_use]
pub fn convert_modifications(exercise: &LegacyExercise) -> BTreeMap<TemplateID, OptionKey> {
    let mut variations = BTreeMap::new();

    if let Some(grip) = exercise.grip.as_deref().filter(|grip| !grip.is_empty()) {
        let grip = if grip == "rotatedNeutral" {
            "neutral"
        } else {
            grip
        };
        variations.insert(TemplateID::from("grip"), OptionKey::from(grip));
    }

    let plane = match exercise.movement_plane.as_deref() {
        Some("normal") => Some("flat"),
        Some("inclined") => Some("incline"),
        Some("declined") => Some("decline"),
        _ => None,
    };
    if let Some(plane) = plane {
        variations.insert(TemplateID::from("plane"), OptionKey::from(plane));
    }

    variations
}

/// Key under which the legacy store kept the stats of an exercise and its modifications.
#[must_use]
pub fn legacy_stats_key(exercise: &LegacyExercise) -> ExerciseKey {
    let mut key = exercise.exercise_type.clone();
    for modification in [&exercise.grip, &exercise.movement_plane]
        .into_iter()
        .flatten()
        .filter(|m| !m.is_empty() && *m != "normal")
    {
        key.push('_');
        key.push_str(modification);
    }
    key.into()
}

pub fn convert_custom_exercises(
    groups: &[LegacyCustomGroup],
) -> Result<Vec<CustomExercise>, MigrationError> {
    let mut exercises = BTreeMap::new();

    for group in groups {
        let category = ExerciseCategory::from_str(&group.group).unwrap_or_default();
        for item in &group.items {
            exercises.insert(
                item.clone(),
                CustomExercise {
                    key: item.as_str().into(),
                    name: ExerciseName::new(item)?,
                    category,
                },
            );
        }
    }

    Ok(exercises.into_values().collect())
}

pub fn convert_exercise_data(data: &LegacyExerciseData) -> Result<PersistedStat, MigrationError> {
    let record_set = match &data.record_set {
        Some(record) => {
            let reps = Reps::new(record.reps).map_err(SetError::from)?;
            Some(ExerciseRecord {
                date: SessionDate::new(&record.date)?,
                weight: Weight::new(record.weight).map_err(SetError::from)?,
                reps: match record.reps_right.filter(|right| *right > 0) {
                    Some(right) => RepCount::Split {
                        left: reps,
                        right: Reps::new(right).map_err(SetError::from)?,
                    },
                    None => RepCount::Bilateral(reps),
                },
                total_volume: record.total_volume,
            })
        }
        None => None,
    };

    Ok(PersistedStat {
        record_set,
        most_recent_session: None,
        notes: data.notes.clone(),
    })
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetError {
    #[error(transparent)]
    Weight(#[from] WeightError),
    #[error(transparent)]
    Reps(#[from] RepsError),
    #[error(transparent)]
    Effort(#[from] RPEError),
    #[error(transparent)]
    Time(#[from] TimeError),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MigrationError {
    #[error(transparent)]
    Date(#[from] SessionDateError),
    #[error("Invalid set of {exercise}: {source}")]
    Set {
        exercise: ExerciseKey,
        source: SetError,
    },
    #[error("Invalid record set: {0}")]
    Record(#[from] SetError),
    #[error("Invalid custom exercise: {0}")]
    Name(#[from] NameError),
}
