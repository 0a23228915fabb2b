use std::{collections::BTreeMap, str::FromStr};

use apexion_domain as domain;
use log::warn;
use uuid::Uuid;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date_str: String,
    pub start_time_str: String,
    pub end_time_str: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Strength,
    Cardio,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub order: usize,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    pub exercise_key: String,
    pub duration_minutes: Option<f64>,
    pub distance: Option<f64>,
    pub distance_unit: Option<String>,
    pub notes: Option<String>,
}

/// Columns of a strength set.
///
/// Exactly one of the bilateral count or the pair of side counts is expected. Old rows may lack
/// numbers or carry both, so decoding treats missing numbers as 0 and prefers the bilateral count.
#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
pub struct SetValues {
    pub weight: Option<f64>,
    pub effort: Option<f32>,
    pub duration_seconds: Option<u32>,
    pub reps_bilateral: Option<u32>,
    pub reps_left: Option<u32>,
    pub reps_right: Option<u32>,
}

impl From<&domain::StrengthSet> for SetValues {
    fn from(value: &domain::StrengthSet) -> Self {
        let (reps_bilateral, reps_left, reps_right) = match value.reps {
            domain::RepCount::Bilateral(reps) => (Some(u32::from(reps)), None, None),
            domain::RepCount::Split { left, right } => {
                (None, Some(u32::from(left)), Some(u32::from(right)))
            }
        };
        Self {
            weight: Some(f64::from(value.weight)),
            effort: value.effort.map(f32::from),
            duration_seconds: value.duration.map(u32::from),
            reps_bilateral,
            reps_left,
            reps_right,
        }
    }
}

impl TryFrom<&SetValues> for domain::StrengthSet {
    type Error = RowError;

    fn try_from(value: &SetValues) -> Result<Self, Self::Error> {
        Ok(Self {
            weight: domain::Weight::new(value.weight.unwrap_or_default())?,
            reps: rep_count(value.reps_bilateral, value.reps_left, value.reps_right)?,
            effort: value.effort.map(domain::RPE::new).transpose()?,
            duration: value.duration_seconds.map(domain::Time::new).transpose()?,
        })
    }
}

fn rep_count(
    bilateral: Option<u32>,
    left: Option<u32>,
    right: Option<u32>,
) -> Result<domain::RepCount, RowError> {
    Ok(match (bilateral, left, right) {
        (Some(reps), _, _) => domain::RepCount::Bilateral(domain::Reps::new(reps)?),
        (None, None, None) => domain::RepCount::Bilateral(domain::Reps::ZERO),
        (None, left, right) => domain::RepCount::Split {
            left: domain::Reps::new(left.unwrap_or_default())?,
            right: domain::Reps::new(right.unwrap_or_default())?,
        },
    })
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SetRow {
    pub exercise_id: Uuid,
    pub order: usize,
    #[serde(flatten)]
    pub values: SetValues,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VariationRow {
    pub exercise_id: Uuid,
    pub template_id: String,
    pub option_key: String,
}

/// All rows of one workout session, built completely before anything is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRows {
    pub session: SessionRow,
    pub exercises: Vec<ExerciseRow>,
    pub sets: Vec<SetRow>,
    pub variations: Vec<VariationRow>,
}

impl SessionRows {
    #[must_use]
    pub fn new(user_id: domain::UserID, id: Uuid, session: &domain::WorkoutSession) -> Self {
        let mut exercises = vec![];
        let mut sets = vec![];
        let mut variations = vec![];

        for (order, entry) in session.exercises.iter().enumerate() {
            let exercise_id = Uuid::new_v4();

            exercises.push(match entry {
                domain::ExerciseEntry::Strength(strength) => {
                    sets.extend(strength.sets.iter().enumerate().map(|(order, set)| SetRow {
                        exercise_id,
                        order,
                        values: SetValues::from(set),
                    }));
                    ExerciseRow {
                        id: exercise_id,
                        session_id: id,
                        order,
                        kind: ExerciseKind::Strength,
                        exercise_key: strength.exercise_key.to_string(),
                        duration_minutes: None,
                        distance: None,
                        distance_unit: None,
                        notes: strength.notes.clone(),
                    }
                }
                domain::ExerciseEntry::Cardio(cardio) => ExerciseRow {
                    id: exercise_id,
                    session_id: id,
                    order,
                    kind: ExerciseKind::Cardio,
                    exercise_key: cardio.exercise_key.to_string(),
                    duration_minutes: Some(cardio.duration),
                    distance: cardio.distance,
                    distance_unit: cardio.unit.map(|unit| unit.as_ref().to_string()),
                    notes: cardio.notes.clone(),
                },
            });

            variations.extend(entry.variations().iter().map(|(template_id, option_key)| {
                VariationRow {
                    exercise_id,
                    template_id: template_id.to_string(),
                    option_key: option_key.to_string(),
                }
            }));
        }

        Self {
            session: SessionRow {
                id,
                user_id: *user_id,
                date_str: session.date.to_string(),
                start_time_str: session.start_time.clone(),
                end_time_str: session.end_time.clone(),
            },
            exercises,
            sets,
            variations,
        }
    }
}

impl TryFrom<SessionRows> for domain::WorkoutSession {
    type Error = RowError;

    fn try_from(value: SessionRows) -> Result<Self, Self::Error> {
        let SessionRows {
            session,
            mut exercises,
            mut sets,
            variations,
        } = value;
        exercises.sort_by_key(|exercise| exercise.order);
        sets.sort_by_key(|set| set.order);

        Ok(Self {
            id: session.id.into(),
            date: domain::SessionDate::new(&session.date_str)?,
            start_time: session.start_time_str,
            end_time: session.end_time_str,
            exercises: exercises
                .into_iter()
                .map(|exercise| -> Result<domain::ExerciseEntry, RowError> {
                    let exercise_id = exercise.id;
                    let selected = variations
                        .iter()
                        .filter(|variation| variation.exercise_id == exercise_id)
                        .map(|variation| {
                            (
                                domain::TemplateID::from(variation.template_id.as_str()),
                                domain::OptionKey::from(variation.option_key.as_str()),
                            )
                        })
                        .collect::<BTreeMap<_, _>>();
                    Ok(match exercise.kind {
                        ExerciseKind::Strength => {
                            domain::ExerciseEntry::Strength(domain::StrengthEntry {
                                exercise_key: exercise.exercise_key.into(),
                                sets: sets
                                    .iter()
                                    .filter(|set| set.exercise_id == exercise_id)
                                    .filter_map(|set| {
                                        domain::StrengthSet::try_from(&set.values)
                                            .inspect_err(|err| {
                                                warn!(
                                                    "skipping set {} of exercise {exercise_id}: {err}",
                                                    set.order
                                                );
                                            })
                                            .ok()
                                    })
                                    .collect(),
                                variations: selected,
                                notes: exercise.notes,
                            })
                        }
                        ExerciseKind::Cardio => domain::ExerciseEntry::Cardio(domain::CardioEntry {
                            exercise_key: exercise.exercise_key.into(),
                            duration: exercise.duration_minutes.unwrap_or_default(),
                            distance: exercise.distance,
                            unit: exercise
                                .distance_unit
                                .map(|unit| {
                                    domain::DistanceUnit::from_str(&unit)
                                        .map_err(|_| RowError::InvalidUnit(unit))
                                })
                                .transpose()?,
                            variations: selected,
                            notes: exercise.notes,
                        }),
                    })
                })
                .collect::<Result<Vec<_>, RowError>>()?,
        })
    }
}

/// Persisted stats of one exercise of one user.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct StatRow {
    pub user_id: Uuid,
    pub exercise_key: String,
    pub pr_date_str: Option<String>,
    pub pr_weight: Option<f64>,
    pub pr_reps_bilateral: Option<u32>,
    pub pr_reps_left: Option<u32>,
    pub pr_reps_right: Option<u32>,
    pub pr_total_volume: Option<f64>,
    pub recent_date_str: Option<String>,
    #[serde(default)]
    pub recent_sets: Vec<SetValues>,
    pub notes: Option<String>,
}

impl StatRow {
    #[must_use]
    pub fn new(
        user_id: domain::UserID,
        key: &domain::ExerciseKey,
        stat: &domain::PersistedStat,
    ) -> Self {
        let record = stat.record_set.as_ref();
        let record_reps = record.map(|record| {
            SetValues::from(&domain::StrengthSet {
                reps: record.reps,
                ..domain::StrengthSet::default()
            })
        });

        Self {
            user_id: *user_id,
            exercise_key: key.to_string(),
            pr_date_str: record.map(|record| record.date.to_string()),
            pr_weight: record.map(|record| f64::from(record.weight)),
            pr_reps_bilateral: record_reps.as_ref().and_then(|reps| reps.reps_bilateral),
            pr_reps_left: record_reps.as_ref().and_then(|reps| reps.reps_left),
            pr_reps_right: record_reps.as_ref().and_then(|reps| reps.reps_right),
            pr_total_volume: record.map(|record| record.total_volume),
            recent_date_str: stat
                .most_recent_session
                .as_ref()
                .map(|recent| recent.date.to_string()),
            recent_sets: stat
                .most_recent_session
                .iter()
                .flat_map(|recent| &recent.sets)
                .map(SetValues::from)
                .collect(),
            notes: stat.notes.clone(),
        }
    }
}

impl TryFrom<&StatRow> for domain::PersistedStat {
    type Error = RowError;

    fn try_from(value: &StatRow) -> Result<Self, Self::Error> {
        let record_set = match &value.pr_date_str {
            Some(date) => {
                let weight = domain::Weight::new(value.pr_weight.unwrap_or_default())?;
                let reps = rep_count(
                    value.pr_reps_bilateral,
                    value.pr_reps_left,
                    value.pr_reps_right,
                )?;
                Some(domain::ExerciseRecord {
                    date: domain::SessionDate::new(date)?,
                    weight,
                    reps,
                    total_volume: value
                        .pr_total_volume
                        .unwrap_or_else(|| f64::from(weight) * f64::from(reps.total())),
                })
            }
            None => None,
        };

        let most_recent_session = match &value.recent_date_str {
            Some(date) => Some(domain::RecentSession {
                date: domain::SessionDate::new(date)?,
                sets: value
                    .recent_sets
                    .iter()
                    .map(domain::StrengthSet::try_from)
                    .collect::<Result<Vec<_>, RowError>>()?,
            }),
            None => None,
        };

        Ok(Self {
            record_set,
            most_recent_session,
            notes: value.notes.clone(),
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CustomExerciseRow {
    pub user_id: Uuid,
    pub key: String,
    pub name: String,
    pub category: String,
}

impl CustomExerciseRow {
    #[must_use]
    pub fn new(user_id: domain::UserID, exercise: &domain::CustomExercise) -> Self {
        Self {
            user_id: *user_id,
            key: exercise.key.to_string(),
            name: exercise.name.to_string(),
            category: exercise.category.as_ref().to_string(),
        }
    }
}

impl TryFrom<&CustomExerciseRow> for domain::CustomExercise {
    type Error = RowError;

    /// Unknown categories are read as upper body.
    fn try_from(value: &CustomExerciseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            key: value.key.as_str().into(),
            name: domain::ExerciseName::new(&value.name)?,
            category: domain::ExerciseCategory::from_str(&value.category).unwrap_or_default(),
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SettingsRow {
    pub history_limit: Option<usize>,
    pub default_distance_unit: String,
}

impl From<&domain::Settings> for SettingsRow {
    fn from(value: &domain::Settings) -> Self {
        Self {
            history_limit: value.history_limit,
            default_distance_unit: value.default_distance_unit.as_ref().to_string(),
        }
    }
}

impl TryFrom<&SettingsRow> for domain::Settings {
    type Error = RowError;

    fn try_from(value: &SettingsRow) -> Result<Self, Self::Error> {
        let unit = domain::DistanceUnit::from_str(&value.default_distance_unit)
            .map_err(|_| RowError::InvalidUnit(value.default_distance_unit.clone()))?;
        domain::Settings::new(value.history_limit, unit).map_err(RowError::from)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RowError {
    #[error(transparent)]
    InvalidDate(#[from] domain::SessionDateError),
    #[error(transparent)]
    InvalidWeight(#[from] domain::WeightError),
    #[error(transparent)]
    InvalidReps(#[from] domain::RepsError),
    #[error(transparent)]
    InvalidEffort(#[from] domain::RPEError),
    #[error(transparent)]
    InvalidTime(#[from] domain::TimeError),
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error(transparent)]
    InvalidSettings(#[from] domain::SettingsError),
    #[error("unknown distance unit: {0}")]
    InvalidUnit(String),
}
