use std::collections::BTreeMap;

use apexion_domain as domain;

/// Workout document of one user and day as kept in the old document store.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GymItem {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub date: String,
    #[serde(default)]
    pub data: Vec<Session>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Strength,
    Cardio,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(rename = "type")]
    pub kind: Option<Kind>,
    pub exercise_type: String,
    pub sets: Option<Vec<Set>>,
    pub duration: Option<f64>,
    pub distance: Option<f64>,
    pub unit: Option<String>,
    pub modifications: Option<Modifications>,
}

#[derive(serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Modifications {
    pub grip: Option<String>,
    pub movement_plane: Option<String>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub reps_right: Option<u32>,
    pub rep_right: Option<u32>,
    pub effort: Option<f32>,
    pub duration: Option<u32>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserMeta {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(default)]
    pub custom_exercises: Vec<CustomGroup>,
    #[serde(default)]
    pub exercise_data: BTreeMap<String, ExerciseData>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
pub struct CustomGroup {
    pub group: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseData {
    pub record_set: Option<RecordSet>,
    pub notes: Option<String>,
}

#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    pub date: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub reps: u32,
    pub reps_right: Option<u32>,
    #[serde(default)]
    pub total_volume: f64,
}

impl From<&Set> for domain::LegacySet {
    fn from(value: &Set) -> Self {
        Self {
            weight: value.weight,
            reps: value.reps,
            reps_right: value.reps_right.or(value.rep_right),
            effort: value.effort,
            duration: value.duration,
        }
    }
}

impl From<&Exercise> for domain::LegacyExercise {
    fn from(value: &Exercise) -> Self {
        let modifications = value.modifications.clone().unwrap_or_default();
        Self {
            kind: value.kind.map(|kind| match kind {
                Kind::Strength => domain::LegacyKind::Strength,
                Kind::Cardio => domain::LegacyKind::Cardio,
            }),
            exercise_type: value.exercise_type.clone(),
            sets: value
                .sets
                .as_ref()
                .map(|sets| sets.iter().map(domain::LegacySet::from).collect()),
            duration: value.duration,
            distance: value.distance,
            unit: value.unit.clone(),
            grip: modifications.grip,
            movement_plane: modifications.movement_plane,
        }
    }
}

impl From<&GymItem> for domain::LegacyWorkoutDay {
    fn from(value: &GymItem) -> Self {
        Self {
            date: value.date.clone(),
            sessions: value
                .data
                .iter()
                .map(|session| domain::LegacySession {
                    start_time: session.start_time.clone(),
                    end_time: session.end_time.clone(),
                    exercises: session
                        .exercises
                        .iter()
                        .map(domain::LegacyExercise::from)
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<&UserMeta> for domain::LegacyUserMeta {
    fn from(value: &UserMeta) -> Self {
        Self {
            custom_exercises: value
                .custom_exercises
                .iter()
                .map(|group| domain::LegacyCustomGroup {
                    group: group.group.clone(),
                    items: group.items.clone(),
                })
                .collect(),
            exercise_data: value
                .exercise_data
                .iter()
                .map(|(key, data)| {
                    (
                        key.clone(),
                        domain::LegacyExerciseData {
                            record_set: data.record_set.as_ref().map(|record| {
                                domain::LegacyRecordSet {
                                    date: record.date.clone(),
                                    weight: record.weight,
                                    reps: record.reps,
                                    reps_right: record.reps_right,
                                    total_volume: record.total_volume,
                                }
                            }),
                            notes: data.notes.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Convert the exported documents of one user into the current model.
pub fn migrate_json(gym_items: &str, user_meta: &str) -> anyhow::Result<domain::Migration> {
    let items: Vec<GymItem> = serde_json::from_str(gym_items)?;
    let meta: UserMeta = serde_json::from_str(user_meta)?;

    if let Some(item) = items.iter().find(|item| item.user_id != meta.user_id) {
        anyhow::bail!(
            "workout of {} does not belong to user {}",
            item.date,
            meta.user_id
        );
    }

    let days = items
        .iter()
        .map(domain::LegacyWorkoutDay::from)
        .collect::<Vec<_>>();

    domain::migrate(&days, &domain::LegacyUserMeta::from(&meta)).map_err(anyhow::Error::from)
}
