use std::collections::BTreeMap;

use crate::{
    Catalog, CustomExercise, ExerciseCategory, ExerciseHistory, ExerciseKey, ExerciseRecord,
    ReadError, RecentSession, UpdateError, UserID, WorkoutSession, aggregate,
};

#[allow(async_fn_in_trait)]
pub trait ExerciseStatsService {
    async fn get_exercise_stats(
        &self,
        user_id: UserID,
    ) -> Result<BTreeMap<ExerciseKey, ExerciseStats>, ReadError>;
    async fn set_exercise_notes(
        &self,
        user_id: UserID,
        key: ExerciseKey,
        notes: Option<String>,
    ) -> Result<PersistedStat, UpdateError>;
    async fn rebuild_exercise_stats(&self, user_id: UserID) -> Result<usize, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseStatRepository {
    async fn read_stats(
        &self,
        user_id: UserID,
    ) -> Result<BTreeMap<ExerciseKey, PersistedStat>, ReadError>;
    async fn read_stat(
        &self,
        user_id: UserID,
        key: &ExerciseKey,
    ) -> Result<Option<PersistedStat>, ReadError>;
    async fn upsert_stat(
        &self,
        user_id: UserID,
        key: ExerciseKey,
        stat: PersistedStat,
    ) -> Result<PersistedStat, UpdateError>;
}

/// Per-exercise row maintained incrementally whenever a session is committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedStat {
    pub record_set: Option<ExerciseRecord>,
    pub most_recent_session: Option<RecentSession>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseStats {
    pub exercise_key: ExerciseKey,
    pub display_name: String,
    pub category: ExerciseCategory,
    pub record_set: Option<ExerciseRecord>,
    pub most_recent_session: Option<RecentSession>,
    pub notes: Option<String>,
}

/// Resolves display names and categories of exercise keys.
///
/// Keys are looked up in the catalog first and in the custom exercises second. Unknown keys are
/// shown as they are and counted as upper body exercises.
pub struct ExerciseResolver<'a> {
    catalog: &'a Catalog,
    custom: BTreeMap<&'a str, &'a CustomExercise>,
}

impl<'a> ExerciseResolver<'a> {
    #[must_use]
    pub fn new(catalog: &'a Catalog, custom: &'a [CustomExercise]) -> Self {
        Self {
            catalog,
            custom: custom
                .iter()
                .map(|exercise| (exercise.key.as_str(), exercise))
                .collect(),
        }
    }

    #[must_use]
    pub fn resolve(&self, key: &str) -> (String, ExerciseCategory) {
        if let Some(exercise) = self.catalog.exercise(key) {
            return (exercise.name.clone(), exercise.category);
        }

        if let Some(exercise) = self.custom.get(key) {
            return (exercise.name.to_string(), exercise.category);
        }

        (key.to_string(), ExerciseCategory::UpperBody)
    }
}

/// Combine persisted stats with the result of a history scan.
///
/// Persisted values take precedence, the scan only fills in what is missing. Notes exist only in
/// persisted rows.
#[must_use]
pub fn merge_stats(
    resolver: &ExerciseResolver,
    persisted: &BTreeMap<ExerciseKey, PersistedStat>,
    scanned: &BTreeMap<ExerciseKey, ExerciseHistory>,
) -> BTreeMap<ExerciseKey, ExerciseStats> {
    persisted
        .keys()
        .chain(scanned.keys())
        .map(|key| {
            let stat = persisted.get(key);
            let history = scanned.get(key);
            let (display_name, category) = resolver.resolve(key);
            (
                key.clone(),
                ExerciseStats {
                    exercise_key: key.clone(),
                    display_name,
                    category,
                    record_set: stat
                        .and_then(|s| s.record_set.clone())
                        .or_else(|| history.and_then(|h| h.record_set.clone())),
                    most_recent_session: stat
                        .and_then(|s| s.most_recent_session.clone())
                        .or_else(|| history.and_then(|h| h.most_recent_session.clone())),
                    notes: stat.and_then(|s| s.notes.clone()),
                },
            )
        })
        .collect()
}

/// Apply a newly committed session to the persisted stats and return the changed rows.
///
/// A record is only replaced by a strictly greater volume. The most recent session is replaced
/// unless the stored one is newer or equal.
#[must_use]
pub fn fold_session(
    persisted: &BTreeMap<ExerciseKey, PersistedStat>,
    session: &WorkoutSession,
) -> BTreeMap<ExerciseKey, PersistedStat> {
    let mut changed = BTreeMap::new();

    for (key, history) in aggregate([session]) {
        let mut stat = persisted.get(&key).cloned().unwrap_or_default();
        let mut modified = false;

        if let Some(record) = history.record_set {
            if stat
                .record_set
                .as_ref()
                .is_none_or(|current| record.total_volume > current.total_volume)
            {
                stat.record_set = Some(record);
                modified = true;
            }
        }

        if let Some(recent) = history.most_recent_session {
            if stat
                .most_recent_session
                .as_ref()
                .is_none_or(|current| recent.date >= current.date && *current != recent)
            {
                stat.most_recent_session = Some(recent);
                modified = true;
            }
        }

        if modified {
            changed.insert(key, stat);
        }
    }

    changed
}

/// Apply a whole history to the persisted stats and return the changed rows.
///
/// Sessions are applied in the given order, oldest first gives the same result as committing
/// them one by one.
#[must_use]
pub fn rebuild_stats<'a>(
    persisted: &BTreeMap<ExerciseKey, PersistedStat>,
    sessions: impl IntoIterator<Item = &'a WorkoutSession>,
) -> BTreeMap<ExerciseKey, PersistedStat> {
    let mut current = persisted.clone();
    let mut changed = BTreeMap::new();

    for session in sessions {
        for (key, stat) in fold_session(&current, session) {
            current.insert(key.clone(), stat.clone());
            changed.insert(key, stat);
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ExerciseEntry, ExerciseName, RepCount, Reps, SessionDate, SessionID, StrengthEntry,
        StrengthSet, Weight,
    };

    fn set(weight: f64, reps: u32) -> StrengthSet {
        StrengthSet {
            weight: Weight::new(weight).unwrap(),
            reps: RepCount::Bilateral(Reps::new(reps).unwrap()),
            ..StrengthSet::default()
        }
    }

    fn record(date: &str, weight: f64, reps: u32) -> ExerciseRecord {
        ExerciseRecord::new(SessionDate::new(date).unwrap(), &set(weight, reps))
    }

    fn recent(date: &str, sets: Vec<StrengthSet>) -> RecentSession {
        RecentSession {
            date: SessionDate::new(date).unwrap(),
            sets,
        }
    }

    fn session(date: &str, exercises: Vec<(&str, Vec<StrengthSet>)>) -> WorkoutSession {
        WorkoutSession {
            id: SessionID::nil(),
            date: SessionDate::new(date).unwrap(),
            start_time: "07:00".to_string(),
            end_time: "08:00".to_string(),
            exercises: exercises
                .into_iter()
                .map(|(key, sets)| {
                    ExerciseEntry::Strength(StrengthEntry {
                        exercise_key: key.into(),
                        sets,
                        ..StrengthEntry::default()
                    })
                })
                .collect(),
        }
    }

    fn custom() -> Vec<CustomExercise> {
        vec![CustomExercise::new(
            ExerciseName::new("Cable Fly").unwrap(),
            ExerciseCategory::UpperBody,
        )]
    }

    #[test]
    fn test_exercise_resolver() {
        let custom = vec![CustomExercise {
            key: "custom_sledPush".into(),
            name: ExerciseName::new("Sled Push").unwrap(),
            category: ExerciseCategory::LowerBody,
        }];
        let resolver = ExerciseResolver::new(Catalog::builtin().unwrap(), &custom);

        assert_eq!(
            resolver.resolve("backSquat"),
            ("Back Squat".to_string(), ExerciseCategory::LowerBody)
        );
        assert_eq!(
            resolver.resolve("custom_sledPush"),
            ("Sled Push".to_string(), ExerciseCategory::LowerBody)
        );
        assert_eq!(
            resolver.resolve("benchPress_inclined"),
            ("benchPress_inclined".to_string(), ExerciseCategory::UpperBody)
        );
    }

    #[test]
    fn test_merge_stats() {
        let custom = custom();
        let resolver = ExerciseResolver::new(Catalog::builtin().unwrap(), &custom);
        let persisted = BTreeMap::from([
            (
                "benchPress".into(),
                PersistedStat {
                    record_set: Some(record("20231201", 100.0, 5)),
                    most_recent_session: None,
                    notes: Some("Pause on chest".to_string()),
                },
            ),
            (
                "custom_cableFly".into(),
                PersistedStat {
                    notes: Some("Low to high".to_string()),
                    ..PersistedStat::default()
                },
            ),
        ]);
        let scanned = BTreeMap::from([
            (
                "benchPress".into(),
                ExerciseHistory {
                    record_set: Some(record("20240105", 110.0, 5)),
                    most_recent_session: Some(recent("20240110", vec![set(100.0, 5)])),
                },
            ),
            (
                "deadlift".into(),
                ExerciseHistory {
                    record_set: Some(record("20240103", 180.0, 3)),
                    most_recent_session: Some(recent("20240103", vec![set(180.0, 3)])),
                },
            ),
        ]);

        let merged = merge_stats(&resolver, &persisted, &scanned);

        assert_eq!(
            merged,
            BTreeMap::from([
                (
                    "benchPress".into(),
                    ExerciseStats {
                        exercise_key: "benchPress".into(),
                        display_name: "Bench Press".to_string(),
                        category: ExerciseCategory::UpperBody,
                        record_set: Some(record("20231201", 100.0, 5)),
                        most_recent_session: Some(recent("20240110", vec![set(100.0, 5)])),
                        notes: Some("Pause on chest".to_string()),
                    }
                ),
                (
                    "custom_cableFly".into(),
                    ExerciseStats {
                        exercise_key: "custom_cableFly".into(),
                        display_name: "Cable Fly".to_string(),
                        category: ExerciseCategory::UpperBody,
                        record_set: None,
                        most_recent_session: None,
                        notes: Some("Low to high".to_string()),
                    }
                ),
                (
                    "deadlift".into(),
                    ExerciseStats {
                        exercise_key: "deadlift".into(),
                        display_name: "Deadlift".to_string(),
                        category: ExerciseCategory::LowerBody,
                        record_set: Some(record("20240103", 180.0, 3)),
                        most_recent_session: Some(recent("20240103", vec![set(180.0, 3)])),
                        notes: None,
                    }
                ),
            ])
        );
        assert_eq!(merge_stats(&resolver, &persisted, &scanned), merged);
    }

    #[test]
    fn test_merge_stats_empty() {
        let resolver = ExerciseResolver::new(Catalog::builtin().unwrap(), &[]);
        assert_eq!(
            merge_stats(&resolver, &BTreeMap::new(), &BTreeMap::new()),
            BTreeMap::new()
        );
    }

    #[test]
    fn test_fold_session() {
        let persisted = BTreeMap::from([
            (
                "benchPress".into(),
                PersistedStat {
                    record_set: Some(record("20231201", 100.0, 5)),
                    most_recent_session: Some(recent("20240101", vec![set(100.0, 5)])),
                    notes: Some("Pause on chest".to_string()),
                },
            ),
            (
                "backSquat".into(),
                PersistedStat {
                    record_set: Some(record("20231201", 140.0, 5)),
                    most_recent_session: Some(recent("20240201", vec![set(140.0, 5)])),
                    notes: None,
                },
            ),
        ]);

        let changed = fold_session(
            &persisted,
            &session(
                "20240110",
                vec![
                    ("benchPress", vec![set(105.0, 5), set(80.0, 8)]),
                    ("backSquat", vec![set(100.0, 5)]),
                    ("pecFly", vec![set(30.0, 12)]),
                ],
            ),
        );

        assert_eq!(
            changed,
            BTreeMap::from([
                (
                    "benchPress".into(),
                    PersistedStat {
                        record_set: Some(record("20240110", 80.0, 8)),
                        most_recent_session: Some(recent(
                            "20240110",
                            vec![set(105.0, 5), set(80.0, 8)]
                        )),
                        notes: Some("Pause on chest".to_string()),
                    }
                ),
                (
                    "pecFly".into(),
                    PersistedStat {
                        record_set: Some(record("20240110", 30.0, 12)),
                        most_recent_session: Some(recent("20240110", vec![set(30.0, 12)])),
                        notes: None,
                    }
                ),
            ])
        );
    }

    #[test]
    fn test_fold_session_never_lowers_record() {
        let persisted = BTreeMap::from([(
            "benchPress".into(),
            PersistedStat {
                record_set: Some(record("20231201", 100.0, 5)),
                most_recent_session: Some(recent("20240110", vec![set(100.0, 5)])),
                notes: None,
            },
        )]);

        let changed = fold_session(
            &persisted,
            &session("20240110", vec![("benchPress", vec![set(50.0, 10)])]),
        );

        assert_eq!(
            changed[&ExerciseKey::from("benchPress")].record_set,
            Some(record("20231201", 100.0, 5))
        );
        assert_eq!(
            changed[&ExerciseKey::from("benchPress")].most_recent_session,
            Some(recent("20240110", vec![set(50.0, 10)]))
        );
        assert_eq!(
            fold_session(
                &persisted,
                &session("20240101", vec![("benchPress", vec![set(50.0, 10)])]),
            ),
            BTreeMap::new()
        );
    }

    #[test]
    fn test_rebuild_stats() {
        let persisted = BTreeMap::from([(
            "benchPress".into(),
            PersistedStat {
                record_set: Some(record("20240101", 50.0, 5)),
                most_recent_session: Some(recent("20240101", vec![set(50.0, 5)])),
                notes: Some("Pause on chest".to_string()),
            },
        )]);
        let sessions = [
            session("20240101", vec![("benchPress", vec![set(50.0, 5)])]),
            session("20240102", vec![("benchPress", vec![set(100.0, 10)])]),
            session("20240103", vec![("benchPress", vec![set(60.0, 5)])]),
        ];

        let changed = rebuild_stats(&persisted, &sessions);

        assert_eq!(
            changed,
            BTreeMap::from([(
                "benchPress".into(),
                PersistedStat {
                    record_set: Some(record("20240102", 100.0, 10)),
                    most_recent_session: Some(recent("20240103", vec![set(60.0, 5)])),
                    notes: Some("Pause on chest".to_string()),
                }
            )])
        );

        let mut rebuilt = persisted.clone();
        rebuilt.extend(changed);
        assert_eq!(rebuild_stats(&rebuilt, &sessions), BTreeMap::new());
    }
}
