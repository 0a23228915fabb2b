use std::collections::BTreeMap;

use crate::{ExerciseEntry, ExerciseKey, RepCount, SessionDate, StrengthSet, Weight, WorkoutSession};

/// Set with the highest volume ever logged for an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRecord {
    pub date: SessionDate,
    pub weight: Weight,
    pub reps: RepCount,
    pub total_volume: f64,
}

impl ExerciseRecord {
    #[must_use]
    pub fn new(date: SessionDate, set: &StrengthSet) -> Self {
        Self {
            date,
            weight: set.weight,
            reps: set.reps,
            total_volume: set.volume(),
        }
    }
}

/// All sets of the latest session in which an exercise was performed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentSession {
    pub date: SessionDate,
    pub sets: Vec<StrengthSet>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseHistory {
    pub record_set: Option<ExerciseRecord>,
    pub most_recent_session: Option<RecentSession>,
}

/// Single pass over workout sessions that keeps one record and one recent session per exercise.
///
/// Sessions may be pushed in any order. On equal volumes or equal dates the first pushed value is
/// kept, so with newest-first input the most recent session is the first occurrence.
#[derive(Debug, Default)]
pub struct Aggregator {
    histories: BTreeMap<ExerciseKey, ExerciseHistory>,
}

impl Aggregator {
    pub fn push(&mut self, session: &WorkoutSession) {
        for entry in &session.exercises {
            let ExerciseEntry::Strength(strength) = entry else {
                continue;
            };

            let history = self
                .histories
                .entry(strength.exercise_key.clone())
                .or_default();

            if history
                .most_recent_session
                .as_ref()
                .is_none_or(|recent| session.date > recent.date)
            {
                history.most_recent_session = Some(RecentSession {
                    date: session.date.clone(),
                    sets: strength.sets.clone(),
                });
            }

            for set in strength.sets.iter().filter(|set| set.is_loggable()) {
                if history
                    .record_set
                    .as_ref()
                    .is_none_or(|record| set.volume() > record.total_volume)
                {
                    history.record_set = Some(ExerciseRecord::new(session.date.clone(), set));
                }
            }
        }
    }

    #[must_use]
    pub fn finish(self) -> BTreeMap<ExerciseKey, ExerciseHistory> {
        self.histories
    }
}

/// Derive the record set and the most recent session of every strength exercise.
#[must_use]
pub fn aggregate<'a>(
    sessions: impl IntoIterator<Item = &'a WorkoutSession>,
) -> BTreeMap<ExerciseKey, ExerciseHistory> {
    let mut aggregator = Aggregator::default();
    for session in sessions {
        aggregator.push(session);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CardioEntry, Reps, StrengthEntry};

    fn set(weight: f64, reps: RepCount) -> StrengthSet {
        StrengthSet {
            weight: Weight::new(weight).unwrap(),
            reps,
            ..StrengthSet::default()
        }
    }

    fn bilateral(weight: f64, reps: u32) -> StrengthSet {
        set(weight, RepCount::Bilateral(Reps::new(reps).unwrap()))
    }

    fn split(weight: f64, left: u32, right: u32) -> StrengthSet {
        set(
            weight,
            RepCount::Split {
                left: Reps::new(left).unwrap(),
                right: Reps::new(right).unwrap(),
            },
        )
    }

    fn session(id: u128, date: &str, exercises: Vec<(&str, Vec<StrengthSet>)>) -> WorkoutSession {
        WorkoutSession {
            id: id.into(),
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

    static SESSIONS: LazyLock<Vec<WorkoutSession>> = LazyLock::new(|| {
        vec![
            session(
                3,
                "20240110",
                vec![("benchPress", vec![bilateral(100.0, 5), bilateral(90.0, 6)])],
            ),
            session(
                2,
                "20240105",
                vec![
                    ("benchPress", vec![bilateral(110.0, 5), bilateral(0.0, 12)]),
                    ("bicepCurl", vec![split(15.0, 10, 9)]),
                ],
            ),
            session(
                1,
                "20240101",
                vec![
                    ("benchPress", vec![bilateral(100.0, 3)]),
                    ("bicepCurl", vec![split(20.0, 8, 7)]),
                ],
            ),
        ]
    });

    #[test]
    fn test_aggregate() {
        assert_eq!(
            aggregate(SESSIONS.iter()),
            BTreeMap::from([
                (
                    "benchPress".into(),
                    ExerciseHistory {
                        record_set: Some(ExerciseRecord {
                            date: SessionDate::new("20240105").unwrap(),
                            weight: Weight::new(110.0).unwrap(),
                            reps: RepCount::Bilateral(Reps::new(5).unwrap()),
                            total_volume: 550.0,
                        }),
                        most_recent_session: Some(RecentSession {
                            date: SessionDate::new("20240110").unwrap(),
                            sets: vec![bilateral(100.0, 5), bilateral(90.0, 6)],
                        }),
                    }
                ),
                (
                    "bicepCurl".into(),
                    ExerciseHistory {
                        record_set: Some(ExerciseRecord {
                            date: SessionDate::new("20240101").unwrap(),
                            weight: Weight::new(20.0).unwrap(),
                            reps: RepCount::Split {
                                left: Reps::new(8).unwrap(),
                                right: Reps::new(7).unwrap(),
                            },
                            total_volume: 300.0,
                        }),
                        most_recent_session: Some(RecentSession {
                            date: SessionDate::new("20240105").unwrap(),
                            sets: vec![split(15.0, 10, 9)],
                        }),
                    }
                ),
            ])
        );
    }

    #[test]
    fn test_aggregate_order_independent() {
        assert_eq!(
            aggregate(SESSIONS.iter().rev()),
            aggregate(SESSIONS.iter())
        );
    }

    #[test]
    fn test_aggregate_ties_keep_first() {
        let sessions = [
            session(2, "20240102", vec![("legPress", vec![bilateral(100.0, 10)])]),
            session(1, "20240101", vec![("legPress", vec![bilateral(200.0, 5)])]),
        ];

        let histories = aggregate(&sessions);
        let history = &histories[&ExerciseKey::from("legPress")];
        assert_eq!(
            history.record_set.as_ref().map(|record| record.date.as_str()),
            Some("20240102")
        );

        let histories = aggregate(sessions.iter().rev());
        let history = &histories[&ExerciseKey::from("legPress")];
        assert_eq!(
            history.record_set.as_ref().map(|record| record.date.as_str()),
            Some("20240101")
        );
        assert_eq!(
            history
                .most_recent_session
                .as_ref()
                .map(|recent| recent.date.as_str()),
            Some("20240102")
        );
    }

    #[test]
    fn test_aggregate_same_date_first_wins() {
        let sessions = [
            session(2, "20240102", vec![("deadlift", vec![bilateral(140.0, 3)])]),
            session(1, "20240102", vec![("deadlift", vec![bilateral(100.0, 8)])]),
        ];

        assert_eq!(
            aggregate(&sessions)[&ExerciseKey::from("deadlift")]
                .most_recent_session
                .as_ref()
                .map(|recent| recent.sets.clone()),
            Some(vec![bilateral(140.0, 3)])
        );
    }

    #[test]
    fn test_aggregate_without_loggable_sets() {
        let sessions = [session(1, "20240102", vec![("plank", vec![bilateral(0.0, 1)])])];

        assert_eq!(
            aggregate(&sessions),
            BTreeMap::from([(
                "plank".into(),
                ExerciseHistory {
                    record_set: None,
                    most_recent_session: Some(RecentSession {
                        date: SessionDate::new("20240102").unwrap(),
                        sets: vec![bilateral(0.0, 1)],
                    }),
                }
            )])
        );
    }

    #[test]
    fn test_aggregate_ignores_cardio() {
        let mut cardio_only = session(1, "20240102", vec![]);
        cardio_only.exercises.push(ExerciseEntry::Cardio(CardioEntry {
            exercise_key: "running".into(),
            duration: 30.0,
            ..CardioEntry::default()
        }));

        assert_eq!(aggregate([&cardio_only]), BTreeMap::new());
        assert_eq!(aggregate([]), BTreeMap::new());
    }
}
