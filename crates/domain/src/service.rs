use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Mutex,
};

use log::{debug, error, warn};

use crate::{
    Catalog, CreateError, CreateSessionError, CustomExercise, CustomExerciseRepository,
    CustomExerciseService, DateRange, DeleteError, ExerciseCategory, ExerciseKey, ExerciseName,
    ExerciseResolver, ExerciseStatRepository, ExerciseStats, ExerciseStatsService, PersistedStat,
    ReadError, SessionID, Settings, SettingsRepository, SettingsService, UpdateError, UserID,
    WorkoutSession, WorkoutSessionRepository, WorkoutSessionService, aggregate, fold_session,
    merge_stats, rebuild_stats,
};

pub struct Service<'a, R> {
    repository: R,
    catalog: &'a Catalog,
    /// Users whose persisted stats missed a committed session.
    outdated_stats: Mutex<BTreeSet<UserID>>,
}

impl<'a, R> Service<'a, R> {
    pub fn new(repository: R, catalog: &'a Catalog) -> Self {
        Self {
            repository,
            catalog,
            outdated_stats: Mutex::new(BTreeSet::new()),
        }
    }

    fn stats_outdated(&self, user_id: UserID) -> bool {
        self.outdated_stats
            .lock()
            .is_ok_and(|users| users.contains(&user_id))
    }

    fn mark_stats_outdated(&self, user_id: UserID, outdated: bool) {
        if let Ok(mut users) = self.outdated_stats.lock() {
            if outdated {
                users.insert(user_id);
            } else {
                users.remove(&user_id);
            }
        }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SettingsRepository> Service<'_, R> {
    /// Settings used for deriving data, the defaults if they cannot be read.
    async fn settings_or_default(&self, user_id: UserID) -> Settings {
        match self.get_settings(user_id).await {
            Ok(settings) => settings,
            Err(err) => {
                warn!("using default settings: {err}");
                Settings::default()
            }
        }
    }
}

impl<R: WorkoutSessionRepository + ExerciseStatRepository> Service<'_, R> {
    /// Bring the persisted stats up to date with a committed session.
    ///
    /// The session is already stored at this point, so failures do not fail the submission. The
    /// user is marked instead and the stats are rebuilt from the whole history on the next
    /// occasion.
    async fn update_stats(&self, user_id: UserID, session: &WorkoutSession) {
        let result = if self.stats_outdated(user_id) {
            self.repair_stats(user_id).await.map(|_| ())
        } else {
            self.fold_into_stats(user_id, session).await
        };

        match result {
            Ok(()) => self.mark_stats_outdated(user_id, false),
            Err(err) => {
                warn!("exercise stats of user {user_id} are outdated: {err}");
                self.mark_stats_outdated(user_id, true);
            }
        }
    }

    async fn fold_into_stats(
        &self,
        user_id: UserID,
        session: &WorkoutSession,
    ) -> Result<(), UpdateError> {
        let persisted = log_on_error!(
            self.repository.read_stats(user_id),
            ReadError,
            "get",
            "exercise stats"
        )?;

        for (key, stat) in fold_session(&persisted, session) {
            log_on_error!(
                self.repository.upsert_stat(user_id, key, stat),
                UpdateError,
                "update",
                "exercise stat"
            )?;
        }

        Ok(())
    }

    /// Apply the complete history to the persisted stats and return the number of changed rows.
    async fn repair_stats(&self, user_id: UserID) -> Result<usize, UpdateError> {
        let sessions = log_on_error!(
            self.repository.read_sessions(user_id, DateRange::all()),
            ReadError,
            "get",
            "workout sessions"
        )?;
        let persisted = log_on_error!(
            self.repository.read_stats(user_id),
            ReadError,
            "get",
            "exercise stats"
        )?;
        let changed = rebuild_stats(&persisted, sessions.iter().rev());
        let count = changed.len();

        for (key, stat) in changed {
            log_on_error!(
                self.repository.upsert_stat(user_id, key, stat),
                UpdateError,
                "update",
                "exercise stat"
            )?;
        }

        Ok(count)
    }
}

impl<R> WorkoutSessionService for Service<'_, R>
where
    R: WorkoutSessionRepository + ExerciseStatRepository + SettingsRepository,
{
    async fn create_session(
        &self,
        user_id: UserID,
        session: WorkoutSession,
    ) -> Result<SessionID, CreateSessionError> {
        let settings = self.settings_or_default(user_id).await;
        let prepared = session
            .prepare_for_submission(self.catalog, &settings)
            .inspect_err(|err| debug!("rejected workout session: {err}"))?;
        let id = log_on_error!(
            self.repository.create_session(user_id, prepared.clone()),
            CreateError,
            "create",
            "workout session"
        )?;
        self.update_stats(user_id, &prepared).await;
        Ok(id)
    }

    async fn get_sessions(
        &self,
        user_id: UserID,
        range: DateRange,
    ) -> Result<Vec<WorkoutSession>, ReadError> {
        log_on_error!(
            self.repository.read_sessions(user_id, range),
            ReadError,
            "get",
            "workout sessions"
        )
    }

    async fn delete_session(
        &self,
        user_id: UserID,
        id: SessionID,
    ) -> Result<SessionID, DeleteError> {
        log_on_error!(
            self.repository.delete_session(user_id, id),
            DeleteError,
            "delete",
            "workout session"
        )
    }
}

impl<R> ExerciseStatsService for Service<'_, R>
where
    R: WorkoutSessionRepository
        + ExerciseStatRepository
        + CustomExerciseRepository
        + SettingsRepository,
{
    async fn get_exercise_stats(
        &self,
        user_id: UserID,
    ) -> Result<BTreeMap<ExerciseKey, ExerciseStats>, ReadError> {
        if self.stats_outdated(user_id) {
            if let Err(err) = self.rebuild_exercise_stats(user_id).await {
                warn!("using outdated exercise stats: {err}");
            }
        }

        let settings = self.settings_or_default(user_id).await;
        let sessions = self.get_sessions(user_id, DateRange::all()).await?;
        let scanned = aggregate(
            sessions
                .iter()
                .take(settings.history_limit.unwrap_or(usize::MAX)),
        );
        let persisted = log_on_error!(
            self.repository.read_stats(user_id),
            ReadError,
            "get",
            "exercise stats"
        )?;
        let custom = self.get_custom_exercises(user_id).await?;

        Ok(merge_stats(
            &ExerciseResolver::new(self.catalog, &custom),
            &persisted,
            &scanned,
        ))
    }

    async fn set_exercise_notes(
        &self,
        user_id: UserID,
        key: ExerciseKey,
        notes: Option<String>,
    ) -> Result<PersistedStat, UpdateError> {
        let stat = log_on_error!(
            self.repository.read_stat(user_id, &key),
            ReadError,
            "get",
            "exercise stat"
        )?
        .unwrap_or_default();

        log_on_error!(
            self.repository.upsert_stat(
                user_id,
                key,
                PersistedStat {
                    notes: notes
                        .map(|notes| notes.trim().to_string())
                        .filter(|notes| !notes.is_empty()),
                    ..stat
                },
            ),
            UpdateError,
            "update",
            "exercise notes"
        )
    }

    async fn rebuild_exercise_stats(&self, user_id: UserID) -> Result<usize, UpdateError> {
        let count = self.repair_stats(user_id).await?;
        self.mark_stats_outdated(user_id, false);
        Ok(count)
    }
}

impl<R: CustomExerciseRepository> CustomExerciseService for Service<'_, R> {
    async fn get_custom_exercises(
        &self,
        user_id: UserID,
    ) -> Result<Vec<CustomExercise>, ReadError> {
        log_on_error!(
            self.repository.read_custom_exercises(user_id),
            ReadError,
            "get",
            "custom exercises"
        )
    }

    async fn create_custom_exercise(
        &self,
        user_id: UserID,
        name: ExerciseName,
        category: ExerciseCategory,
    ) -> Result<CustomExercise, CreateError> {
        let exercise = CustomExercise::new(name, category);

        if self.catalog.exercise(&exercise.key).is_some()
            || self
                .get_custom_exercises(user_id)
                .await?
                .iter()
                .any(|custom| custom.key == exercise.key)
        {
            return Err(CreateError::Conflict);
        }

        log_on_error!(
            self.repository.create_custom_exercise(user_id, exercise),
            CreateError,
            "create",
            "custom exercise"
        )
    }
}

impl<R: SettingsRepository> SettingsService for Service<'_, R> {
    async fn get_settings(&self, user_id: UserID) -> Result<Settings, ReadError> {
        log_on_error!(
            self.repository.read_settings(user_id),
            ReadError,
            "get",
            "settings"
        )
    }

    async fn set_settings(
        &self,
        user_id: UserID,
        settings: Settings,
    ) -> Result<Settings, UpdateError> {
        let settings = Settings::new(settings.history_limit, settings.default_distance_unit)
            .map_err(|err| UpdateError::Other(Box::new(err)))?;
        log_on_error!(
            self.repository.write_settings(user_id, settings),
            UpdateError,
            "update",
            "settings"
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        DistanceUnit, ExerciseEntry, ExerciseRecord, RecentSession, RepCount, Reps, SessionDate,
        StorageError, StrengthEntry, StrengthSet, SubmissionError, Weight,
    };

    #[derive(Default)]
    struct FakeRepository {
        sessions: RefCell<Vec<WorkoutSession>>,
        stats: RefCell<BTreeMap<ExerciseKey, PersistedStat>>,
        custom: RefCell<Vec<CustomExercise>>,
        settings: Cell<Option<Settings>>,
        offline: Cell<bool>,
        broken_stats: Cell<bool>,
    }

    impl FakeRepository {
        fn check_connection(&self) -> Result<(), StorageError> {
            if self.offline.get() {
                return Err(StorageError::NoConnection);
            }
            Ok(())
        }
    }

    impl WorkoutSessionRepository for FakeRepository {
        async fn create_session(
            &self,
            _: UserID,
            session: WorkoutSession,
        ) -> Result<SessionID, CreateError> {
            self.check_connection()?;
            let id = SessionID::from(self.sessions.borrow().len() as u128 + 1);
            self.sessions
                .borrow_mut()
                .push(WorkoutSession { id, ..session });
            Ok(id)
        }

        async fn read_sessions(
            &self,
            _: UserID,
            range: DateRange,
        ) -> Result<Vec<WorkoutSession>, ReadError> {
            self.check_connection()?;
            let mut sessions = self
                .sessions
                .borrow()
                .iter()
                .filter(|session| range.contains(&session.date))
                .cloned()
                .collect::<Vec<_>>();
            sessions.sort_by(|a, b| b.date.cmp(&a.date));
            Ok(sessions)
        }

        async fn delete_session(
            &self,
            _: UserID,
            id: SessionID,
        ) -> Result<SessionID, DeleteError> {
            self.check_connection()?;
            let mut sessions = self.sessions.borrow_mut();
            let len = sessions.len();
            sessions.retain(|session| session.id != id);
            if sessions.len() == len {
                return Err(DeleteError::NotFound);
            }
            Ok(id)
        }
    }

    impl ExerciseStatRepository for FakeRepository {
        async fn read_stats(
            &self,
            _: UserID,
        ) -> Result<BTreeMap<ExerciseKey, PersistedStat>, ReadError> {
            self.check_connection()?;
            Ok(self.stats.borrow().clone())
        }

        async fn read_stat(
            &self,
            _: UserID,
            key: &ExerciseKey,
        ) -> Result<Option<PersistedStat>, ReadError> {
            self.check_connection()?;
            Ok(self.stats.borrow().get(key).cloned())
        }

        async fn upsert_stat(
            &self,
            _: UserID,
            key: ExerciseKey,
            stat: PersistedStat,
        ) -> Result<PersistedStat, UpdateError> {
            self.check_connection()?;
            if self.broken_stats.get() {
                return Err(UpdateError::Other("broken".into()));
            }
            self.stats.borrow_mut().insert(key, stat.clone());
            Ok(stat)
        }
    }

    impl CustomExerciseRepository for FakeRepository {
        async fn read_custom_exercises(
            &self,
            _: UserID,
        ) -> Result<Vec<CustomExercise>, ReadError> {
            self.check_connection()?;
            Ok(self.custom.borrow().clone())
        }

        async fn create_custom_exercise(
            &self,
            _: UserID,
            exercise: CustomExercise,
        ) -> Result<CustomExercise, CreateError> {
            self.check_connection()?;
            self.custom.borrow_mut().push(exercise.clone());
            Ok(exercise)
        }
    }

    impl SettingsRepository for FakeRepository {
        async fn read_settings(&self, _: UserID) -> Result<Settings, ReadError> {
            self.check_connection()?;
            Ok(self.settings.get().unwrap_or_default())
        }

        async fn write_settings(
            &self,
            _: UserID,
            settings: Settings,
        ) -> Result<Settings, UpdateError> {
            self.check_connection()?;
            self.settings.set(Some(settings));
            Ok(settings)
        }
    }

    const USER: UserID = UserID::nil();

    fn set(weight: f64, reps: u32) -> StrengthSet {
        StrengthSet {
            weight: Weight::new(weight).unwrap(),
            reps: RepCount::Bilateral(Reps::new(reps).unwrap()),
            ..StrengthSet::default()
        }
    }

    fn session(date: &str, key: &str, sets: Vec<StrengthSet>) -> WorkoutSession {
        WorkoutSession {
            id: SessionID::nil(),
            date: SessionDate::new(date).unwrap(),
            start_time: "17:00".to_string(),
            end_time: "18:00".to_string(),
            exercises: vec![ExerciseEntry::Strength(StrengthEntry {
                exercise_key: key.into(),
                sets,
                ..StrengthEntry::default()
            })],
        }
    }

    fn service(repository: FakeRepository) -> Service<'static, FakeRepository> {
        Service::new(repository, Catalog::builtin().unwrap())
    }

    #[tokio::test]
    async fn test_create_session_updates_stats() {
        let service = service(FakeRepository::default());

        let id = service
            .create_session(
                USER,
                session("20240105", "benchPress", vec![set(100.0, 5), set(0.0, 5)]),
            )
            .await
            .unwrap();
        service
            .create_session(USER, session("20240103", "benchPress", vec![set(80.0, 5)]))
            .await
            .unwrap();

        assert_eq!(id, SessionID::from(1));
        assert_eq!(
            service.repository.sessions.borrow()[0].exercises,
            vec![ExerciseEntry::Strength(StrengthEntry {
                exercise_key: "benchPress".into(),
                sets: vec![set(100.0, 5)],
                ..StrengthEntry::default()
            })]
        );
        assert_eq!(
            *service.repository.stats.borrow(),
            BTreeMap::from([(
                "benchPress".into(),
                PersistedStat {
                    record_set: Some(ExerciseRecord::new(
                        SessionDate::new("20240105").unwrap(),
                        &set(100.0, 5)
                    )),
                    most_recent_session: Some(RecentSession {
                        date: SessionDate::new("20240105").unwrap(),
                        sets: vec![set(100.0, 5)],
                    }),
                    notes: None,
                }
            )])
        );
    }

    #[tokio::test]
    async fn test_create_session_invalid() {
        let service = service(FakeRepository::default());

        assert!(matches!(
            service
                .create_session(USER, session("20240105", "benchPress", vec![set(0.0, 5)]))
                .await,
            Err(CreateSessionError::Invalid(SubmissionError::Empty))
        ));
        assert!(service.repository.sessions.borrow().is_empty());
        assert!(service.repository.stats.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_create_session_offline() {
        let repository = FakeRepository::default();
        repository.offline.set(true);
        let service = service(repository);

        assert!(matches!(
            service
                .create_session(USER, session("20240105", "benchPress", vec![set(50.0, 5)]))
                .await,
            Err(CreateSessionError::Create(CreateError::Storage(
                StorageError::NoConnection
            )))
        ));
    }

    #[tokio::test]
    async fn test_create_session_stats_failure() {
        let repository = FakeRepository::default();
        repository.broken_stats.set(true);
        let service = service(repository);

        assert_eq!(
            service
                .create_session(USER, session("20240105", "benchPress", vec![set(50.0, 5)]))
                .await
                .unwrap(),
            SessionID::from(1)
        );
        assert_eq!(service.repository.sessions.borrow().len(), 1);
        assert!(service.repository.stats.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_create_session_repairs_outdated_stats() {
        let service = service(FakeRepository::default());
        service
            .create_session(USER, session("20240101", "benchPress", vec![set(50.0, 5)]))
            .await
            .unwrap();
        service.repository.broken_stats.set(true);
        service
            .create_session(USER, session("20240102", "benchPress", vec![set(100.0, 10)]))
            .await
            .unwrap();
        service.repository.broken_stats.set(false);
        service
            .create_session(USER, session("20240103", "benchPress", vec![set(60.0, 5)]))
            .await
            .unwrap();

        assert_eq!(
            *service.repository.stats.borrow(),
            BTreeMap::from([(
                "benchPress".into(),
                PersistedStat {
                    record_set: Some(ExerciseRecord::new(
                        SessionDate::new("20240102").unwrap(),
                        &set(100.0, 10)
                    )),
                    most_recent_session: Some(RecentSession {
                        date: SessionDate::new("20240103").unwrap(),
                        sets: vec![set(60.0, 5)],
                    }),
                    notes: None,
                }
            )])
        );
        assert_eq!(
            service.get_exercise_stats(USER).await.unwrap()[&ExerciseKey::from("benchPress")]
                .record_set
                .as_ref()
                .map(|record| record.total_volume),
            Some(1000.0)
        );
    }

    #[tokio::test]
    async fn test_get_exercise_stats_repairs_outdated_stats() {
        let service = service(FakeRepository::default());
        service
            .create_session(USER, session("20240101", "backSquat", vec![set(100.0, 5)]))
            .await
            .unwrap();
        service.repository.broken_stats.set(true);
        service
            .create_session(USER, session("20240102", "backSquat", vec![set(120.0, 5)]))
            .await
            .unwrap();
        service.repository.broken_stats.set(false);

        let stats = service.get_exercise_stats(USER).await.unwrap();
        let squat = &stats[&ExerciseKey::from("backSquat")];
        assert_eq!(
            squat.record_set.as_ref().map(|record| record.total_volume),
            Some(600.0)
        );
        assert_eq!(
            squat
                .most_recent_session
                .as_ref()
                .map(|recent| recent.date.as_str()),
            Some("20240102")
        );
        assert_eq!(service.rebuild_exercise_stats(USER).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_exercise_stats() {
        let repository = FakeRepository::default();
        repository.settings.set(Some(Settings {
            history_limit: Some(2),
            default_distance_unit: DistanceUnit::Km,
        }));
        *repository.sessions.borrow_mut() = vec![
            session("20240101", "deadlift", vec![set(200.0, 3)]),
            session("20240102", "backSquat", vec![set(100.0, 5)]),
            session("20240103", "backSquat", vec![set(90.0, 5)]),
        ];
        *repository.stats.borrow_mut() = BTreeMap::from([(
            "custom_sledPush".into(),
            PersistedStat {
                notes: Some("Turf lane".to_string()),
                ..PersistedStat::default()
            },
        )]);
        *repository.custom.borrow_mut() = vec![CustomExercise::new(
            ExerciseName::new("Sled Push").unwrap(),
            ExerciseCategory::LowerBody,
        )];
        let service = service(repository);

        let stats = service.get_exercise_stats(USER).await.unwrap();

        assert_eq!(
            stats.keys().map(|key| key.as_str()).collect::<Vec<_>>(),
            vec!["backSquat", "custom_sledPush"]
        );
        let squat = &stats[&ExerciseKey::from("backSquat")];
        assert_eq!(squat.display_name, "Back Squat");
        assert_eq!(squat.category, ExerciseCategory::LowerBody);
        assert_eq!(
            squat.record_set.as_ref().map(|record| record.total_volume),
            Some(500.0)
        );
        assert_eq!(
            squat
                .most_recent_session
                .as_ref()
                .map(|recent| recent.date.as_str()),
            Some("20240103")
        );
        let sled = &stats[&ExerciseKey::from("custom_sledPush")];
        assert_eq!(sled.display_name, "Sled Push");
        assert_eq!(sled.category, ExerciseCategory::LowerBody);
        assert_eq!(sled.notes.as_deref(), Some("Turf lane"));
    }

    #[tokio::test]
    async fn test_get_exercise_stats_offline() {
        let repository = FakeRepository::default();
        repository.offline.set(true);
        let service = service(repository);

        assert!(matches!(
            service.get_exercise_stats(USER).await,
            Err(ReadError::Storage(StorageError::NoConnection))
        ));
    }

    #[tokio::test]
    async fn test_set_exercise_notes() {
        let service = service(FakeRepository::default());
        service
            .create_session(USER, session("20240105", "pullUp", vec![set(10.0, 8)]))
            .await
            .unwrap();

        let stat = service
            .set_exercise_notes(USER, "pullUp".into(), Some(" Dead hang start ".to_string()))
            .await
            .unwrap();
        assert_eq!(stat.notes.as_deref(), Some("Dead hang start"));
        assert!(stat.record_set.is_some());

        let stat = service
            .set_exercise_notes(USER, "pullUp".into(), Some(String::new()))
            .await
            .unwrap();
        assert_eq!(stat.notes, None);
        assert!(stat.most_recent_session.is_some());
    }

    #[tokio::test]
    async fn test_create_custom_exercise() {
        let service = service(FakeRepository::default());

        let exercise = service
            .create_custom_exercise(
                USER,
                ExerciseName::new("Sled Push").unwrap(),
                ExerciseCategory::LowerBody,
            )
            .await
            .unwrap();
        assert_eq!(exercise.key, ExerciseKey::from("custom_sledPush"));

        assert!(matches!(
            service
                .create_custom_exercise(
                    USER,
                    ExerciseName::new("sled push").unwrap(),
                    ExerciseCategory::UpperBody,
                )
                .await,
            Err(CreateError::Conflict)
        ));
        assert_eq!(service.get_custom_exercises(USER).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_settings() {
        let service = service(FakeRepository::default());

        assert_eq!(service.get_settings(USER).await.unwrap(), Settings::default());
        assert!(matches!(
            service
                .set_settings(
                    USER,
                    Settings {
                        history_limit: Some(0),
                        default_distance_unit: DistanceUnit::Km,
                    }
                )
                .await,
            Err(UpdateError::Other(_))
        ));

        let settings = Settings::new(Some(20), DistanceUnit::Mi).unwrap();
        assert_eq!(service.set_settings(USER, settings).await.unwrap(), settings);
        assert_eq!(service.get_settings(USER).await.unwrap(), settings);
    }
}
