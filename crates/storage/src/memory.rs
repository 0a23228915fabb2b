use std::{
    collections::BTreeMap,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use apexion_domain as domain;
use log::{debug, warn};
use uuid::Uuid;

use crate::rows::{
    CustomExerciseRow, ExerciseRow, SessionRow, SessionRows, SetRow, SettingsRow, StatRow,
    VariationRow,
};

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
struct Tables {
    sessions: Vec<SessionRow>,
    exercises: Vec<ExerciseRow>,
    sets: Vec<SetRow>,
    variations: Vec<VariationRow>,
    stats: Vec<StatRow>,
    custom_exercises: Vec<CustomExerciseRow>,
    settings: BTreeMap<Uuid, SettingsRow>,
}

impl Tables {
    fn insert_session(&mut self, rows: SessionRows) {
        self.sessions.push(rows.session);
        self.exercises.extend(rows.exercises);
        self.sets.extend(rows.sets);
        self.variations.extend(rows.variations);
    }

    fn session_rows(&self, session: &SessionRow) -> SessionRows {
        let exercises = self
            .exercises
            .iter()
            .filter(|exercise| exercise.session_id == session.id)
            .cloned()
            .collect::<Vec<_>>();
        let belongs = |exercise_id: &Uuid| exercises.iter().any(|e| e.id == *exercise_id);

        SessionRows {
            session: session.clone(),
            sets: self
                .sets
                .iter()
                .filter(|set| belongs(&set.exercise_id))
                .cloned()
                .collect(),
            variations: self
                .variations
                .iter()
                .filter(|variation| belongs(&variation.exercise_id))
                .cloned()
                .collect(),
            exercises,
        }
    }

    fn upsert_stat(&mut self, row: StatRow) {
        match self
            .stats
            .iter_mut()
            .find(|stat| stat.user_id == row.user_id && stat.exercise_key == row.exercise_key)
        {
            Some(stat) => *stat = row,
            None => self.stats.push(row),
        }
    }
}

/// Store keeping all rows in memory.
///
/// Every write builds its rows first and inserts them within a single lock, so readers never see
/// a partially stored session.
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    connected: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: Mutex::default(),
            connected: AtomicBool::new(true),
        }
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing or regaining the connection to the backing store.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        let tables = self
            .lock()
            .map_err(|err| anyhow::anyhow!("failed to read tables: {err}"))?;
        Ok(serde_json::to_string(&*tables)?)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(Self {
            tables: Mutex::new(serde_json::from_str(json)?),
            connected: AtomicBool::new(true),
        })
    }

    /// Store the converted legacy data of a user in one step.
    ///
    /// Custom exercises and stats that already exist are replaced.
    pub fn import_legacy(
        &self,
        user_id: domain::UserID,
        migration: &domain::Migration,
    ) -> Result<usize, domain::CreateError> {
        let sessions = migration
            .sessions
            .iter()
            .map(|session| SessionRows::new(user_id, Uuid::new_v4(), session))
            .collect::<Vec<_>>();
        let custom_exercises = migration
            .custom_exercises
            .iter()
            .map(|exercise| CustomExerciseRow::new(user_id, exercise))
            .collect::<Vec<_>>();
        let stats = migration
            .stats
            .iter()
            .map(|(key, stat)| StatRow::new(user_id, key, stat))
            .collect::<Vec<_>>();

        let mut tables = self.lock()?;
        let count = sessions.len();
        for rows in sessions {
            tables.insert_session(rows);
        }
        for row in custom_exercises {
            tables
                .custom_exercises
                .retain(|exercise| !(exercise.user_id == row.user_id && exercise.key == row.key));
            tables.custom_exercises.push(row);
        }
        for row in stats {
            tables.upsert_stat(row);
        }
        debug!("imported {count} legacy workout sessions");

        Ok(count)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, domain::StorageError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(domain::StorageError::NoConnection);
        }
        self.tables
            .lock()
            .map_err(|err| domain::StorageError::Other(err.to_string().into()))
    }
}

impl domain::WorkoutSessionRepository for MemoryStore {
    async fn create_session(
        &self,
        user_id: domain::UserID,
        session: domain::WorkoutSession,
    ) -> Result<domain::SessionID, domain::CreateError> {
        let id = Uuid::new_v4();
        let rows = SessionRows::new(user_id, id, &session);
        self.lock()?.insert_session(rows);
        Ok(id.into())
    }

    async fn read_sessions(
        &self,
        user_id: domain::UserID,
        range: domain::DateRange,
    ) -> Result<Vec<domain::WorkoutSession>, domain::ReadError> {
        let rows = {
            let tables = self.lock()?;
            tables
                .sessions
                .iter()
                .filter(|session| session.user_id == *user_id)
                .map(|session| tables.session_rows(session))
                .collect::<Vec<_>>()
        };

        let mut sessions = rows
            .into_iter()
            .filter_map(|rows| {
                let id = rows.session.id;
                domain::WorkoutSession::try_from(rows)
                    .inspect_err(|err| warn!("skipping workout session {id}: {err}"))
                    .ok()
            })
            .collect::<Vec<_>>();
        sessions.retain(|session| range.contains(&session.date));
        sessions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.start_time.cmp(&a.start_time))
        });

        Ok(sessions)
    }

    async fn delete_session(
        &self,
        user_id: domain::UserID,
        id: domain::SessionID,
    ) -> Result<domain::SessionID, domain::DeleteError> {
        let mut tables = self.lock()?;

        if !tables
            .sessions
            .iter()
            .any(|session| session.id == *id && session.user_id == *user_id)
        {
            return Err(domain::DeleteError::NotFound);
        }

        let exercise_ids = tables
            .exercises
            .iter()
            .filter(|exercise| exercise.session_id == *id)
            .map(|exercise| exercise.id)
            .collect::<Vec<_>>();
        tables.sessions.retain(|session| session.id != *id);
        tables
            .exercises
            .retain(|exercise| exercise.session_id != *id);
        tables
            .sets
            .retain(|set| !exercise_ids.contains(&set.exercise_id));
        tables
            .variations
            .retain(|variation| !exercise_ids.contains(&variation.exercise_id));

        Ok(id)
    }
}

impl domain::ExerciseStatRepository for MemoryStore {
    async fn read_stats(
        &self,
        user_id: domain::UserID,
    ) -> Result<BTreeMap<domain::ExerciseKey, domain::PersistedStat>, domain::ReadError> {
        let tables = self.lock()?;
        Ok(tables
            .stats
            .iter()
            .filter(|stat| stat.user_id == *user_id)
            .filter_map(|stat| {
                domain::PersistedStat::try_from(stat)
                    .inspect_err(|err| warn!("skipping stats of {}: {err}", stat.exercise_key))
                    .ok()
                    .map(|persisted| (stat.exercise_key.as_str().into(), persisted))
            })
            .collect())
    }

    async fn read_stat(
        &self,
        user_id: domain::UserID,
        key: &domain::ExerciseKey,
    ) -> Result<Option<domain::PersistedStat>, domain::ReadError> {
        let tables = self.lock()?;
        tables
            .stats
            .iter()
            .find(|stat| stat.user_id == *user_id && stat.exercise_key == key.as_str())
            .map(domain::PersistedStat::try_from)
            .transpose()
            .map_err(|err| domain::ReadError::Other(Box::new(err)))
    }

    async fn upsert_stat(
        &self,
        user_id: domain::UserID,
        key: domain::ExerciseKey,
        stat: domain::PersistedStat,
    ) -> Result<domain::PersistedStat, domain::UpdateError> {
        let row = StatRow::new(user_id, &key, &stat);
        self.lock()?.upsert_stat(row);
        Ok(stat)
    }
}

impl domain::CustomExerciseRepository for MemoryStore {
    async fn read_custom_exercises(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::CustomExercise>, domain::ReadError> {
        let tables = self.lock()?;
        tables
            .custom_exercises
            .iter()
            .filter(|exercise| exercise.user_id == *user_id)
            .map(|exercise| {
                domain::CustomExercise::try_from(exercise)
                    .map_err(|err| domain::ReadError::Other(Box::new(err)))
            })
            .collect()
    }

    async fn create_custom_exercise(
        &self,
        user_id: domain::UserID,
        exercise: domain::CustomExercise,
    ) -> Result<domain::CustomExercise, domain::CreateError> {
        let row = CustomExerciseRow::new(user_id, &exercise);
        let mut tables = self.lock()?;

        if tables
            .custom_exercises
            .iter()
            .any(|custom| custom.user_id == row.user_id && custom.key == row.key)
        {
            return Err(domain::CreateError::Conflict);
        }

        tables.custom_exercises.push(row);
        Ok(exercise)
    }
}

impl domain::SettingsRepository for MemoryStore {
    async fn read_settings(
        &self,
        user_id: domain::UserID,
    ) -> Result<domain::Settings, domain::ReadError> {
        let tables = self.lock()?;
        match tables.settings.get(&*user_id) {
            Some(row) => domain::Settings::try_from(row)
                .map_err(|err| domain::ReadError::Other(Box::new(err))),
            None => Ok(domain::Settings::default()),
        }
    }

    async fn write_settings(
        &self,
        user_id: domain::UserID,
        settings: domain::Settings,
    ) -> Result<domain::Settings, domain::UpdateError> {
        self.lock()?
            .settings
            .insert(*user_id, SettingsRow::from(&settings));
        Ok(settings)
    }
}
