use crate::{DistanceUnit, ReadError, UpdateError, UserID};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self, user_id: UserID) -> Result<Settings, ReadError>;
    async fn set_settings(
        &self,
        user_id: UserID,
        settings: Settings,
    ) -> Result<Settings, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Stored settings of the user, or the defaults if nothing was stored yet.
    async fn read_settings(&self, user_id: UserID) -> Result<Settings, ReadError>;
    async fn write_settings(
        &self,
        user_id: UserID,
        settings: Settings,
    ) -> Result<Settings, UpdateError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Number of most recent sessions scanned when deriving stats, all sessions if unset.
    pub history_limit: Option<usize>,
    pub default_distance_unit: DistanceUnit,
}

impl Settings {
    pub fn new(
        history_limit: Option<usize>,
        default_distance_unit: DistanceUnit,
    ) -> Result<Self, SettingsError> {
        if history_limit == Some(0) {
            return Err(SettingsError::EmptyHistory);
        }

        Ok(Self {
            history_limit,
            default_distance_unit,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_limit: None,
            default_distance_unit: DistanceUnit::Km,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("History limit must be at least 1")]
    EmptyHistory,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, DistanceUnit::Km, Ok(Settings::default()))]
    #[case(
        Some(50),
        DistanceUnit::Mi,
        Ok(Settings { history_limit: Some(50), default_distance_unit: DistanceUnit::Mi })
    )]
    #[case(Some(0), DistanceUnit::Km, Err(SettingsError::EmptyHistory))]
    fn test_settings_new(
        #[case] history_limit: Option<usize>,
        #[case] unit: DistanceUnit,
        #[case] expected: Result<Settings, SettingsError>,
    ) {
        assert_eq!(Settings::new(history_limit, unit), expected);
    }
}
