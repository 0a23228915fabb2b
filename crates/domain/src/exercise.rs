use std::{borrow::Borrow, collections::BTreeMap, slice::Iter};

use derive_more::{AsRef, Deref, Display};
use strum::{AsRefStr, EnumString};

use crate::{
    CreateError, ExerciseName, MuscleTargets, OptionKey, Property, ReadError, TemplateID, UserID,
};

#[allow(async_fn_in_trait)]
pub trait CustomExerciseService {
    async fn get_custom_exercises(&self, user_id: UserID)
    -> Result<Vec<CustomExercise>, ReadError>;
    async fn create_custom_exercise(
        &self,
        user_id: UserID,
        name: ExerciseName,
        category: ExerciseCategory,
    ) -> Result<CustomExercise, CreateError>;
}

#[allow(async_fn_in_trait)]
pub trait CustomExerciseRepository {
    async fn read_custom_exercises(&self, user_id: UserID)
    -> Result<Vec<CustomExercise>, ReadError>;
    async fn create_custom_exercise(
        &self,
        user_id: UserID,
        exercise: CustomExercise,
    ) -> Result<CustomExercise, CreateError>;
}

/// Stable identity of an exercise, used as the key of all history and stats rows.
#[derive(AsRef, Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExerciseKey(String);

impl From<&str> for ExerciseKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ExerciseKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[derive(AsRefStr, EnumString, Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[strum(serialize_all = "camelCase")]
pub enum ExerciseCategory {
    #[default]
    UpperBody,
    LowerBody,
    Core,
    Cardio,
}

impl Property for ExerciseCategory {
    fn iter() -> Iter<'static, ExerciseCategory> {
        static CATEGORIES: [ExerciseCategory; 4] = [
            ExerciseCategory::UpperBody,
            ExerciseCategory::LowerBody,
            ExerciseCategory::Core,
            ExerciseCategory::Cardio,
        ];
        CATEGORIES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            ExerciseCategory::UpperBody => "Upper Body",
            ExerciseCategory::LowerBody => "Lower Body",
            ExerciseCategory::Core => "Core",
            ExerciseCategory::Cardio => "Cardio",
        }
    }
}

/// Whether reps are logged as one count or per side.
#[derive(AsRefStr, EnumString, Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[strum(serialize_all = "camelCase")]
pub enum RepMode {
    #[default]
    Bilateral,
    DualUnilateral,
}

impl RepMode {
    #[must_use]
    pub fn from_unilateral(is_unilateral: bool) -> Self {
        if is_unilateral {
            RepMode::DualUnilateral
        } else {
            RepMode::Bilateral
        }
    }
}

/// Per-exercise presentation of a shared variation template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariationOverride {
    pub label_override: Option<String>,
    pub option_label_overrides: BTreeMap<OptionKey, String>,
    pub default_option: Option<OptionKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDefinition {
    pub key: ExerciseKey,
    pub name: String,
    pub category: ExerciseCategory,
    pub rep_mode: RepMode,
    pub base_targets: MuscleTargets,
    pub variation_templates: BTreeMap<TemplateID, VariationOverride>,
    /// Effective distribution per selected option, replacing the base targets.
    pub variation_effects: BTreeMap<TemplateID, BTreeMap<OptionKey, MuscleTargets>>,
}

impl ExerciseDefinition {
    #[must_use]
    pub fn supports(&self, template_id: &str) -> bool {
        self.variation_templates.contains_key(template_id)
    }

    #[must_use]
    pub fn effect(&self, template_id: &str, option_key: &str) -> Option<&MuscleTargets> {
        self.variation_effects.get(template_id)?.get(option_key)
    }

    #[must_use]
    pub fn is_unilateral(&self) -> bool {
        self.rep_mode == RepMode::DualUnilateral
    }

    #[must_use]
    pub fn is_cardio(&self) -> bool {
        self.category == ExerciseCategory::Cardio
    }

    /// Default selection derived from the declared default options.
    #[must_use]
    pub fn default_selection(&self) -> BTreeMap<TemplateID, OptionKey> {
        self.variation_templates
            .iter()
            .filter_map(|(template_id, variation)| {
                variation
                    .default_option
                    .clone()
                    .map(|option| (template_id.clone(), option))
            })
            .collect()
    }
}

/// User-defined exercise outside of the static catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomExercise {
    pub key: ExerciseKey,
    pub name: ExerciseName,
    pub category: ExerciseCategory,
}

impl CustomExercise {
    /// Derive a key from the name, e.g. "Cable Fly" becomes `custom_cableFly`.
    #[must_use]
    pub fn new(name: ExerciseName, category: ExerciseCategory) -> Self {
        let mut key = String::from("custom_");

        for (i, word) in name.as_str().split(' ').enumerate() {
            let mut chars = word.chars().filter(|c| c.is_alphanumeric());
            if let Some(first) = chars.next() {
                if i == 0 {
                    key.extend(first.to_lowercase());
                } else {
                    key.extend(first.to_uppercase());
                }
                key.extend(chars.flat_map(char::to_lowercase));
            }
        }

        Self {
            key: key.into(),
            name,
            category,
        }
    }
}
