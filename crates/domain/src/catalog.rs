use std::{collections::BTreeMap, fmt, sync::LazyLock};

use log::warn;

use crate::{
    CompositionError, ExerciseCategory, ExerciseDefinition, ExerciseKey, MuscleGroup,
    MuscleTargets, MuscleTargetsError, OptionKey, RepMode, TemplateID, VariationOverride,
    VariationTemplateRegistry, compute_effective_targets,
};

static BUILTIN: LazyLock<Result<Catalog, CatalogErrors>> = LazyLock::new(|| {
    Catalog::new(
        VariationTemplateRegistry::builtin(),
        EXERCISES.iter().map(ExerciseDefinition::from).collect(),
    )
});

/// Validated, read-only set of exercise definitions and the variation templates they use.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    templates: VariationTemplateRegistry,
    exercises: BTreeMap<ExerciseKey, ExerciseDefinition>,
}

impl Catalog {
    pub fn new(
        templates: VariationTemplateRegistry,
        exercises: Vec<ExerciseDefinition>,
    ) -> Result<Self, CatalogErrors> {
        let errors = validate(&templates, &exercises);

        if !errors.is_empty() {
            return Err(CatalogErrors(errors));
        }

        Ok(Self {
            templates,
            exercises: exercises
                .into_iter()
                .map(|exercise| (exercise.key.clone(), exercise))
                .collect(),
        })
    }

    /// The catalog shipped with the application, built and validated on first access.
    pub fn builtin() -> Result<&'static Catalog, &'static CatalogErrors> {
        BUILTIN.as_ref()
    }

    #[must_use]
    pub fn templates(&self) -> &VariationTemplateRegistry {
        &self.templates
    }

    #[must_use]
    pub fn exercise(&self, key: &str) -> Option<&ExerciseDefinition> {
        self.exercises.get(key)
    }

    pub fn exercises(&self) -> impl Iterator<Item = &ExerciseDefinition> {
        self.exercises.values()
    }

    #[must_use]
    pub fn exercises_by_category(&self, category: ExerciseCategory) -> Vec<&ExerciseDefinition> {
        self.exercises()
            .filter(|exercise| exercise.category == category)
            .collect()
    }

    /// Exercises whose base distribution trains `muscle` at all.
    #[must_use]
    pub fn exercises_by_muscle(&self, muscle: MuscleGroup) -> Vec<&ExerciseDefinition> {
        self.exercises()
            .filter(|exercise| exercise.base_targets.contains(muscle))
            .collect()
    }

    pub fn effective_targets(
        &self,
        key: &str,
        selected: &BTreeMap<TemplateID, OptionKey>,
    ) -> Result<MuscleTargets, CompositionError> {
        let exercise = self
            .exercise(key)
            .ok_or_else(|| CompositionError::UnknownExercise(key.into()))?;
        compute_effective_targets(&self.templates, exercise, selected)
    }

    /// Label of a variation template as shown for the given exercise.
    #[must_use]
    pub fn variation_label(&self, key: &str, template_id: &str) -> Option<&str> {
        let variation = self.exercise(key)?.variation_templates.get(template_id)?;
        let template = self.templates.template(template_id)?;
        Some(
            variation
                .label_override
                .as_deref()
                .unwrap_or(template.label.as_str()),
        )
    }

    /// Label of a variation option as shown for the given exercise.
    #[must_use]
    pub fn option_label(&self, key: &str, template_id: &str, option_key: &str) -> Option<&str> {
        let variation = self.exercise(key)?.variation_templates.get(template_id)?;
        let option = self.templates.template(template_id)?.option(option_key)?;
        Some(
            variation
                .option_label_overrides
                .get(option_key)
                .map_or(option.label.as_str(), String::as_str),
        )
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("template {0} defined more than once")]
    DuplicateTemplate(TemplateID),
    #[error("template {0} has no options")]
    EmptyTemplate(TemplateID),
    #[error("template {template} defines option {option} more than once")]
    DuplicateOption {
        template: TemplateID,
        option: OptionKey,
    },
    #[error("exercise {0} defined more than once")]
    DuplicateExercise(ExerciseKey),
    #[error("invalid base targets of {exercise}: {source}")]
    InvalidBaseTargets {
        exercise: ExerciseKey,
        source: MuscleTargetsError,
    },
    #[error("exercise {exercise} references unknown template {template}")]
    UnknownTemplate {
        exercise: ExerciseKey,
        template: TemplateID,
    },
    #[error("exercise {exercise} declares effects for undeclared template {template}")]
    EffectWithoutTemplate {
        exercise: ExerciseKey,
        template: TemplateID,
    },
    #[error("exercise {exercise} references unknown option {template}.{option}")]
    UnknownOption {
        exercise: ExerciseKey,
        template: TemplateID,
        option: OptionKey,
    },
    #[error("invalid targets of {exercise} with {template}.{option}: {source}")]
    InvalidEffect {
        exercise: ExerciseKey,
        template: TemplateID,
        option: OptionKey,
        source: MuscleTargetsError,
    },
    #[error("failed to compose {exercise} with {template}.{option}: {source}")]
    Composition {
        exercise: ExerciseKey,
        template: TemplateID,
        option: OptionKey,
        source: CompositionError,
    },
}

/// All violations found in a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogErrors(pub Vec<CatalogError>);

impl fmt::Display for CatalogErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} catalog violation(s)", self.0.len())?;
        for error in &self.0 {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CatalogErrors {}

/// Check templates and exercises for consistency and report every violation.
#[must_use]
pub fn validate(
    templates: &VariationTemplateRegistry,
    exercises: &[ExerciseDefinition],
) -> Vec<CatalogError> {
    let mut errors = vec![];

    for (i, template) in templates.iter().enumerate() {
        if templates.iter().take(i).any(|t| t.id == template.id) {
            errors.push(CatalogError::DuplicateTemplate(template.id.clone()));
        }
        if template.options.is_empty() {
            errors.push(CatalogError::EmptyTemplate(template.id.clone()));
        }
        for (j, option) in template.options.iter().enumerate() {
            if template.options.iter().take(j).any(|o| o.key == option.key) {
                errors.push(CatalogError::DuplicateOption {
                    template: template.id.clone(),
                    option: option.key.clone(),
                });
            }
        }
    }

    for (i, exercise) in exercises.iter().enumerate() {
        if exercises.iter().take(i).any(|e| e.key == exercise.key) {
            errors.push(CatalogError::DuplicateExercise(exercise.key.clone()));
        }
        validate_exercise(templates, exercise, &mut errors);
    }

    errors
}

fn validate_exercise(
    templates: &VariationTemplateRegistry,
    exercise: &ExerciseDefinition,
    errors: &mut Vec<CatalogError>,
) {
    let unknown_option = |template: &TemplateID, option: &OptionKey| CatalogError::UnknownOption {
        exercise: exercise.key.clone(),
        template: template.clone(),
        option: option.clone(),
    };

    if let Err(source) = exercise.base_targets.validate() {
        errors.push(CatalogError::InvalidBaseTargets {
            exercise: exercise.key.clone(),
            source,
        });
    }

    for (template_id, variation) in &exercise.variation_templates {
        let Some(template) = templates.template(template_id) else {
            errors.push(CatalogError::UnknownTemplate {
                exercise: exercise.key.clone(),
                template: template_id.clone(),
            });
            continue;
        };

        for option in variation
            .option_label_overrides
            .keys()
            .chain(&variation.default_option)
        {
            if !template.has_option(option) {
                errors.push(unknown_option(template_id, option));
            }
        }
    }

    for (template_id, effects) in &exercise.variation_effects {
        if !exercise.supports(template_id) {
            errors.push(CatalogError::EffectWithoutTemplate {
                exercise: exercise.key.clone(),
                template: template_id.clone(),
            });
            continue;
        }

        let Some(template) = templates.template(template_id) else {
            continue;
        };

        for option in effects.keys() {
            if !template.has_option(option) {
                errors.push(unknown_option(template_id, option));
            }
        }

        for option in &template.options {
            if exercise.effect(template_id, &option.key).is_none() {
                continue;
            }

            let selected = BTreeMap::from([(template_id.clone(), option.key.clone())]);
            match compute_effective_targets(templates, exercise, &selected) {
                Ok(targets) => {
                    if let Err(source) = targets.validate() {
                        errors.push(CatalogError::InvalidEffect {
                            exercise: exercise.key.clone(),
                            template: template_id.clone(),
                            option: option.key.clone(),
                            source,
                        });
                    }
                }
                Err(source) => errors.push(CatalogError::Composition {
                    exercise: exercise.key.clone(),
                    template: template_id.clone(),
                    option: option.key.clone(),
                    source,
                }),
            }
        }
    }
}

impl From<&BaseExercise> for ExerciseDefinition {
    fn from(value: &BaseExercise) -> Self {
        let base_targets = MuscleTargets::from(value.targets);

        let variation_effects = value
            .variations
            .iter()
            .filter(|variation| !variation.effects.is_empty())
            .map(|variation| {
                let effects = variation
                    .effects
                    .iter()
                    .map(|(option, effect)| {
                        let targets = match effect {
                            Effect::Targets(targets) => MuscleTargets::from(*targets),
                            Effect::Shift {
                                multipliers,
                                deltas,
                            } => base_targets
                                .adjusted(multipliers, deltas)
                                .unwrap_or_else(|err| {
                                    warn!(
                                        "failed to adjust {}.{}.{}: {err}",
                                        value.key, variation.template, option
                                    );
                                    MuscleTargets::default()
                                }),
                        };
                        (OptionKey::from(*option), targets)
                    })
                    .collect::<BTreeMap<_, _>>();
                (TemplateID::from(variation.template), effects)
            })
            .collect();

        ExerciseDefinition {
            key: value.key.into(),
            name: value.name.to_string(),
            category: value.category,
            rep_mode: RepMode::from_unilateral(value.unilateral),
            base_targets,
            variation_templates: value
                .variations
                .iter()
                .map(|variation| {
                    (
                        variation.template.into(),
                        VariationOverride {
                            label_override: variation.label.map(str::to_string),
                            option_label_overrides: variation
                                .option_labels
                                .iter()
                                .map(|(option, label)| ((*option).into(), (*label).to_string()))
                                .collect(),
                            default_option: variation.default_option.map(OptionKey::from),
                        },
                    )
                })
                .collect(),
            variation_effects,
        }
    }
}

struct BaseExercise {
    key: &'static str,
    name: &'static str,
    category: ExerciseCategory,
    unilateral: bool,
    targets: &'static [(MuscleGroup, f64)],
    variations: &'static [BaseVariation],
}

struct BaseVariation {
    template: &'static str,
    label: Option<&'static str>,
    option_labels: &'static [(&'static str, &'static str)],
    default_option: Option<&'static str>,
    effects: &'static [(&'static str, Effect)],
}

impl BaseVariation {
    const fn new(template: &'static str) -> Self {
        Self {
            template,
            label: None,
            option_labels: &[],
            default_option: None,
            effects: &[],
        }
    }
}

/// Authored form of a variation effect.
enum Effect {
    /// Complete distribution replacing the base targets.
    Targets(&'static [(MuscleGroup, f64)]),
    /// Adjustment of the base targets, normalized when the catalog is built.
    Shift {
        multipliers: &'static [(MuscleGroup, f64)],
        deltas: &'static [(MuscleGroup, f64)],
    },
}

const fn deltas(deltas: &'static [(MuscleGroup, f64)]) -> Effect {
    Effect::Shift {
        multipliers: &[],
        deltas,
    }
}

const EXERCISES: [BaseExercise; 44] = [
    // Chest
    BaseExercise {
        key: "benchPress",
        name: "Bench Press",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::ChestMid, 0.58),
            (MuscleGroup::ChestUpper, 0.12),
            (MuscleGroup::ChestLower, 0.08),
            (MuscleGroup::DeltsFront, 0.12),
            (MuscleGroup::Triceps, 0.10),
        ],
        variations: &[
            BaseVariation {
                label: Some("Grip Width"),
                default_option: Some("neutral"),
                effects: &[
                    (
                        "closest",
                        deltas(&[
                            (MuscleGroup::Triceps, 0.08),
                            (MuscleGroup::ChestMid, -0.06),
                            (MuscleGroup::DeltsFront, 0.02),
                        ]),
                    ),
                    (
                        "close",
                        deltas(&[
                            (MuscleGroup::Triceps, 0.05),
                            (MuscleGroup::ChestMid, -0.04),
                            (MuscleGroup::DeltsFront, 0.01),
                        ]),
                    ),
                    (
                        "wide",
                        deltas(&[
                            (MuscleGroup::ChestMid, 0.05),
                            (MuscleGroup::Triceps, -0.04),
                            (MuscleGroup::DeltsFront, -0.01),
                        ]),
                    ),
                    (
                        "widest",
                        deltas(&[
                            (MuscleGroup::ChestMid, 0.07),
                            (MuscleGroup::Triceps, -0.06),
                            (MuscleGroup::DeltsFront, -0.01),
                        ]),
                    ),
                ],
                ..BaseVariation::new("width")
            },
            BaseVariation {
                label: Some("Bench Angle"),
                default_option: Some("flat"),
                effects: &[
                    (
                        "incline",
                        deltas(&[
                            (MuscleGroup::ChestUpper, 0.10),
                            (MuscleGroup::ChestLower, -0.07),
                            (MuscleGroup::DeltsFront, 0.03),
                        ]),
                    ),
                    (
                        "decline",
                        deltas(&[
                            (MuscleGroup::ChestLower, 0.10),
                            (MuscleGroup::ChestUpper, -0.07),
                            (MuscleGroup::DeltsFront, -0.03),
                        ]),
                    ),
                ],
                ..BaseVariation::new("plane")
            },
        ],
    },
    BaseExercise {
        key: "chestPress",
        name: "Chest Press",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::ChestMid, 0.60),
            (MuscleGroup::ChestUpper, 0.12),
            (MuscleGroup::ChestLower, 0.08),
            (MuscleGroup::DeltsFront, 0.10),
            (MuscleGroup::Triceps, 0.10),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "pecFly",
        name: "Pec Fly",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::ChestMid, 0.70),
            (MuscleGroup::ChestUpper, 0.15),
            (MuscleGroup::ChestLower, 0.15),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "pushUp",
        name: "Push Up",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::ChestMid, 0.55),
            (MuscleGroup::DeltsFront, 0.15),
            (MuscleGroup::Triceps, 0.20),
            (MuscleGroup::AbsUpper, 0.10),
        ],
        variations: &[],
    },
    // Back
    BaseExercise {
        key: "lateralPulldown",
        name: "Lateral Pulldown",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Lats, 0.62),
            (MuscleGroup::Rhomboids, 0.18),
            (MuscleGroup::TrapsLower, 0.10),
            (MuscleGroup::Biceps, 0.10),
        ],
        variations: &[BaseVariation {
            label: Some("Handle Width"),
            effects: &[
                (
                    "closest",
                    deltas(&[(MuscleGroup::Rhomboids, 0.06), (MuscleGroup::Lats, -0.06)]),
                ),
                (
                    "close",
                    deltas(&[(MuscleGroup::Rhomboids, 0.03), (MuscleGroup::Lats, -0.03)]),
                ),
                (
                    "wide",
                    deltas(&[(MuscleGroup::Lats, 0.04), (MuscleGroup::Rhomboids, -0.04)]),
                ),
                (
                    "widest",
                    deltas(&[(MuscleGroup::Lats, 0.06), (MuscleGroup::Rhomboids, -0.06)]),
                ),
            ],
            ..BaseVariation::new("width")
        }],
    },
    BaseExercise {
        key: "seatedRow",
        name: "Seated Row",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Lats, 0.45),
            (MuscleGroup::Rhomboids, 0.30),
            (MuscleGroup::TrapsMid, 0.15),
            (MuscleGroup::Biceps, 0.10),
        ],
        variations: &[BaseVariation::new("cableAttachment")],
    },
    BaseExercise {
        key: "pullUp",
        name: "Pull Up",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Lats, 0.55),
            (MuscleGroup::Biceps, 0.20),
            (MuscleGroup::Rhomboids, 0.15),
            (MuscleGroup::DeltsRear, 0.10),
        ],
        variations: &[BaseVariation {
            effects: &[
                (
                    "supinated",
                    deltas(&[(MuscleGroup::Biceps, 0.08), (MuscleGroup::Lats, -0.08)]),
                ),
                (
                    "neutral",
                    deltas(&[(MuscleGroup::Biceps, 0.04), (MuscleGroup::Lats, -0.04)]),
                ),
            ],
            ..BaseVariation::new("grip")
        }],
    },
    BaseExercise {
        key: "rearDelt",
        name: "Rear Delt",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::DeltsRear, 0.65),
            (MuscleGroup::Rhomboids, 0.20),
            (MuscleGroup::TrapsMid, 0.15),
        ],
        variations: &[],
    },
    // Shoulders
    BaseExercise {
        key: "lateralRaise",
        name: "Lateral Raise",
        category: ExerciseCategory::UpperBody,
        unilateral: true,
        targets: &[(MuscleGroup::DeltsSide, 0.80), (MuscleGroup::TrapsUpper, 0.20)],
        variations: &[BaseVariation::new("resistanceSource")],
    },
    BaseExercise {
        key: "shoulderPress",
        name: "Shoulder Press",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::DeltsFront, 0.55),
            (MuscleGroup::DeltsSide, 0.20),
            (MuscleGroup::Triceps, 0.25),
        ],
        variations: &[
            BaseVariation::new("resistanceSource"),
            BaseVariation::new("bodyPosition"),
        ],
    },
    BaseExercise {
        key: "frontRaise",
        name: "Front Raise",
        category: ExerciseCategory::UpperBody,
        unilateral: true,
        targets: &[(MuscleGroup::DeltsFront, 0.90), (MuscleGroup::DeltsSide, 0.10)],
        variations: &[],
    },
    // Arms
    BaseExercise {
        key: "bicepCurl",
        name: "Bicep Curl",
        category: ExerciseCategory::UpperBody,
        unilateral: true,
        targets: &[(MuscleGroup::Biceps, 0.80), (MuscleGroup::Forearms, 0.20)],
        variations: &[BaseVariation {
            label: Some("Grip"),
            default_option: Some("supinated"),
            effects: &[
                (
                    "pronated",
                    Effect::Targets(&[(MuscleGroup::Biceps, 0.55), (MuscleGroup::Forearms, 0.45)]),
                ),
                (
                    "neutral",
                    Effect::Targets(&[(MuscleGroup::Biceps, 0.60), (MuscleGroup::Forearms, 0.40)]),
                ),
            ],
            ..BaseVariation::new("grip")
        }],
    },
    BaseExercise {
        key: "tricepExtension",
        name: "Tricep Extension",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[(MuscleGroup::Triceps, 1.0)],
        variations: &[BaseVariation::new("cableAttachment")],
    },
    BaseExercise {
        key: "tricepPushdown",
        name: "Tricep Pushdown",
        category: ExerciseCategory::UpperBody,
        unilateral: false,
        targets: &[(MuscleGroup::Triceps, 0.85), (MuscleGroup::Forearms, 0.15)],
        variations: &[BaseVariation::new("cableAttachment")],
    },
    BaseExercise {
        key: "hammerCurl",
        name: "Hammer Curl",
        category: ExerciseCategory::UpperBody,
        unilateral: true,
        targets: &[(MuscleGroup::Biceps, 0.60), (MuscleGroup::Forearms, 0.40)],
        variations: &[],
    },
    // Core
    BaseExercise {
        key: "abdominalCrunch",
        name: "Abdominal Crunch",
        category: ExerciseCategory::Core,
        unilateral: false,
        targets: &[(MuscleGroup::AbsUpper, 0.65), (MuscleGroup::AbsLower, 0.35)],
        variations: &[],
    },
    BaseExercise {
        key: "backExtension",
        name: "Back Extension",
        category: ExerciseCategory::Core,
        unilateral: false,
        targets: &[
            (MuscleGroup::LowerBack, 0.55),
            (MuscleGroup::Glutes, 0.25),
            (MuscleGroup::Hamstrings, 0.20),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "plank",
        name: "Plank",
        category: ExerciseCategory::Core,
        unilateral: false,
        targets: &[
            (MuscleGroup::TransverseAbs, 0.40),
            (MuscleGroup::AbsUpper, 0.25),
            (MuscleGroup::AbsLower, 0.15),
            (MuscleGroup::Obliques, 0.20),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "russianTwist",
        name: "Russian Twist",
        category: ExerciseCategory::Core,
        unilateral: false,
        targets: &[
            (MuscleGroup::Obliques, 0.55),
            (MuscleGroup::AbsUpper, 0.25),
            (MuscleGroup::AbsLower, 0.20),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "legRaise",
        name: "Leg Raise",
        category: ExerciseCategory::Core,
        unilateral: false,
        targets: &[(MuscleGroup::AbsLower, 0.60), (MuscleGroup::HipFlexors, 0.40)],
        variations: &[],
    },
    // Lower body
    BaseExercise {
        key: "backSquat",
        name: "Back Squat",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.55),
            (MuscleGroup::Glutes, 0.25),
            (MuscleGroup::Hamstrings, 0.10),
            (MuscleGroup::LowerBack, 0.10),
        ],
        variations: &[
            BaseVariation {
                label: Some("Stance Width"),
                option_labels: &[("closest", "Narrowest"), ("neutral", "Standard")],
                default_option: Some("neutral"),
                effects: &[
                    (
                        "closest",
                        deltas(&[(MuscleGroup::Quads, 0.06), (MuscleGroup::Glutes, -0.06)]),
                    ),
                    (
                        "close",
                        deltas(&[(MuscleGroup::Quads, 0.04), (MuscleGroup::Glutes, -0.04)]),
                    ),
                    (
                        "wide",
                        deltas(&[
                            (MuscleGroup::Glutes, 0.05),
                            (MuscleGroup::Adductors, 0.05),
                            (MuscleGroup::Quads, -0.10),
                        ]),
                    ),
                    (
                        "widest",
                        deltas(&[
                            (MuscleGroup::Glutes, 0.07),
                            (MuscleGroup::Adductors, 0.08),
                            (MuscleGroup::Quads, -0.15),
                        ]),
                    ),
                ],
                ..BaseVariation::new("width")
            },
            BaseVariation::new("barType"),
            BaseVariation::new("heelElevation"),
        ],
    },
    BaseExercise {
        key: "frontSquat",
        name: "Front Squat",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.65),
            (MuscleGroup::Glutes, 0.18),
            (MuscleGroup::AbsUpper, 0.10),
            (MuscleGroup::LowerBack, 0.07),
        ],
        variations: &[BaseVariation::new("heelElevation")],
    },
    BaseExercise {
        key: "deadlift",
        name: "Deadlift",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Hamstrings, 0.30),
            (MuscleGroup::Glutes, 0.30),
            (MuscleGroup::LowerBack, 0.25),
            (MuscleGroup::Lats, 0.10),
            (MuscleGroup::TrapsUpper, 0.05),
        ],
        variations: &[
            BaseVariation::new("barType"),
            BaseVariation::new("gripTechnique"),
            BaseVariation::new("gripAssistance"),
        ],
    },
    BaseExercise {
        key: "romanianDeadlift",
        name: "Romanian Deadlift",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Hamstrings, 0.45),
            (MuscleGroup::Glutes, 0.30),
            (MuscleGroup::LowerBack, 0.25),
        ],
        variations: &[BaseVariation::new("gripAssistance")],
    },
    BaseExercise {
        key: "legPress",
        name: "Leg Press",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.60),
            (MuscleGroup::Glutes, 0.25),
            (MuscleGroup::Hamstrings, 0.15),
        ],
        variations: &[BaseVariation {
            effects: &[
                (
                    "low",
                    deltas(&[(MuscleGroup::Quads, 0.10), (MuscleGroup::Glutes, -0.10)]),
                ),
                (
                    "high",
                    deltas(&[
                        (MuscleGroup::Glutes, 0.10),
                        (MuscleGroup::Hamstrings, 0.05),
                        (MuscleGroup::Quads, -0.15),
                    ]),
                ),
            ],
            ..BaseVariation::new("footVerticalPosition")
        }],
    },
    BaseExercise {
        key: "legExtension",
        name: "Leg Extension",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[(MuscleGroup::Quads, 1.0)],
        variations: &[],
    },
    BaseExercise {
        key: "legCurl",
        name: "Leg Curl",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[(MuscleGroup::Hamstrings, 1.0)],
        variations: &[BaseVariation::new("bodyPosition")],
    },
    BaseExercise {
        key: "hipThrust",
        name: "Hip Thrust",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[(MuscleGroup::Glutes, 0.80), (MuscleGroup::Hamstrings, 0.20)],
        variations: &[BaseVariation::new("pause")],
    },
    BaseExercise {
        key: "lunge",
        name: "Lunge",
        category: ExerciseCategory::LowerBody,
        unilateral: true,
        targets: &[
            (MuscleGroup::Quads, 0.45),
            (MuscleGroup::Glutes, 0.35),
            (MuscleGroup::Hamstrings, 0.20),
        ],
        variations: &[BaseVariation::new("unilateralMode")],
    },
    BaseExercise {
        key: "lateralLunge",
        name: "Lateral Lunge",
        category: ExerciseCategory::LowerBody,
        unilateral: true,
        targets: &[
            (MuscleGroup::Adductors, 0.45),
            (MuscleGroup::Quads, 0.35),
            (MuscleGroup::Glutes, 0.20),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "bulgarianSplitSquat",
        name: "Bulgarian Split Squat",
        category: ExerciseCategory::LowerBody,
        unilateral: true,
        targets: &[
            (MuscleGroup::Quads, 0.45),
            (MuscleGroup::Glutes, 0.35),
            (MuscleGroup::Hamstrings, 0.20),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "calfRaise",
        name: "Calf Raise",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[(MuscleGroup::Calves, 1.0)],
        variations: &[
            BaseVariation::new("kneeAngle"),
            BaseVariation::new("footAngle"),
        ],
    },
    BaseExercise {
        key: "kettlebellSwing",
        name: "Kettlebell Swing",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[
            (MuscleGroup::Glutes, 0.45),
            (MuscleGroup::Hamstrings, 0.25),
            (MuscleGroup::LowerBack, 0.20),
            (MuscleGroup::DeltsFront, 0.10),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "hipAbduction",
        name: "Hip Abduction",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[(MuscleGroup::Abductors, 1.0)],
        variations: &[],
    },
    BaseExercise {
        key: "hipAdduction",
        name: "Hip Adduction",
        category: ExerciseCategory::LowerBody,
        unilateral: false,
        targets: &[(MuscleGroup::Adductors, 1.0)],
        variations: &[],
    },
    // Cardio
    BaseExercise {
        key: "running",
        name: "Running",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.40),
            (MuscleGroup::Hamstrings, 0.20),
            (MuscleGroup::Calves, 0.20),
            (MuscleGroup::Glutes, 0.20),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "cycling",
        name: "Cycling",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.55),
            (MuscleGroup::Hamstrings, 0.25),
            (MuscleGroup::Calves, 0.20),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "swimming",
        name: "Swimming",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Lats, 0.55),
            (MuscleGroup::DeltsFront, 0.25),
            (MuscleGroup::DeltsSide, 0.20),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "rowing",
        name: "Rowing",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Lats, 0.35),
            (MuscleGroup::Quads, 0.35),
            (MuscleGroup::LowerBack, 0.15),
            (MuscleGroup::Biceps, 0.15),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "elliptical",
        name: "Elliptical",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.45),
            (MuscleGroup::Glutes, 0.30),
            (MuscleGroup::Hamstrings, 0.25),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "stairClimber",
        name: "Stair Climber",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.35),
            (MuscleGroup::Glutes, 0.40),
            (MuscleGroup::Calves, 0.25),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "jumpRope",
        name: "Jump Rope",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Calves, 0.55),
            (MuscleGroup::Quads, 0.35),
            (MuscleGroup::DeltsSide, 0.10),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "walking",
        name: "Walking",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.45),
            (MuscleGroup::Hamstrings, 0.20),
            (MuscleGroup::Calves, 0.20),
            (MuscleGroup::Glutes, 0.15),
        ],
        variations: &[],
    },
    BaseExercise {
        key: "hiking",
        name: "Hiking",
        category: ExerciseCategory::Cardio,
        unilateral: false,
        targets: &[
            (MuscleGroup::Quads, 0.35),
            (MuscleGroup::Glutes, 0.30),
            (MuscleGroup::Hamstrings, 0.15),
            (MuscleGroup::Calves, 0.20),
        ],
        variations: &[],
    },
];
