use std::collections::BTreeMap;

use crate::{
    ExerciseDefinition, ExerciseKey, MuscleTargets, MuscleTargetsError, OptionKey, TemplateID,
    VariationTemplateRegistry,
};

/// Compute the muscle distribution of an exercise performed with the selected variation options.
///
/// Without any selected effect the base targets are returned. A single effect replaces the base
/// targets. Multiple effects are combined by adding the shift of each effect relative to the base
/// onto the base, clamping negative weights and renormalizing the result.
pub fn compute_effective_targets(
    templates: &VariationTemplateRegistry,
    exercise: &ExerciseDefinition,
    selected: &BTreeMap<TemplateID, OptionKey>,
) -> Result<MuscleTargets, CompositionError> {
    let mut effects = vec![];

    for (template_id, option_key) in selected {
        let supported = exercise.supports(template_id)
            && templates
                .template(template_id)
                .is_some_and(|template| template.has_option(option_key));

        if !supported {
            return Err(CompositionError::UnknownVariation {
                template_id: template_id.clone(),
                option_key: option_key.clone(),
            });
        }

        if let Some(effect) = exercise.effect(template_id, option_key) {
            effects.push(effect);
        }
    }

    match effects.as_slice() {
        [] => Ok(exercise.base_targets.clone()),
        [effect] => Ok((*effect).clone()),
        _ => {
            let base = &exercise.base_targets;
            let mut weights = base.to_map();

            for effect in effects {
                for target in effect.iter() {
                    *weights.entry(target.muscle).or_default() +=
                        target.weight - base.weight(target.muscle);
                }
                for target in base.iter() {
                    if !effect.contains(target.muscle) {
                        *weights.entry(target.muscle).or_default() -= target.weight;
                    }
                }
            }

            MuscleTargets::normalized(weights).map_err(CompositionError::from)
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompositionError {
    #[error("unknown exercise {0}")]
    UnknownExercise(ExerciseKey),
    #[error("unsupported variation {template_id}.{option_key}")]
    UnknownVariation {
        template_id: TemplateID,
        option_key: OptionKey,
    },
    #[error(transparent)]
    InvalidTargets(#[from] MuscleTargetsError),
}
