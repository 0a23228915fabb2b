use std::{collections::BTreeMap, slice::Iter};

use derive_more::Deref;
use strum::{AsRefStr, Display, EnumString};

/// Maximum deviation of a distribution's weight sum from 1.0.
pub const TARGET_SUM_TOLERANCE: f64 = 1e-6;

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}

#[derive(AsRefStr, Display, EnumString, Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[strum(serialize_all = "camelCase")]
pub enum MuscleGroup {
    // Chest
    ChestUpper,
    ChestMid,
    ChestLower,
    // Back
    Lats,
    TrapsUpper,
    TrapsMid,
    TrapsLower,
    Rhomboids,
    LowerBack,
    // Shoulders
    DeltsFront,
    DeltsSide,
    DeltsRear,
    // Arms
    Biceps,
    Triceps,
    Forearms,
    // Core
    AbsUpper,
    AbsLower,
    Obliques,
    TransverseAbs,
    // Legs
    Quads,
    Hamstrings,
    Glutes,
    HipFlexors,
    Adductors,
    Abductors,
    Calves,
}

impl Property for MuscleGroup {
    fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLES: [MuscleGroup; 26] = [
            MuscleGroup::ChestUpper,
            MuscleGroup::ChestMid,
            MuscleGroup::ChestLower,
            MuscleGroup::Lats,
            MuscleGroup::TrapsUpper,
            MuscleGroup::TrapsMid,
            MuscleGroup::TrapsLower,
            MuscleGroup::Rhomboids,
            MuscleGroup::LowerBack,
            MuscleGroup::DeltsFront,
            MuscleGroup::DeltsSide,
            MuscleGroup::DeltsRear,
            MuscleGroup::Biceps,
            MuscleGroup::Triceps,
            MuscleGroup::Forearms,
            MuscleGroup::AbsUpper,
            MuscleGroup::AbsLower,
            MuscleGroup::Obliques,
            MuscleGroup::TransverseAbs,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Glutes,
            MuscleGroup::HipFlexors,
            MuscleGroup::Adductors,
            MuscleGroup::Abductors,
            MuscleGroup::Calves,
        ];
        MUSCLES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            MuscleGroup::ChestUpper => "Upper Chest",
            MuscleGroup::ChestMid => "Mid Chest",
            MuscleGroup::ChestLower => "Lower Chest",
            MuscleGroup::Lats => "Lats",
            MuscleGroup::TrapsUpper => "Upper Traps",
            MuscleGroup::TrapsMid => "Mid Traps",
            MuscleGroup::TrapsLower => "Lower Traps",
            MuscleGroup::Rhomboids => "Rhomboids",
            MuscleGroup::LowerBack => "Lower Back",
            MuscleGroup::DeltsFront => "Front Delts",
            MuscleGroup::DeltsSide => "Side Delts",
            MuscleGroup::DeltsRear => "Rear Delts",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::AbsUpper => "Upper Abs",
            MuscleGroup::AbsLower => "Lower Abs",
            MuscleGroup::Obliques => "Obliques",
            MuscleGroup::TransverseAbs => "Transverse Abs",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::HipFlexors => "Hip Flexors",
            MuscleGroup::Adductors => "Adductors",
            MuscleGroup::Abductors => "Abductors",
            MuscleGroup::Calves => "Calves",
        }
    }
}

impl MuscleGroup {
    #[must_use]
    pub fn description(self) -> &'static str {
        #[allow(clippy::match_same_arms)]
        match self {
            MuscleGroup::ChestUpper => "Clavicular head of the pectoralis major",
            MuscleGroup::ChestMid => "Sternal head of the pectoralis major",
            MuscleGroup::ChestLower => "Costal fibers of the pectoralis major",
            MuscleGroup::Lats => "Latissimus dorsi",
            MuscleGroup::TrapsUpper => "Descending part of the trapezius",
            MuscleGroup::TrapsMid => "Transverse part of the trapezius",
            MuscleGroup::TrapsLower => "Ascending part of the trapezius",
            MuscleGroup::Rhomboids => "Rhomboid major and minor",
            MuscleGroup::LowerBack => "Erector spinae",
            MuscleGroup::DeltsFront => "Anterior deltoid",
            MuscleGroup::DeltsSide => "Lateral deltoid",
            MuscleGroup::DeltsRear => "Posterior deltoid",
            MuscleGroup::Biceps => "Biceps brachii and brachialis",
            MuscleGroup::Triceps => "Triceps brachii",
            MuscleGroup::Forearms => "Wrist flexors, extensors and brachioradialis",
            MuscleGroup::AbsUpper => "Upper rectus abdominis",
            MuscleGroup::AbsLower => "Lower rectus abdominis",
            MuscleGroup::Obliques => "Internal and external obliques",
            MuscleGroup::TransverseAbs => "Transversus abdominis",
            MuscleGroup::Quads => "Quadriceps femoris",
            MuscleGroup::Hamstrings => "Biceps femoris, semitendinosus and semimembranosus",
            MuscleGroup::Glutes => "Gluteus maximus",
            MuscleGroup::HipFlexors => "Iliopsoas and rectus femoris",
            MuscleGroup::Adductors => "Inner thigh",
            MuscleGroup::Abductors => "Gluteus medius and minimus",
            MuscleGroup::Calves => "Gastrocnemius and soleus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuscleTarget {
    pub muscle: MuscleGroup,
    pub weight: f64,
}

/// Weighted distribution of an exercise's stimulus over muscle groups.
///
/// A valid distribution has unique muscles and finite, non-negative weights summing to 1.0. The
/// type itself does not enforce this, so that catalog data can be loaded first and checked as a
/// whole by [`MuscleTargets::validate`].
#[derive(Deref, Debug, Default, Clone, PartialEq)]
pub struct MuscleTargets(Vec<MuscleTarget>);

impl MuscleTargets {
    pub fn new(targets: Vec<MuscleTarget>) -> Result<Self, MuscleTargetsError> {
        let targets = Self(targets);
        targets.validate()?;
        Ok(targets)
    }

    /// Build a distribution from arbitrary weights.
    ///
    /// Non-positive and non-finite weights are dropped, the remaining weights are divided by their
    /// sum and sorted by descending weight.
    pub fn normalized(weights: BTreeMap<MuscleGroup, f64>) -> Result<Self, MuscleTargetsError> {
        let positive = weights
            .into_iter()
            .filter(|(_, weight)| weight.is_finite() && *weight > 0.0)
            .collect::<Vec<_>>();
        let sum = positive.iter().map(|(_, weight)| weight).sum::<f64>();

        if positive.is_empty() || !sum.is_finite() {
            return Err(MuscleTargetsError::Empty);
        }

        let mut targets = positive
            .into_iter()
            .map(|(muscle, weight)| MuscleTarget {
                muscle,
                weight: weight / sum,
            })
            .collect::<Vec<_>>();
        targets.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.muscle.cmp(&b.muscle))
        });

        Ok(Self(targets))
    }

    /// Scale by per-muscle multipliers, then add per-muscle deltas and renormalize.
    ///
    /// Muscles missing from the distribution start at 0.0, so a delta can introduce a muscle the
    /// base does not train. Negative intermediate weights are clamped to 0.0.
    pub fn adjusted(
        &self,
        multipliers: &[(MuscleGroup, f64)],
        deltas: &[(MuscleGroup, f64)],
    ) -> Result<Self, MuscleTargetsError> {
        let mut weights = self.to_map();

        for (muscle, factor) in multipliers {
            if let Some(weight) = weights.get_mut(muscle) {
                *weight *= factor;
            }
        }

        for (muscle, delta) in deltas {
            *weights.entry(*muscle).or_default() += delta;
        }

        for weight in weights.values_mut() {
            *weight = weight.max(0.0);
        }

        Self::normalized(weights)
    }

    pub fn validate(&self) -> Result<(), MuscleTargetsError> {
        if self.0.is_empty() {
            return Err(MuscleTargetsError::Empty);
        }

        let mut seen = Vec::with_capacity(self.0.len());

        for target in &self.0 {
            if seen.contains(&target.muscle) {
                return Err(MuscleTargetsError::DuplicateMuscle(target.muscle));
            }
            seen.push(target.muscle);

            if !target.weight.is_finite() || target.weight < 0.0 {
                return Err(MuscleTargetsError::InvalidWeight {
                    muscle: target.muscle,
                    weight: target.weight,
                });
            }
        }

        let sum = self.sum();

        if (sum - 1.0).abs() > TARGET_SUM_TOLERANCE {
            return Err(MuscleTargetsError::InvalidSum(sum));
        }

        Ok(())
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.0.iter().map(|target| target.weight).sum()
    }

    /// Weight of `muscle`, 0.0 if the distribution does not contain it.
    #[must_use]
    pub fn weight(&self, muscle: MuscleGroup) -> f64 {
        self.0
            .iter()
            .find(|target| target.muscle == muscle)
            .map_or(0.0, |target| target.weight)
    }

    #[must_use]
    pub fn contains(&self, muscle: MuscleGroup) -> bool {
        self.0.iter().any(|target| target.muscle == muscle)
    }

    #[must_use]
    pub fn to_map(&self) -> BTreeMap<MuscleGroup, f64> {
        self.0
            .iter()
            .map(|target| (target.muscle, target.weight))
            .collect()
    }
}

impl From<&[(MuscleGroup, f64)]> for MuscleTargets {
    fn from(value: &[(MuscleGroup, f64)]) -> Self {
        Self(
            value
                .iter()
                .map(|(muscle, weight)| MuscleTarget {
                    muscle: *muscle,
                    weight: *weight,
                })
                .collect(),
        )
    }
}

impl<const N: usize> From<[(MuscleGroup, f64); N]> for MuscleTargets {
    fn from(value: [(MuscleGroup, f64); N]) -> Self {
        Self::from(value.as_slice())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MuscleTargetsError {
    #[error("no muscle with a positive weight")]
    Empty,
    #[error("muscle {0} listed more than once")]
    DuplicateMuscle(MuscleGroup),
    #[error("invalid weight {weight} for {muscle}")]
    InvalidWeight { muscle: MuscleGroup, weight: f64 },
    #[error("weights sum to {0} instead of 1.0")]
    InvalidSum(f64),
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_muscle_group_keys() {
        assert_eq!(MuscleGroup::iter().count(), 26);

        for muscle in MuscleGroup::iter() {
            assert_eq!(MuscleGroup::from_str(muscle.as_ref()), Ok(*muscle));
            assert!(!muscle.name().is_empty());
            assert!(!muscle.description().is_empty());
        }

        assert_eq!(MuscleGroup::TransverseAbs.as_ref(), "transverseAbs");
        assert_eq!(MuscleGroup::ChestUpper.to_string(), "chestUpper");
        assert_eq!(MuscleGroup::from_str("hipFlexors"), Ok(MuscleGroup::HipFlexors));
        assert!(MuscleGroup::from_str("HipFlexors").is_err());
    }

    #[rstest]
    #[case::valid(&[(MuscleGroup::Lats, 0.7), (MuscleGroup::Biceps, 0.3)], Ok(()))]
    #[case::within_tolerance(
        &[(MuscleGroup::Lats, 0.700_000_5), (MuscleGroup::Biceps, 0.3)],
        Ok(())
    )]
    #[case::empty(&[], Err(MuscleTargetsError::Empty))]
    #[case::duplicate(
        &[(MuscleGroup::Lats, 0.5), (MuscleGroup::Lats, 0.5)],
        Err(MuscleTargetsError::DuplicateMuscle(MuscleGroup::Lats))
    )]
    #[case::negative(
        &[(MuscleGroup::Lats, 1.2), (MuscleGroup::Biceps, -0.2)],
        Err(MuscleTargetsError::InvalidWeight { muscle: MuscleGroup::Biceps, weight: -0.2 })
    )]
    #[case::sum_too_low(
        &[(MuscleGroup::Lats, 0.5), (MuscleGroup::Biceps, 0.25)],
        Err(MuscleTargetsError::InvalidSum(0.75))
    )]
    fn test_muscle_targets_validate(
        #[case] targets: &[(MuscleGroup, f64)],
        #[case] expected: Result<(), MuscleTargetsError>,
    ) {
        assert_eq!(MuscleTargets::from(targets).validate(), expected);
    }

    #[test]
    fn test_muscle_targets_validate_non_finite() {
        assert!(matches!(
            MuscleTargets::from([(MuscleGroup::Lats, f64::NAN)]).validate(),
            Err(MuscleTargetsError::InvalidWeight {
                muscle: MuscleGroup::Lats,
                ..
            })
        ));
    }

    #[test]
    fn test_muscle_targets_normalized() {
        let targets = MuscleTargets::normalized(BTreeMap::from([
            (MuscleGroup::Biceps, 1.0),
            (MuscleGroup::Lats, 2.0),
            (MuscleGroup::Forearms, 1.0),
            (MuscleGroup::Rhomboids, 0.0),
            (MuscleGroup::TrapsMid, -1.0),
        ]))
        .unwrap();

        assert_eq!(
            targets
                .iter()
                .map(|target| target.muscle)
                .collect::<Vec<_>>(),
            vec![MuscleGroup::Lats, MuscleGroup::Biceps, MuscleGroup::Forearms]
        );
        assert_approx_eq!(targets.weight(MuscleGroup::Lats), 0.5);
        assert_approx_eq!(targets.weight(MuscleGroup::Biceps), 0.25);
        assert_approx_eq!(targets.weight(MuscleGroup::Rhomboids), 0.0);
        assert_eq!(targets.validate(), Ok(()));
    }

    #[rstest]
    #[case::no_weights(BTreeMap::new())]
    #[case::only_zero(BTreeMap::from([(MuscleGroup::Lats, 0.0)]))]
    #[case::only_negative(BTreeMap::from([(MuscleGroup::Lats, -0.5)]))]
    fn test_muscle_targets_normalized_empty(#[case] weights: BTreeMap<MuscleGroup, f64>) {
        assert_eq!(
            MuscleTargets::normalized(weights),
            Err(MuscleTargetsError::Empty)
        );
    }

    #[test]
    fn test_muscle_targets_adjusted() {
        let base = MuscleTargets::from([
            (MuscleGroup::Lats, 0.62),
            (MuscleGroup::Rhomboids, 0.18),
            (MuscleGroup::TrapsLower, 0.10),
            (MuscleGroup::Biceps, 0.10),
        ]);

        let targets = base
            .adjusted(
                &[(MuscleGroup::Biceps, 2.0)],
                &[
                    (MuscleGroup::Lats, -0.06),
                    (MuscleGroup::Rhomboids, 0.06),
                    (MuscleGroup::Forearms, 0.04),
                    (MuscleGroup::TrapsLower, -0.5),
                ],
            )
            .unwrap();

        let sum = 0.56 + 0.24 + 0.20 + 0.04;
        assert_approx_eq!(targets.weight(MuscleGroup::Lats), 0.56 / sum);
        assert_approx_eq!(targets.weight(MuscleGroup::Rhomboids), 0.24 / sum);
        assert_approx_eq!(targets.weight(MuscleGroup::Biceps), 0.20 / sum);
        assert_approx_eq!(targets.weight(MuscleGroup::Forearms), 0.04 / sum);
        assert!(!targets.contains(MuscleGroup::TrapsLower));
        assert_eq!(targets.validate(), Ok(()));
    }
}
