use std::{borrow::Borrow, collections::BTreeMap};

use derive_more::{AsRef, Deref, Display};

/// Identifier of a variation dimension such as `grip` or `width`.
#[derive(AsRef, Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateID(String);

impl From<&str> for TemplateID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for TemplateID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Key of an option within a variation template, unique per template.
#[derive(AsRef, Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OptionKey(String);

impl From<&str> for OptionKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Borrow<str> for OptionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Selected option per variation template.
pub type Selection = BTreeMap<TemplateID, OptionKey>;

#[derive(Debug, Clone, PartialEq)]
pub struct VariationOption {
    pub key: OptionKey,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariationTemplate {
    pub id: TemplateID,
    pub label: String,
    pub description: String,
    pub options: Vec<VariationOption>,
}

impl VariationTemplate {
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&VariationOption> {
        self.options.iter().find(|option| *option.key == key)
    }

    #[must_use]
    pub fn has_option(&self, key: &str) -> bool {
        self.option(key).is_some()
    }
}

/// Ordered collection of all variation templates.
///
/// Duplicate ids and malformed option lists are kept as loaded and reported by the catalog
/// validator. Lookups return the first template with a matching id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariationTemplateRegistry {
    templates: Vec<VariationTemplate>,
}

impl VariationTemplateRegistry {
    #[must_use]
    pub fn new(templates: Vec<VariationTemplate>) -> Self {
        Self { templates }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self::new(
            TEMPLATES
                .iter()
                .map(|template| VariationTemplate {
                    id: template.id.into(),
                    label: template.label.to_string(),
                    description: template.description.to_string(),
                    options: template
                        .options
                        .iter()
                        .map(|(key, label, description)| VariationOption {
                            key: (*key).into(),
                            label: (*label).to_string(),
                            description: (*description).to_string(),
                        })
                        .collect(),
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn template(&self, id: &str) -> Option<&VariationTemplate> {
        self.templates.iter().find(|template| *template.id == id)
    }

    #[must_use]
    pub fn option_label(&self, template_id: &str, option_key: &str) -> Option<&str> {
        self.template(template_id)?
            .option(option_key)
            .map(|option| option.label.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariationTemplate> {
        self.templates.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<'a> IntoIterator for &'a VariationTemplateRegistry {
    type Item = &'a VariationTemplate;
    type IntoIter = std::slice::Iter<'a, VariationTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}

struct BaseTemplate {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    options: &'static [(&'static str, &'static str, &'static str)],
}

const WIDTH_OPTIONS: &[(&str, &str, &str)] = &[
    ("closest", "Closest", "Hands or feet as close together as possible"),
    ("close", "Close", "Narrower than standard"),
    ("neutral", "Neutral", "Standard width"),
    ("wide", "Wide", "Wider than standard"),
    ("widest", "Widest", "As wide as possible"),
];

const TEMPLATES: [BaseTemplate; 19] = [
    BaseTemplate {
        id: "width",
        label: "Width",
        description: "Distance between the hands or feet",
        options: WIDTH_OPTIONS,
    },
    BaseTemplate {
        id: "plane",
        label: "Plane",
        description: "Angle of the movement relative to the torso",
        options: &[
            ("decline", "Decline", "Pressing or pulling downward"),
            ("flat", "Flat", "Horizontal movement plane"),
            ("incline", "Incline", "Pressing or pulling upward"),
        ],
    },
    BaseTemplate {
        id: "planeAngle",
        label: "Bench Angle",
        description: "Bench angle in degrees",
        options: &[
            ("-15", "-15°", "Decline bench"),
            ("0", "0°", "Flat bench"),
            ("15", "15°", "Low incline"),
            ("30", "30°", "Moderate incline"),
            ("45", "45°", "Steep incline"),
            ("60", "60°", "Near vertical"),
        ],
    },
    BaseTemplate {
        id: "grip",
        label: "Grip",
        description: "Orientation of the hands",
        options: &[
            ("normal", "Normal", "Default grip for the exercise"),
            ("pronated", "Pronated", "Palms facing down or away"),
            ("supinated", "Supinated", "Palms facing up or toward you"),
            ("neutral", "Neutral", "Palms facing each other"),
            (
                "neutralSupinated",
                "Neutral to Supinated",
                "Rotating from neutral to supinated during the rep",
            ),
        ],
    },
    BaseTemplate {
        id: "cableAttachment",
        label: "Cable Attachment",
        description: "Handle attached to the cable",
        options: &[
            ("straightBar", "Straight Bar", "Rigid straight bar"),
            ("ezBar", "EZ Bar", "Cambered bar"),
            ("rope", "Rope", "Rope with two ends"),
            ("singleHandle", "Single Handle", "D-handle for one hand"),
            ("vBar", "V-Bar", "Close neutral grip handle"),
        ],
    },
    BaseTemplate {
        id: "resistanceSource",
        label: "Resistance",
        description: "Source of the external load",
        options: &[
            ("barbell", "Barbell", "Free barbell"),
            ("dumbbell", "Dumbbell", "One dumbbell per hand"),
            ("cable", "Cable", "Cable stack"),
            ("machine", "Machine", "Guided machine"),
            ("smithMachine", "Smith Machine", "Barbell on fixed rails"),
            ("band", "Band", "Elastic band"),
            ("bodyweight", "Bodyweight", "No external load"),
        ],
    },
    BaseTemplate {
        id: "bodyPosition",
        label: "Body Position",
        description: "Position of the body during the set",
        options: &[
            ("standing", "Standing", "Upright on both feet"),
            ("seated", "Seated", "Sitting on a bench or seat"),
            ("lying", "Lying", "Supine or prone on a bench"),
            ("kneeling", "Kneeling", "On one or both knees"),
            ("bentOver", "Bent Over", "Hinged at the hips"),
        ],
    },
    BaseTemplate {
        id: "support",
        label: "Support",
        description: "External support for the torso",
        options: &[
            ("unsupported", "Unsupported", "No chest or back support"),
            ("chestSupported", "Chest Supported", "Chest resting on a pad"),
            ("backSupported", "Back Supported", "Back resting on a pad"),
        ],
    },
    BaseTemplate {
        id: "unilateralMode",
        label: "Unilateral Mode",
        description: "How the two sides are trained",
        options: &[
            ("simultaneous", "Simultaneous", "Both sides at once"),
            ("alternating", "Alternating", "Sides take turns each rep"),
            ("singleSide", "Single Side", "One side per set"),
        ],
    },
    BaseTemplate {
        id: "rangeOfMotion",
        label: "Range of Motion",
        description: "Portion of the full range used",
        options: &[
            ("full", "Full", "Complete range of motion"),
            ("lengthenedPartial", "Lengthened Partial", "Partial reps in the stretched position"),
            ("shortenedPartial", "Shortened Partial", "Partial reps in the contracted position"),
        ],
    },
    BaseTemplate {
        id: "kneeAngle",
        label: "Knee Angle",
        description: "Knee position during the movement",
        options: &[
            ("straight", "Straight", "Legs extended"),
            ("bent", "Bent", "Knees flexed"),
        ],
    },
    BaseTemplate {
        id: "cadence",
        label: "Cadence",
        description: "Tempo of each repetition",
        options: &[
            ("controlled", "Controlled", "Steady tempo in both directions"),
            ("explosive", "Explosive", "Fast concentric phase"),
            ("slowEccentric", "Slow Eccentric", "Lowering phase of three seconds or more"),
        ],
    },
    BaseTemplate {
        id: "pause",
        label: "Pause",
        description: "Pause within each repetition",
        options: &[
            ("none", "None", "No deliberate pause"),
            ("bottom", "Bottom", "Pause in the stretched position"),
            ("top", "Top", "Pause in the contracted position"),
        ],
    },
    BaseTemplate {
        id: "barType",
        label: "Bar Type",
        description: "Type of bar used",
        options: &[
            ("straight", "Straight", "Standard straight bar"),
            ("ez", "EZ", "Cambered curl bar"),
            ("safetySquat", "Safety Squat", "Yoked squat bar"),
            ("trap", "Trap", "Hexagonal bar"),
        ],
    },
    BaseTemplate {
        id: "gripTechnique",
        label: "Grip Technique",
        description: "How the bar is held",
        options: &[
            ("doubleOverhand", "Double Overhand", "Both palms facing the body"),
            ("mixed", "Mixed", "One palm facing in, one facing out"),
            ("hook", "Hook", "Thumb trapped under the fingers"),
        ],
    },
    BaseTemplate {
        id: "gripAssistance",
        label: "Grip Assistance",
        description: "Equipment supporting the grip",
        options: &[
            ("none", "None", "Bare hands"),
            ("straps", "Straps", "Lifting straps"),
            ("chalk", "Chalk", "Chalk only"),
        ],
    },
    BaseTemplate {
        id: "footVerticalPosition",
        label: "Foot Position",
        description: "Vertical foot placement on a platform",
        options: &[
            ("low", "Low", "Feet low on the platform"),
            ("middle", "Middle", "Feet centered on the platform"),
            ("high", "High", "Feet high on the platform"),
        ],
    },
    BaseTemplate {
        id: "footAngle",
        label: "Foot Angle",
        description: "Rotation of the feet",
        options: &[
            ("in", "Turned In", "Toes pointing inward"),
            ("forward", "Forward", "Toes pointing forward"),
            ("out", "Turned Out", "Toes pointing outward"),
        ],
    },
    BaseTemplate {
        id: "heelElevation",
        label: "Heel Elevation",
        description: "Height of the heels relative to the toes",
        options: &[
            ("flat", "Flat", "Heels on the floor"),
            ("elevated", "Elevated", "Heels raised on a plate or wedge"),
        ],
    },
];
