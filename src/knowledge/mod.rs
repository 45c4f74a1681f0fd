//! Static descriptive text about the four recognised big-cat species.

use crate::error::{Error, Result};
use serde::Serialize;

/// A species the classifier can recognise.
///
/// Variant order matches the classifier's output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Species {
    /// Acinonyx jubatus.
    Cheetah,
    /// Panthera pardus.
    Leopard,
    /// Panthera leo.
    Lion,
    /// Panthera tigris.
    Tiger,
}

impl Species {
    /// All species, in classifier output order.
    pub const ALL: [Self; 4] = [Self::Cheetah, Self::Leopard, Self::Lion, Self::Tiger];

    /// Canonical label, as produced by the classifier.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cheetah => "Cheetah",
            Self::Leopard => "Leopard",
            Self::Lion => "Lion",
            Self::Tiger => "Tiger",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Species {
    type Err = Error;

    /// Case-insensitive parse, for user-typed names.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|species| species.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::KeyNotFound {
                label: s.to_string(),
            })
    }
}

/// Descriptive text for one species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeciesDescription {
    /// Species this entry describes.
    pub species: Species,
    /// Indonesian common name.
    pub local_name: &'static str,
    /// Where the species lives.
    pub habitat: &'static str,
    /// Distinguishing physical traits.
    pub traits: &'static str,
    /// What sets it apart from the other big cats.
    pub uniqueness: &'static str,
    /// What the animal is commonly associated with.
    pub symbolizes: &'static str,
    /// One-paragraph summary for the project overview page.
    pub summary: &'static str,
}

impl SpeciesDescription {
    /// Heading line, e.g. `Harimau (Tiger)`.
    pub fn heading(&self) -> String {
        if self.local_name == self.species.label() {
            self.local_name.to_string()
        } else {
            format!("{} ({})", self.local_name, self.species)
        }
    }

    /// Multi-line text block shown under a classification result.
    pub fn to_text(&self) -> String {
        format!(
            "{}\n  Habitat:     {}\n  Traits:      {}\n  Uniqueness:  {}\n  Symbolizes:  {}",
            self.heading(),
            self.habitat,
            self.traits,
            self.uniqueness,
            self.symbolizes
        )
    }
}

static DESCRIPTIONS: [SpeciesDescription; 4] = [
    SpeciesDescription {
        species: Species::Tiger,
        local_name: "Harimau",
        habitat: "Tropical forests, rainforests and grasslands across Asia, mainly India, Sumatra and Siberia.",
        traits: "Large muscular body with the distinctive orange-and-black stripes.",
        uniqueness: "The only big cat that enjoys water; it often swims to hunt.",
        symbolizes: "Strength and courage, a guardian of nature in Asian cultures.",
        summary: "Tropical forests and grasslands of Asia. Bold orange-black stripes on a large body. Likes to swim and hunts alone. Stands for strength and courage.",
    },
    SpeciesDescription {
        species: Species::Lion,
        local_name: "Singa",
        habitat: "Grasslands and savannas of Africa, plus a small part of Asia (western India).",
        traits: "Males carry a thick mane around the head; females do not.",
        uniqueness: "Lives in groups called prides.",
        symbolizes: "Leadership and majesty, the \"King of the Jungle\".",
        summary: "African savanna and parts of India. Thick mane on males. Lives in prides. Stands for leadership and nobility.",
    },
    SpeciesDescription {
        species: Species::Leopard,
        local_name: "Macan Tutul",
        habitat: "Tropical rainforests, grasslands and mountains of Africa and South Asia.",
        traits: "Golden coat covered in black rosette-shaped spots.",
        uniqueness: "An expert climber that often stores its prey up in tree branches.",
        symbolizes: "Calm and cunning, a patient and tactical hunter.",
        summary: "Tropical forests and mountains of Africa and Asia. Rosette spots on golden fur. Expert climber. Stands for calm and strategy.",
    },
    SpeciesDescription {
        species: Species::Cheetah,
        local_name: "Cheetah",
        habitat: "Open savannas and grasslands of Africa and parts of the Middle East.",
        traits: "Slender body, long legs and small black spots all over.",
        uniqueness: "The fastest land animal in the world, reaching up to 112 km/h.",
        symbolizes: "Speed and agility, focus and drive toward a goal.",
        summary: "African savanna and the Middle East. Slim and built for speed. Fastest animal on land. Stands for focus and agility.",
    },
];

/// Read-only lookup from species label to description.
#[derive(Debug, Clone, Copy)]
pub struct SpeciesKnowledgeBase {
    entries: &'static [SpeciesDescription],
}

impl SpeciesKnowledgeBase {
    /// The built-in four-species table.
    pub const fn builtin() -> Self {
        Self {
            entries: &DESCRIPTIONS,
        }
    }

    /// Look up a description by exact label (`Tiger`, `Lion`, `Leopard`, `Cheetah`).
    pub fn lookup(&self, label: &str) -> Result<&SpeciesDescription> {
        self.entries
            .iter()
            .find(|entry| entry.species.label() == label)
            .ok_or_else(|| Error::KeyNotFound {
                label: label.to_string(),
            })
    }

    /// Look up the description for a parsed species.
    pub fn get(&self, species: Species) -> Result<&SpeciesDescription> {
        self.lookup(species.label())
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &SpeciesDescription> {
        self.entries.iter()
    }
}

impl Default for SpeciesKnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}
