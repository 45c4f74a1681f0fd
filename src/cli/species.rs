//! Species knowledge base command.

use crate::error::Result;
use crate::knowledge::{Species, SpeciesDescription, SpeciesKnowledgeBase};

/// Entries for one label (case-insensitive) or, when `label` is `None`, all four.
pub fn select_species<'a>(
    knowledge: &'a SpeciesKnowledgeBase,
    label: Option<&str>,
) -> Result<Vec<&'a SpeciesDescription>> {
    match label {
        Some(label) => {
            let species: Species = label.parse()?;
            Ok(vec![knowledge.get(species)?])
        }
        None => Ok(knowledge.iter().collect()),
    }
}

/// Human text for a set of entries, separated by blank lines.
pub fn species_text(entries: &[&SpeciesDescription]) -> String {
    entries
        .iter()
        .map(|entry| entry.to_text())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_select_one_case_insensitive() {
        let kb = SpeciesKnowledgeBase::builtin();
        let entries = select_species(&kb, Some("leopard")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].species, Species::Leopard);
    }

    #[test]
    fn test_select_all() {
        let kb = SpeciesKnowledgeBase::builtin();
        let entries = select_species(&kb, None).unwrap();
        assert_eq!(entries.len(), 4);
        let text = species_text(&entries);
        assert_eq!(text.matches("Habitat:").count(), 4);
    }

    #[test]
    fn test_select_unknown() {
        let kb = SpeciesKnowledgeBase::builtin();
        let err = select_species(&kb, Some("Jaguar")).unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { ref label } if label == "Jaguar"));
    }
}
