//! Ordered, validated class-name sets.

use crate::error::{Error, Result};
use crate::knowledge::Species;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Bidirectional mapping between model output index and class name.
///
/// Names are unique and the set is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelSet {
    /// Build a label set, rejecting empty sets and duplicate names.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::InvalidLabelSet {
                reason: "label set is empty".to_string(),
            });
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(Error::InvalidLabelSet {
                    reason: format!("duplicate label '{name}'"),
                });
            }
        }

        Ok(Self { names, index })
    }

    /// The classifier's four species, in output order.
    pub fn species() -> Self {
        let names: Vec<String> = Species::ALL.iter().map(|s| s.label().to_string()).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, index }
    }

    /// Read labels from a file, one per line, skipping blank lines.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::LabelsRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut names = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| Error::LabelsRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                names.push(trimmed.to_string());
            }
        }

        Self::new(names)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set has no labels.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at an output index.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Output index of a name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Names in output order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Fail unless a model output vector has exactly one value per label.
    pub fn check_width(&self, actual: usize) -> Result<()> {
        if actual == self.len() {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected: self.len(),
                actual,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_species_order_matches_classifier() {
        let labels = LabelSet::species();
        assert_eq!(labels.names(), ["Cheetah", "Leopard", "Lion", "Tiger"]);
        assert_eq!(labels.index_of("Tiger"), Some(3));
        assert_eq!(labels.name(0), Some("Cheetah"));
        assert_eq!(labels.name(4), None);
    }

    #[test]
    fn test_name_and_index_are_inverse() {
        let labels = LabelSet::species();
        for i in 0..labels.len() {
            let name = labels.name(i).unwrap();
            assert_eq!(labels.index_of(name), Some(i));
        }
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert!(LabelSet::new(vec![]).is_err());
        let dup = LabelSet::new(vec!["Lion".to_string(), "Lion".to_string()]);
        assert!(matches!(dup, Err(Error::InvalidLabelSet { .. })));
    }

    #[test]
    fn test_check_width() {
        let labels = LabelSet::species();
        assert!(labels.check_width(4).is_ok());
        assert!(matches!(
            labels.check_width(3),
            Err(Error::ShapeMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_from_file_skips_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cheetah").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  lion  ").unwrap();

        let labels = LabelSet::from_file(file.path()).unwrap();
        assert_eq!(labels.names(), ["cheetah", "lion"]);
    }

    #[test]
    fn test_from_missing_file() {
        let result = LabelSet::from_file(Path::new("nonexistent.labels.txt"));
        assert!(matches!(result, Err(Error::LabelsRead { .. })));
    }
}
