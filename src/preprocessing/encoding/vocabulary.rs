use crate::error::{FareError, Result};
use std::collections::HashMap;

/// Distinct values of one column in first-seen order.
///
/// Indices are zero-based and stable. A vocabulary is built only by fitting
/// or by restoring persisted parameters; there is no public mutation API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    values: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Builds a vocabulary from a stream of observed values.
    pub(crate) fn learn<'a>(observed: impl IntoIterator<Item = &'a str>) -> Self {
        let mut vocab = Self::default();
        for v in observed {
            if !vocab.index.contains_key(v) {
                vocab.index.insert(v.to_string(), vocab.values.len());
                vocab.values.push(v.to_string());
            }
        }
        vocab
    }

    /// Restores a persisted vocabulary.
    ///
    /// # Errors
    /// [`FareError::InvalidConfig`] if `values` contains a duplicate.
    pub(crate) fn from_values(values: Vec<String>) -> Result<Self> {
        let mut index = HashMap::with_capacity(values.len());
        for (i, v) in values.iter().enumerate() {
            if index.insert(v.clone(), i).is_some() {
                return Err(FareError::InvalidConfig(format!(
                    "persisted vocabulary contains duplicate value {v:?}"
                )));
            }
        }
        Ok(Self { values, index })
    }

    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let v = Vocabulary::learn(["WLG", "AKL", "WLG", "CHC", "AKL"]);
        assert_eq!(v.to_vec(), vec!["WLG", "AKL", "CHC"]);
        assert_eq!(v.index_of("AKL"), Some(1));
        assert_eq!(v.index_of("ZQN"), None);
        assert_eq!(v.get(2), Some("CHC"));
    }

    #[test]
    fn test_empty_string_is_a_category() {
        let v = Vocabulary::learn(["", "20kg", ""]);
        assert_eq!(v.len(), 2);
        assert_eq!(v.index_of(""), Some(0));
    }

    #[test]
    fn test_from_values_rejects_duplicates() {
        assert!(Vocabulary::from_values(vec!["a".into(), "b".into()]).is_ok());
        assert!(Vocabulary::from_values(vec!["a".into(), "a".into()]).is_err());
    }
}
