//! Attribute access for a single start-element event.
//!
//! Values are stored already unescaped. Lookups are by exact attribute name;
//! a repeated attribute keeps its last value.

use std::{collections::HashMap, str::FromStr};

use super::BuildError;

/// Attribute map handed to [`EntityBuilder::start_element`].
///
/// [`EntityBuilder::start_element`]: super::EntityBuilder::start_element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
}

impl Attributes {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw value of `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of distinct attribute names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the element carried no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(super) fn required<T: FromStr>(
        &self,
        element: &str,
        name: &'static str,
    ) -> Result<T, BuildError> {
        let Some(raw) = self.get(name) else {
            return Err(BuildError::malformed(element, name, None));
        };
        raw.trim()
            .parse()
            .map_err(|_| BuildError::malformed(element, name, Some(raw)))
    }

    /// Parse `name` when present; absent attributes yield `T::default()`.
    pub(super) fn optional<T: FromStr + Default>(
        &self,
        element: &str,
        name: &'static str,
    ) -> Result<T, BuildError> {
        match self.get(name) {
            None => Ok(T::default()),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| BuildError::malformed(element, name, Some(raw))),
        }
    }

    pub(super) fn text(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_owned)
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
