//! Name equivalence used by every metadata lookup
//!
//! A requested name matches a declared name when the two are identical, when
//! they are equal after homogenization (case and separators ignored), or when
//! one is the singular/plural form of the other under the injected pluralizer.

use std::sync::Arc;

use super::pluralization::{PluralizationPolicy, Pluralizer};

/// Lower-case a name and drop every non-alphanumeric character
pub fn homogenize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Equivalence policy applied uniformly to sets, types, properties and functions
#[derive(Debug, Clone)]
pub struct NameMatcher {
    pluralizer: Arc<dyn Pluralizer>,
}

impl NameMatcher {
    pub fn new(pluralizer: Arc<dyn Pluralizer>) -> Self {
        Self { pluralizer }
    }

    pub fn from_policy(policy: PluralizationPolicy) -> Self {
        Self::new(policy.pluralizer())
    }

    /// Check whether `actual` (declared in the schema) answers to `requested`
    pub fn names_are_equal(&self, actual: &str, requested: &str) -> bool {
        if actual == requested {
            return true;
        }

        let actual_h = homogenize(actual);
        let requested_h = homogenize(requested);
        if actual_h.is_empty() || requested_h.is_empty() {
            return false;
        }
        if actual_h == requested_h {
            return true;
        }

        actual_h == homogenize(&self.pluralizer.singularize(requested))
            || actual_h == homogenize(&self.pluralizer.pluralize(requested))
            || requested_h == homogenize(&self.pluralizer.pluralize(actual))
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::from_policy(PluralizationPolicy::default())
    }
}
