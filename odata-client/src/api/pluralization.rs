//! Entity name pluralization policies used by name matching

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Word-form strategy injected into the name matcher
pub trait Pluralizer: Send + Sync + fmt::Debug {
    fn pluralize(&self, word: &str) -> String;
    fn singularize(&self, word: &str) -> String;
}

/// English grammar rules (company -> companies, leaf -> leaves)
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

/// Appends 's' (or 'es' after s/x/ch/sh), for names that are not English words
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplePluralizer;

/// Leaves words unchanged; only exact and case-insensitive matches apply
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPluralizer;

impl Pluralizer for EnglishPluralizer {
    fn pluralize(&self, word: &str) -> String {
        pluralize_entity_name(word)
    }

    fn singularize(&self, word: &str) -> String {
        singularize_entity_name(word)
    }
}

impl Pluralizer for SimplePluralizer {
    fn pluralize(&self, word: &str) -> String {
        overrideable_pluralize_entity_name(word, true)
    }

    fn singularize(&self, word: &str) -> String {
        singularize_entity_name(word)
    }
}

impl Pluralizer for NoPluralizer {
    fn pluralize(&self, word: &str) -> String {
        word.to_string()
    }

    fn singularize(&self, word: &str) -> String {
        word.to_string()
    }
}

/// Configurable choice of pluralizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PluralizationPolicy {
    #[default]
    English,
    Simple,
    None,
}

impl PluralizationPolicy {
    pub fn pluralizer(self) -> Arc<dyn Pluralizer> {
        match self {
            PluralizationPolicy::English => Arc::new(EnglishPluralizer),
            PluralizationPolicy::Simple => Arc::new(SimplePluralizer),
            PluralizationPolicy::None => Arc::new(NoPluralizer),
        }
    }
}

impl FromStr for PluralizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" => Ok(PluralizationPolicy::English),
            "simple" => Ok(PluralizationPolicy::Simple),
            "none" | "off" => Ok(PluralizationPolicy::None),
            other => Err(format!(
                "unknown pluralization policy '{}', expected english, simple or none",
                other
            )),
        }
    }
}

/// Convert entity name to plural form using English grammar rules
pub fn pluralize_entity_name(entity_name: &str) -> String {
    overrideable_pluralize_entity_name(entity_name, false)
}

/// Convert entity name to plural form with optional simple pluralization
///
/// When `force_simple` is true, always just adds 's' (or 'es' for s/x/ch/sh endings).
pub fn overrideable_pluralize_entity_name(entity_name: &str, force_simple: bool) -> String {
    if entity_name.is_empty() {
        return entity_name.to_string();
    }

    let lower = entity_name.to_lowercase();

    // Words ending in 's', 'sh', 'ch', 'x' -> add 'es', even in simple mode
    if lower.ends_with('s')
        || lower.ends_with("sh")
        || lower.ends_with("ch")
        || lower.ends_with('x')
    {
        return format!("{}es", entity_name);
    }

    if force_simple {
        return format!("{}s", entity_name);
    }

    if lower.ends_with('z') && !lower.ends_with("tz") {
        return format!("{}zes", entity_name);
    }

    // consonant + 'y' -> 'ies'
    if lower.ends_with('y') && !preceded_by_vowel(&lower, 1) {
        return format!("{}ies", &entity_name[..entity_name.len() - 1]);
    }

    if lower.ends_with("fe") {
        return format!("{}ves", &entity_name[..entity_name.len() - 2]);
    }
    if lower.ends_with('f') {
        return format!("{}ves", &entity_name[..entity_name.len() - 1]);
    }

    // consonant + 'o' -> 'oes'
    if lower.ends_with('o') && !preceded_by_vowel(&lower, 1) {
        return format!("{}es", entity_name);
    }

    format!("{}s", entity_name)
}

/// Convert a plural entity name back to a singular form
///
/// Best effort: irregular endings like "knives" become "knif". Name matching
/// also pluralizes the declared name, which covers those cases.
pub fn singularize_entity_name(entity_name: &str) -> String {
    let lower = entity_name.to_lowercase();
    let len = entity_name.len();

    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &entity_name[..len - 3]);
    }
    if lower.ends_with("ves") {
        return format!("{}f", &entity_name[..len - 3]);
    }
    if ["sses", "shes", "ches", "xes", "zzes", "oes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return entity_name[..len - 2].to_string();
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return entity_name.to_string();
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return entity_name[..len - 1].to_string();
    }

    entity_name.to_string()
}

/// Whether the character `offset` positions before the last one is a vowel
fn preceded_by_vowel(lower: &str, offset: usize) -> bool {
    lower
        .chars()
        .rev()
        .nth(offset)
        .map(|c| "aeiou".contains(c))
        // single-letter words have no predecessor; treat them like vowel endings
        .unwrap_or(true)
}
