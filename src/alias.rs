//! Canonicalisation of team names that differ between data feeds.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::domain::TeamId;

/// Maps alternative spellings to a canonical name. Lookups are exact after trimming and
/// ignoring case; there is no fuzzy matching.
#[derive(Debug, Clone, Default)]
pub struct TeamAliases {
    canonical: FxHashMap<String, TeamId>,
}
impl TeamAliases {
    pub fn new(aliases: &BTreeMap<String, Vec<String>>) -> Self {
        let mut canonical = FxHashMap::default();
        for (name, alternatives) in aliases {
            let team = TeamId::from(name.trim());
            canonical.insert(fold(name), team.clone());
            for alternative in alternatives {
                canonical.insert(fold(alternative), team.clone());
            }
        }
        Self { canonical }
    }

    /// The canonical identity of `name`, or the trimmed name itself if it has no alias.
    pub fn resolve(&self, name: &str) -> TeamId {
        match self.canonical.get(&fold(name)) {
            Some(team) => team.clone(),
            None => TeamId::from(name.trim()),
        }
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}
