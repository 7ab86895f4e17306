use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::utils::text::title_case;

/// Canonical stage value and the lower-case spellings that map to it.
const STAGE_ENTRIES: &[(&str, &[&str])] = &[
    ("Lead", &["new", "initial", "prospecting"]),
    ("Qualified", &["qualified lead", "sql", "mql"]),
    ("Proposal", &["proposed", "quote sent"]),
    ("Negotiation", &["negotiating", "contract review"]),
    ("Closed-Won", &["won", "closed won", "success"]),
    ("Closed-Lost", &["lost", "closed lost", "rejected"]),
    ("On-Hold", &["paused", "deferred", "postponed"]),
];

pub static STAGE_SYNONYMS: Lazy<SynonymTable> = Lazy::new(|| SynonymTable::new(STAGE_ENTRIES));

/// Immutable synonym → canonical lookup with case-insensitive keys.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    lookup: HashMap<String, &'static str>,
    canonical: Vec<&'static str>,
}

impl SynonymTable {
    pub fn new(entries: &[(&'static str, &[&'static str])]) -> Self {
        let mut lookup = HashMap::new();
        for (canonical, synonyms) in entries {
            for synonym in synonyms.iter() {
                lookup.insert(synonym.to_lowercase(), *canonical);
            }
        }
        Self {
            lookup,
            canonical: entries.iter().map(|(canonical, _)| *canonical).collect(),
        }
    }

    /// Canonical spelling for a known synonym.
    pub fn canonical(&self, value: &str) -> Option<&'static str> {
        self.lookup.get(&value.to_lowercase()).copied()
    }

    /// Known synonym → canonical value, anything else title-cased.
    pub fn normalize(&self, value: &str) -> String {
        match self.canonical(value) {
            Some(canonical) => canonical.to_string(),
            None => title_case(&value.to_lowercase()),
        }
    }

    pub fn canonical_values(&self) -> &[&'static str] {
        &self.canonical
    }
}
