// src/institutions.rs
//! Institution suggester: matches known institution names in the text and
//! returns their canonical reference links.
//!
//! The mapping lives in a `BTreeMap`, so suggestion order is the sorted
//! key order and stays reproducible across runs.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub institution: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct InstitutionIndex {
    links: BTreeMap<String, String>,
}

impl InstitutionIndex {
    pub fn new(links: &BTreeMap<String, String>) -> Self {
        Self {
            links: links
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
        }
    }

    /// Substring containment against the lower-cased text; matched keys are
    /// emitted title-cased with their URL, in sorted key order.
    pub fn suggest(&self, text: &str) -> Vec<Suggestion> {
        let lower = text.to_lowercase();
        self.links
            .iter()
            .filter(|(name, _)| lower.contains(name.as_str()))
            .map(|(name, url)| Suggestion {
                institution: title_case(name),
                url: url.clone(),
            })
            .collect()
    }
}

/// "up diliman" -> "Up Diliman".
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
