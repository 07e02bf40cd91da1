//! Citation tokens in supervisor answers: `[Name](ID-010)`.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]]+)\]\(([A-Za-z]+-\d+)\)")
        .unwrap_or_else(|e| panic!("citation pattern: {e}"))
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub name: String,
    pub id: String,
}

/// Every citation in `text`, in order of appearance, without duplicates.
pub fn extract(text: &str) -> Vec<Citation> {
    let mut found: Vec<Citation> = Vec::new();
    for caps in CITATION.captures_iter(text) {
        let citation = Citation {
            name: caps[1].trim().to_string(),
            id: caps[2].to_string(),
        };
        if !found.contains(&citation) {
            found.push(citation);
        }
    }
    found
}
