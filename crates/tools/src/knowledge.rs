//! Static knowledge base: keyword lookups over fixture data.
//!
//! Stands in for a real backing store behind the [`KnowledgeProvider`]
//! trait. Fixtures are either the built-in Cocoa AI set or a JSON file with
//! the same shape.

use std::path::Path;

use avatarline_core::knowledge::{
    ImplementationPath, KnowledgeProvider, RequirementsProfile, Solution,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fixtures;

/// Number of records returned when a topic matches nothing.
const FALLBACK_SOLUTIONS: usize = 2;

/// A complete fixture set, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    pub solutions: Vec<Solution>,
    pub requirements: RequirementsProfile,
    pub implementation_paths: Vec<ImplementationPath>,
}

/// Read-only knowledge base over in-memory fixtures.
#[derive(Debug, Clone)]
pub struct StaticKnowledgeBase {
    solutions: Vec<Solution>,
    requirements: RequirementsProfile,
    paths: Vec<ImplementationPath>,
}

impl StaticKnowledgeBase {
    /// The built-in Cocoa AI fixtures.
    pub fn builtin() -> Self {
        Self {
            solutions: fixtures::solutions(),
            requirements: fixtures::requirements_profile(),
            paths: fixtures::implementation_paths(),
        }
    }

    /// Build from a fixture set.
    ///
    /// Lookups never return empty, so the set needs at least one solution and
    /// one implementation path.
    pub fn from_fixtures(set: FixtureSet) -> avatarline_core::Result<Self> {
        if set.solutions.is_empty() {
            return Err(avatarline_core::Error::Config {
                message: "knowledge fixtures must contain at least one solution".into(),
            });
        }
        if set.implementation_paths.is_empty() {
            return Err(avatarline_core::Error::Config {
                message: "knowledge fixtures must contain at least one implementation path".into(),
            });
        }
        Ok(Self {
            solutions: set.solutions,
            requirements: set.requirements,
            paths: set.implementation_paths,
        })
    }

    /// Load a fixture set from a JSON file.
    pub fn from_json_file(path: &Path) -> avatarline_core::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| avatarline_core::Error::Config {
            message: format!("failed to read knowledge fixtures at {}: {e}", path.display()),
        })?;
        let set: FixtureSet = serde_json::from_str(&content)?;
        let kb = Self::from_fixtures(set)?;
        info!(
            path = %path.display(),
            solutions = kb.solutions.len(),
            paths = kb.paths.len(),
            "Loaded knowledge fixtures"
        );
        Ok(kb)
    }

    /// Load from `path` when given, otherwise use the built-in fixtures.
    pub fn load(path: Option<&str>) -> avatarline_core::Result<Self> {
        match path {
            Some(p) => Self::from_json_file(Path::new(p)),
            None => Ok(Self::builtin()),
        }
    }

    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }
}

impl Default for StaticKnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeProvider for StaticKnowledgeBase {
    fn find_solutions(&self, topic: Option<&str>) -> Vec<Solution> {
        let Some(topic) = topic.filter(|t| !t.is_empty()) else {
            return self.solutions.clone();
        };

        let needle = topic.to_lowercase();
        let matched: Vec<Solution> = self
            .solutions
            .iter()
            .filter(|s| {
                s.topic.to_lowercase().contains(&needle)
                    || s.content.to_lowercase().contains(&needle)
                    || s.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        if matched.is_empty() {
            self.solutions.iter().take(FALLBACK_SOLUTIONS).cloned().collect()
        } else {
            matched
        }
    }

    fn requirements_profile(&self) -> RequirementsProfile {
        self.requirements.clone()
    }

    fn find_implementation_path(&self, solution_type: Option<&str>) -> ImplementationPath {
        // from_fixtures guarantees at least one path
        let default = &self.paths[0];
        let Some(solution_type) = solution_type.filter(|t| !t.is_empty()) else {
            return default.clone();
        };

        let needle = solution_type.to_lowercase();
        self.paths
            .iter()
            .find(|p| p.solution_type.to_lowercase().contains(&needle))
            .unwrap_or(default)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_topic_returns_full_catalog() {
        let kb = StaticKnowledgeBase::builtin();
        assert_eq!(kb.find_solutions(None).len(), 6);
        assert_eq!(kb.find_solutions(Some("")).len(), 6);
    }

    #[test]
    fn topic_filters_case_insensitively() {
        let kb = StaticKnowledgeBase::builtin();
        let found = kb.find_solutions(Some("Customer Service"));
        assert!(!found.is_empty());
        for s in &found {
            let haystack = format!("{} {} {}", s.topic, s.content, s.name).to_lowercase();
            assert!(haystack.contains("customer service"), "unexpected match {}", s.id);
        }
        let ids: Vec<_> = found.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["ID-010", "ID-020"]);
    }

    #[test]
    fn topic_matches_content_and_name() {
        let kb = StaticKnowledgeBase::builtin();
        let by_content = kb.find_solutions(Some("invoice processing"));
        assert_eq!(by_content.len(), 1);
        assert_eq!(by_content[0].id, "ID-030");

        let by_name = kb.find_solutions(Some("implementation packages"));
        assert_eq!(by_name[0].id, "ID-060");
    }

    #[test]
    fn unmatched_topic_falls_back_to_first_two() {
        let kb = StaticKnowledgeBase::builtin();
        let found = kb.find_solutions(Some("zzz-no-match"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "ID-010");
        assert_eq!(found[1].id, "ID-020");
    }

    #[test]
    fn implementation_path_matches_solution_type() {
        let kb = StaticKnowledgeBase::builtin();
        let path = kb.find_implementation_path(Some("conversational AI"));
        assert_eq!(path.solution_type, "conversational AI");

        let path = kb.find_implementation_path(Some("ANALYTICS"));
        assert_eq!(path.solution_type, "predictive analytics");
    }

    #[test]
    fn implementation_path_defaults_to_first() {
        let kb = StaticKnowledgeBase::builtin();
        assert_eq!(
            kb.find_implementation_path(Some("nonexistent")).solution_type,
            "conversational AI"
        );
        assert_eq!(
            kb.find_implementation_path(None).solution_type,
            "conversational AI"
        );
    }

    #[test]
    fn requirements_profile_has_four_phases() {
        let kb = StaticKnowledgeBase::builtin();
        let profile = kb.requirements_profile();
        assert_eq!(profile.implementation_approach.len(), 4);
        assert!(profile.industries_served.contains(&"Healthcare".to_string()));
    }

    #[test]
    fn loads_fixture_file() {
        let set = FixtureSet {
            solutions: vec![Solution {
                id: "KB-1".into(),
                name: "Only Solution".into(),
                topic: "everything".into(),
                content: "It does it all.".into(),
            }],
            requirements: RequirementsProfile::default(),
            implementation_paths: fixtures::implementation_paths(),
        };
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&set).unwrap()).unwrap();

        let kb = StaticKnowledgeBase::from_json_file(file.path()).unwrap();
        assert_eq!(kb.solution_count(), 1);
        // Fallback slice is capped by the catalog size
        assert_eq!(kb.find_solutions(Some("nothing here")).len(), 1);
    }

    #[test]
    fn fixtures_without_paths_rejected() {
        let set = FixtureSet {
            solutions: fixtures::solutions(),
            requirements: RequirementsProfile::default(),
            implementation_paths: vec![],
        };
        assert!(StaticKnowledgeBase::from_fixtures(set).is_err());
    }

    #[test]
    fn missing_fixture_file_is_config_error() {
        let err = StaticKnowledgeBase::load(Some("/nonexistent/kb.json")).unwrap_err();
        assert!(matches!(err, avatarline_core::Error::Config { .. }));
    }
}
