//! Knowledge base records and the provider trait the supervisor tools query.
//!
//! Records are immutable and identified by stable ids so the supervisor can
//! cite them (`[Name](ID-010)`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A solution offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    pub name: String,
    pub topic: String,
    pub content: String,
}

/// What the company knows about typical client requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsProfile {
    pub industries_served: Vec<String>,
    pub common_use_cases: Vec<String>,
    /// Phase key (`phase1`, `phase2`…) → description
    pub implementation_approach: BTreeMap<String, String>,
    pub success_metrics: Vec<String>,
}

/// A recommended delivery plan for one kind of solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationPath {
    pub solution_type: String,
    pub timeline: String,
    pub phases: Vec<String>,
    pub requirements: Vec<String>,
    pub investment_range: String,
    pub roi_timeline: String,
}

/// Read-only access to the knowledge the supervisor tools expose.
///
/// None of these lookups can fail and none of them return an empty answer:
/// when nothing matches, a fixed fallback is returned instead.
pub trait KnowledgeProvider: Send + Sync {
    /// Solutions whose topic, content, or name contains `topic`.
    ///
    /// No topic (or an empty one) returns the whole catalog; a topic with no
    /// matches returns the first two records.
    fn find_solutions(&self, topic: Option<&str>) -> Vec<Solution>;

    fn requirements_profile(&self) -> RequirementsProfile;

    /// First path whose solution type contains `solution_type`, else the first path.
    fn find_implementation_path(&self, solution_type: Option<&str>) -> ImplementationPath;
}
