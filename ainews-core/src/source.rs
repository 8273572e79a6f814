//! Configured news outlets surfaced to the front end

use serde::{Deserialize, Serialize};

/// Outlet shown in the source filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Matches `source.id` on stored articles
    pub id: String,
    pub name: String,
    pub category: String,
}

impl SourceInfo {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

/// Curated technology outlets offered as filters
pub fn configured_sources() -> Vec<SourceInfo> {
    vec![
        SourceInfo::new("techcrunch", "TechCrunch", "technology"),
        SourceInfo::new("wired", "Wired", "technology"),
        SourceInfo::new("the-verge", "The Verge", "technology"),
        SourceInfo::new("mit-technology-review", "MIT Technology Review", "technology"),
        SourceInfo::new("ars-technica", "Ars Technica", "technology"),
    ]
}
