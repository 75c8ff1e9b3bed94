//! Coupling metrics
//!
//! Fan-in and fan-out per file over the final relationship set. Only edges
//! crossing a file boundary count.

use crate::relationship::Relationship;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Afferent/efferent coupling of one file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CouplingMetrics {
    /// Files depending on this file
    pub afferent: usize,
    /// Files this file depends on
    pub efferent: usize,
    /// efferent / (afferent + efferent), 0 for isolated files
    pub instability: f64,
    pub dependents: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Instability: 0 is maximally stable, 1 maximally unstable
pub fn calculate_instability(afferent: usize, efferent: usize) -> f64 {
    let total = afferent + efferent;
    if total > 0 {
        efferent as f64 / total as f64
    } else {
        0.0
    }
}

/// Compute coupling for every file that appears in a relationship
pub fn compute<'a>(
    relationships: impl IntoIterator<Item = &'a Relationship>,
) -> BTreeMap<String, CouplingMetrics> {
    let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut dependencies: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for relationship in relationships {
        if !relationship.is_cross_file() {
            continue;
        }
        let from = relationship.from_file.as_str();
        let to = relationship.to_file.as_str();
        dependencies.entry(from).or_default().insert(to);
        dependents.entry(to).or_default().insert(from);
    }

    let files: BTreeSet<&str> = dependents.keys().chain(dependencies.keys()).copied().collect();

    files
        .into_iter()
        .map(|file| {
            let incoming: Vec<String> = dependents
                .get(file)
                .map(|set| set.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default();
            let outgoing: Vec<String> = dependencies
                .get(file)
                .map(|set| set.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default();

            let metrics = CouplingMetrics {
                afferent: incoming.len(),
                efferent: outgoing.len(),
                instability: calculate_instability(incoming.len(), outgoing.len()),
                dependents: incoming,
                dependencies: outgoing,
            };
            (file.to_string(), metrics)
        })
        .collect()
}
