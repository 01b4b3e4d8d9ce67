// SPDX-License-Identifier: PMPL-1.0-or-later
//! Physical execution plans returned by the remote planner.

use serde::{Deserialize, Serialize};

use crate::decode::{impl_decode, null_as_default};

/// One node of a physical execution plan: the sentence generated for one
/// entity against one source, plus the sentences that depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryPlan {
    #[serde(deserialize_with = "null_as_default")]
    pub entity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dialect: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    /// Generated native sentence (SQL, MongoDB pipeline, ...).
    #[serde(deserialize_with = "null_as_default")]
    pub sentence: String,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<QueryPlan>,
}

impl QueryPlan {
    /// Number of sentences the plan executes, the root included.
    pub fn sentence_count(&self) -> usize {
        1 + self.children.iter().map(QueryPlan::sentence_count).sum::<usize>()
    }

    /// Distinct sources the plan touches, in first-seen pre-order.
    pub fn sources(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        self.collect_sources(&mut out);
        out
    }

    fn collect_sources<'a>(&'a self, out: &mut Vec<&'a str>) {
        if !out.contains(&self.source.as_str()) {
            out.push(&self.source);
        }
        for child in &self.children {
            child.collect_sources(out);
        }
    }
}

impl_decode!(QueryPlan);
