//! Serializable plan snapshot: the only contract with persistence.
//!
//! Species are referenced by pokedex number only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::arena::BreedTree;
use crate::domain::pokemon::{Gender, Nature};
use crate::domain::target::{BreedTarget, IvSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_cost_ignored: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSnapshot {
    pub ivs: IvSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<Nature>,
}

/// Position key (`"row,col"`) to node state.
pub type TreeSnapshot = BTreeMap<String, NodeSnapshot>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub breed_target: TargetSnapshot,
    pub breed_tree: TreeSnapshot,
}

impl PlanSnapshot {
    pub fn capture(target: &BreedTarget, tree: &BreedTree) -> Self {
        Self {
            breed_target: TargetSnapshot {
                ivs: target.ivs,
                nature: target.nature,
            },
            breed_tree: snapshot_tree(tree),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Pokedex number recorded for the root, if any.
    pub fn root_species(&self) -> Option<u32> {
        self.breed_tree.get("0,0").and_then(|node| node.species)
    }
}

/// Capture the mutable state of every node.
pub fn snapshot_tree(tree: &BreedTree) -> TreeSnapshot {
    tree.iter()
        .map(|node| {
            let entry = NodeSnapshot {
                species: node.species.as_ref().map(|s| s.number()),
                gender: node.gender,
                nickname: node.nickname.clone(),
                gender_cost_ignored: node.gender_cost_ignored.then_some(true),
            };
            (node.position().key(), entry)
        })
        .collect()
}
