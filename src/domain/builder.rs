//! Tree builder: lays out the breeding pyramid for a target and merges
//! previously entered node state back into it.

use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::arena::BreedTree;
use crate::domain::error::DomainError;
use crate::domain::node::TreeNode;
use crate::domain::pokemon::{BreederKind, SpeciesLookup};
use crate::domain::position::Position;
use crate::domain::reference::AssignmentTable;
use crate::domain::snapshot::TreeSnapshot;
use crate::domain::target::BreedTarget;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs breeding trees from a target and the last-row assignment table.
pub struct TreeBuilder<'a> {
    table: &'a AssignmentTable,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(table: &'a AssignmentTable) -> Self {
        Self { table }
    }

    /// Build a fresh tree for `target`.
    ///
    /// The root carries the target; last-row slots get one IV (or the
    /// nature) each from the assignment table; every row in between takes
    /// the union of its two sources.
    #[instrument(level = "debug", skip(self, target), fields(species = %target.species, ivs = target.iv_count()))]
    pub fn build(&self, target: &BreedTarget) -> TreeResult<BreedTree> {
        target.ivs.validate()?;
        let height = target.height()?;
        let layout = self.table.layout(target.iv_count(), target.is_natured())?;

        let mut nodes: BTreeMap<Position, TreeNode> = BTreeMap::new();

        let mut root = TreeNode::new(Position::ROOT, target.ivs.stats(), target.nature);
        root.species = Some(target.species.clone());
        nodes.insert(Position::ROOT, root);

        for (&position, &kind) in layout {
            let node = match kind {
                BreederKind::Nature => TreeNode::new(position, Vec::new(), target.nature),
                kind => {
                    let iv = target
                        .ivs
                        .get(kind)
                        .ok_or(DomainError::MissingTargetIv(kind))?;
                    TreeNode::new(position, vec![iv], None)
                }
            };
            trace!("last row {} -> {}", position, kind);
            nodes.insert(position, node);
        }

        // Row 0 already holds the target.
        for row in (1..height).rev() {
            for col in 0..Position::row_width(row) {
                let position = Position::new(row, col);
                let [first, second] = position.sources();
                let first = nodes
                    .get(&first)
                    .ok_or_else(|| DomainError::PositionNotInTree(first.key()))?;
                let second = nodes
                    .get(&second)
                    .ok_or_else(|| DomainError::PositionNotInTree(second.key()))?;

                let ivs = first
                    .ivs()
                    .iter()
                    .chain(second.ivs())
                    .copied()
                    .unique()
                    .collect();
                let nature = first.nature().or(second.nature());
                nodes.insert(position, TreeNode::new(position, ivs, nature));
            }
        }

        let tree = BreedTree::from_map(height, nodes)?;
        debug!("built tree of height {} with {} nodes", height, tree.len());
        Ok(tree)
    }

    /// Build a tree for `target` and merge a prior snapshot into it.
    pub fn build_with_snapshot(
        &self,
        target: &BreedTarget,
        snapshot: &TreeSnapshot,
        species: &dyn SpeciesLookup,
    ) -> TreeResult<BreedTree> {
        let mut tree = self.build(target)?;
        apply_snapshot(&mut tree, snapshot, species)?;
        Ok(tree)
    }
}

/// Merge snapshot entries into `tree`.
///
/// Species are assigned when their number resolves; nickname and gender
/// are always taken from the snapshot. Every key is validated before any
/// node is touched, so a bad snapshot leaves `tree` unchanged.
#[instrument(level = "debug", skip_all, fields(entries = snapshot.len()))]
pub fn apply_snapshot(
    tree: &mut BreedTree,
    snapshot: &TreeSnapshot,
    species: &dyn SpeciesLookup,
) -> TreeResult<()> {
    let mut entries = Vec::with_capacity(snapshot.len());
    for (key, entry) in snapshot {
        let position: Position = key.parse()?;
        if !tree.contains(position) {
            return Err(DomainError::PositionNotInTree(key.clone()));
        }
        entries.push((position, entry));
    }

    for (position, entry) in entries {
        let node = tree.node_mut(position)?;
        if let Some(resolved) = entry.species.and_then(|n| species.species_by_number(n)) {
            node.species = Some(resolved);
        } else if let Some(number) = entry.species {
            debug!("snapshot species #{} at {} not in roster, skipped", number, position);
        }
        node.nickname = entry.nickname.clone();
        node.gender = entry.gender;
        if let Some(ignored) = entry.gender_cost_ignored {
            node.gender_cost_ignored = ignored;
        }
    }
    Ok(())
}
