use std::collections::BTreeMap;

use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::node::TreeNode;
use crate::domain::position::Position;

/// Dense storage for every node of a breeding tree.
///
/// Nodes live in heap order (`Position::index`), so mate, offspring and
/// source lookups are index arithmetic. Rows `0..=height` are always
/// complete.
#[derive(Debug, Clone, PartialEq)]
pub struct BreedTree {
    nodes: Vec<TreeNode>,
    height: u32,
}

impl BreedTree {
    /// Assemble a tree from a position-keyed map. Every slot of rows
    /// `0..=height` must be present and nothing else may be.
    #[instrument(level = "trace", skip(nodes))]
    pub fn from_map(
        height: u32,
        mut nodes: BTreeMap<Position, TreeNode>,
    ) -> Result<Self, DomainError> {
        let mut dense = Vec::with_capacity(Self::capacity(height));
        for row in 0..=height {
            for col in 0..Position::row_width(row) {
                let position = Position::new(row, col);
                let node = nodes
                    .remove(&position)
                    .ok_or_else(|| DomainError::PositionNotInTree(position.key()))?;
                dense.push(node);
            }
        }
        if let Some(stray) = nodes.keys().next() {
            return Err(DomainError::PositionNotInTree(stray.key()));
        }
        Ok(Self {
            nodes: dense,
            height,
        })
    }

    fn capacity(height: u32) -> usize {
        (Position::row_width(height + 1) - 1) as usize
    }

    /// Index of the last row.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        position.is_valid() && position.row <= self.height
    }

    pub fn get(&self, position: Position) -> Option<&TreeNode> {
        if !self.contains(position) {
            return None;
        }
        self.nodes.get(position.index())
    }

    pub fn get_mut(&mut self, position: Position) -> Option<&mut TreeNode> {
        if !self.contains(position) {
            return None;
        }
        self.nodes.get_mut(position.index())
    }

    /// Like [`BreedTree::get`], failing for positions outside the tree.
    pub fn node(&self, position: Position) -> Result<&TreeNode, DomainError> {
        self.get(position)
            .ok_or_else(|| DomainError::PositionNotInTree(position.key()))
    }

    pub fn node_mut(&mut self, position: Position) -> Result<&mut TreeNode, DomainError> {
        self.get_mut(position)
            .ok_or_else(|| DomainError::PositionNotInTree(position.key()))
    }

    pub fn root(&self) -> &TreeNode {
        // from_map guarantees row 0 exists
        &self.nodes[0]
    }

    pub fn is_last_row(&self, position: Position) -> bool {
        position.row == self.height
    }

    /// Breeding partner of the node at `position`.
    pub fn mate(&self, position: Position) -> Option<&TreeNode> {
        position.mate().and_then(|p| self.get(p))
    }

    /// The slot the pair containing `position` breeds into.
    pub fn offspring(&self, position: Position) -> Option<&TreeNode> {
        position.offspring().and_then(|p| self.get(p))
    }

    /// Build-time sources of `position`; `None` on the last row.
    pub fn sources(&self, position: Position) -> Option<[&TreeNode; 2]> {
        let [first, second] = position.sources();
        Some([self.get(first)?, self.get(second)?])
    }

    /// All nodes, row by row from the root.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    pub fn row(&self, row: u32) -> impl Iterator<Item = &TreeNode> {
        self.nodes
            .iter()
            .filter(move |node| node.position().row == row)
    }

    /// Nodes on the last row.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> {
        self.row(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_map(height: u32) -> BTreeMap<Position, TreeNode> {
        (0..=height)
            .flat_map(|row| (0..Position::row_width(row)).map(move |col| Position::new(row, col)))
            .map(|p| (p, TreeNode::new(p, vec![], None)))
            .collect()
    }

    #[test]
    fn given_complete_map_when_assembling_then_every_position_resolves() {
        let tree = BreedTree::from_map(2, full_map(2)).unwrap();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.leaves().count(), 4);
        assert!(tree.get(Position::new(3, 0)).is_none());
        assert_eq!(
            tree.mate(Position::new(2, 3)).map(TreeNode::position),
            Some(Position::new(2, 2))
        );
        assert!(tree.mate(Position::ROOT).is_none());
    }

    #[test]
    fn given_map_with_hole_when_assembling_then_fails() {
        let mut map = full_map(2);
        map.remove(&Position::new(1, 1));
        let err = BreedTree::from_map(2, map).unwrap_err();
        assert_eq!(err, DomainError::PositionNotInTree("1,1".into()));
    }

    #[test]
    fn given_map_with_extra_row_when_assembling_then_fails() {
        let err = BreedTree::from_map(1, full_map(2)).unwrap_err();
        assert!(matches!(err, DomainError::PositionNotInTree(_)));
    }

    #[test]
    fn given_last_row_when_asking_sources_then_none() {
        let tree = BreedTree::from_map(1, full_map(1)).unwrap();
        assert!(tree.sources(Position::new(1, 0)).is_none());
        assert!(tree.sources(Position::ROOT).is_some());
    }
}
