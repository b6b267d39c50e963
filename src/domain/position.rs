//! Coordinates of a slot in the breeding tree.
//!
//! Row 0 holds the target; row `r` holds `2^r` slots. All relationships
//! between slots are derived from coordinates, never stored.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// A `(row, col)` slot with `col < 2^row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

impl Position {
    pub const ROOT: Position = Position { row: 0, col: 0 };

    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Number of slots in `row`.
    pub fn row_width(row: u32) -> u32 {
        1 << row
    }

    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }

    /// Whether the coordinates describe a slot of a binary tree at all.
    pub fn is_valid(&self) -> bool {
        self.row < 31 && self.col < Self::row_width(self.row)
    }

    /// Dense index of this slot in a heap-ordered array (root = 0).
    pub fn index(&self) -> usize {
        (Self::row_width(self.row) - 1 + self.col) as usize
    }

    /// Canonical `"row,col"` key used by snapshots.
    pub fn key(&self) -> String {
        format!("{},{}", self.row, self.col)
    }

    /// The breeding partner sharing this row. `None` for the root.
    pub fn mate(&self) -> Option<Position> {
        let mate = Position::new(self.row, self.col ^ 1);
        mate.is_valid().then_some(mate)
    }

    /// The slot that the pair containing `self` breeds into.
    pub fn offspring(&self) -> Option<Position> {
        (self.row > 0).then(|| Position::new(self.row - 1, self.col / 2))
    }

    /// The two slots whose IVs and nature flow into this one at build time.
    pub fn sources(&self) -> [Position; 2] {
        let row = self.row + 1;
        [Position::new(row, self.col * 2), Position::new(row, self.col * 2 + 1)]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = DomainError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidPositionKey(key.to_string());
        let (row, col) = key.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse::<u32>().map_err(|_| invalid())?;
        let col = col.trim().parse::<u32>().map_err(|_| invalid())?;
        let position = Position::new(row, col);
        if !position.is_valid() {
            return Err(invalid());
        }
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_key_when_parsing_then_round_trips() {
        let position: Position = "3,5".parse().unwrap();
        assert_eq!(position, Position::new(3, 5));
        assert_eq!(position.key(), "3,5");
    }

    #[test]
    fn given_malformed_key_when_parsing_then_fails() {
        assert!("3".parse::<Position>().is_err());
        assert!("a,b".parse::<Position>().is_err());
        assert!("1,2".parse::<Position>().is_err());
    }

    #[test]
    fn given_root_when_asking_relationships_then_has_no_mate_or_offspring() {
        assert_eq!(Position::ROOT.mate(), None);
        assert_eq!(Position::ROOT.offspring(), None);
        assert_eq!(
            Position::ROOT.sources(),
            [Position::new(1, 0), Position::new(1, 1)]
        );
    }

    #[test]
    fn given_slot_when_asking_relationships_then_uses_index_arithmetic() {
        let p = Position::new(3, 5);
        assert_eq!(p.mate(), Some(Position::new(3, 4)));
        assert_eq!(p.offspring(), Some(Position::new(2, 2)));
        assert_eq!(p.sources(), [Position::new(4, 10), Position::new(4, 11)]);
    }

    #[test]
    fn given_rows_when_indexing_then_indices_are_dense() {
        let indices: Vec<usize> = (0..3)
            .flat_map(|row| (0..Position::row_width(row)).map(move |col| Position::new(row, col)))
            .map(|p| p.index())
            .collect();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
    }
}
