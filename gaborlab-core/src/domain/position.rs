//! Grid position — a cell in the 3×3 stimulus array.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell in the 3×3 grid, numbered row-major:
///
/// ```text
/// (1,2,3)
/// (4,5,6)
/// (7,8,9)
/// ```
///
/// Cell 5 is the display centre; the other eight sit on a ring of radius
/// 2° of visual angle around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GridPosition(u8);

impl GridPosition {
    /// All nine cells in row-major order.
    pub const ALL: [GridPosition; 9] = [
        GridPosition(1),
        GridPosition(2),
        GridPosition(3),
        GridPosition(4),
        GridPosition(5),
        GridPosition(6),
        GridPosition(7),
        GridPosition(8),
        GridPosition(9),
    ];

    /// The centre cell.
    pub const CENTER: GridPosition = GridPosition(5);

    pub fn new(index: u8) -> Result<Self, DomainError> {
        if (1..=9).contains(&index) {
            Ok(Self(index))
        } else {
            Err(DomainError::InvalidPosition(index))
        }
    }

    /// The 1-based cell number.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Degrees-of-visual-angle offset of this cell from the display centre.
    ///
    /// The eight outer cells lie on a radius-2 ring; diagonal cells sit at
    /// ±2/√2 on each axis.
    pub fn coordinates(self) -> (f64, f64) {
        match self.0 {
            1 => (-1.4142, 1.4142),
            2 => (0.0, 2.0),
            3 => (1.4142, 1.4142),
            4 => (-2.0, 0.0),
            5 => (0.0, 0.0),
            6 => (2.0, 0.0),
            7 => (-1.4142, -1.4142),
            8 => (0.0, -2.0),
            _ => (1.4142, -1.4142),
        }
    }

    /// The other eight cells in cyclic row-major order, starting at the
    /// successor of this cell and wrapping 9 → 1.
    ///
    /// This is the order flanker offsets are dealt in: for cell 5 it yields
    /// 6, 7, 8, 9, 1, 2, 3, 4.
    pub fn cyclic_walk(self) -> impl Iterator<Item = GridPosition> {
        let start = self.0;
        (1..=8u8).map(move |k| GridPosition((start - 1 + k) % 9 + 1))
    }
}

impl TryFrom<u8> for GridPosition {
    type Error = DomainError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<GridPosition> for u8 {
    fn from(pos: GridPosition) -> u8 {
        pos.0
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(GridPosition::new(0), Err(DomainError::InvalidPosition(0)));
        assert_eq!(GridPosition::new(10), Err(DomainError::InvalidPosition(10)));
        assert!(GridPosition::new(1).is_ok());
        assert!(GridPosition::new(9).is_ok());
    }

    #[test]
    fn cyclic_walk_from_center() {
        let walk: Vec<u8> = GridPosition::CENTER.cyclic_walk().map(|p| p.index()).collect();
        assert_eq!(walk, vec![6, 7, 8, 9, 1, 2, 3, 4]);
    }

    #[test]
    fn cyclic_walk_wraps_from_nine() {
        let walk: Vec<u8> = GridPosition::new(9)
            .unwrap()
            .cyclic_walk()
            .map(|p| p.index())
            .collect();
        assert_eq!(walk, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn walk_covers_all_other_cells() {
        for pos in GridPosition::ALL {
            let mut seen: Vec<u8> = pos.cyclic_walk().map(|p| p.index()).collect();
            seen.sort_unstable();
            let expected: Vec<u8> = (1..=9).filter(|&i| i != pos.index()).collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn center_is_origin() {
        assert_eq!(GridPosition::CENTER.coordinates(), (0.0, 0.0));
    }

    #[test]
    fn outer_cells_on_radius_two_ring() {
        for pos in GridPosition::ALL {
            if pos == GridPosition::CENTER {
                continue;
            }
            let (x, y) = pos.coordinates();
            let r = (x * x + y * y).sqrt();
            assert!((r - 2.0).abs() < 1e-3, "cell {pos} at radius {r}");
        }
    }

    #[test]
    fn serde_roundtrip_via_index() {
        let pos = GridPosition::new(7).unwrap();
        let json = serde_json::to_string(&pos).unwrap();
        assert_eq!(json, "7");
        let back: GridPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pos);
    }

    #[test]
    fn serde_rejects_invalid_index() {
        assert!(serde_json::from_str::<GridPosition>("0").is_err());
        assert!(serde_json::from_str::<GridPosition>("12").is_err());
    }
}
