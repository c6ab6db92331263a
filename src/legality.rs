//! Placement legality: the occupancy rule and the suicide rule.
//!
//! A candidate is judged against the committed board (the [`GroupLedger`])
//! overlaid with every stone already buffered this tick. Buffered stones are
//! not in the ledger yet, so groups on the overlay are explored as a mix of
//! whole committed groups and loose buffered stones. Committed groups are
//! never flood-filled; their liberty sets are read directly.

use std::collections::HashSet;

use crate::board::{Color, Point, Stone};
use crate::buffer::PlacementBuffer;
use crate::error::PlacementError;
use crate::ledger::{GroupId, GroupLedger};

/// Decide whether `candidate` may be placed. Pure; nothing is mutated.
///
/// # Errors
/// - [`PlacementError::Occupied`] if the point holds a committed or buffered stone
/// - [`PlacementError::Suicide`] if the stone's group (after joining every
///   connected friendly stone) would have no liberties and no neighbouring
///   enemy group would be left without liberties
pub fn check(
    candidate: &Stone,
    ledger: &GroupLedger,
    buffer: &PlacementBuffer,
) -> Result<(), PlacementError> {
    let p = candidate.point;
    if ledger.color_at(p).is_some() || buffer.color_at(p).is_some() {
        return Err(PlacementError::Occupied);
    }

    let board = Overlay {
        ledger,
        buffer,
        candidate,
    };
    if board.has_liberty(p) {
        return Ok(());
    }

    let enemy = candidate.color.opponent();
    let captures = p
        .neighbors()
        .into_iter()
        .any(|n| board.color_at(n) == Some(enemy) && !board.has_liberty(n));
    if captures {
        Ok(())
    } else {
        Err(PlacementError::Suicide)
    }
}

/// A piece of an overlay group.
#[derive(Debug, Clone, Copy)]
enum Node {
    /// A whole committed group
    Group(GroupId),
    /// A single stone not yet in the ledger
    Loose(Point),
}

/// Committed board + buffered stones + the candidate itself.
struct Overlay<'a> {
    ledger: &'a GroupLedger,
    buffer: &'a PlacementBuffer,
    candidate: &'a Stone,
}

impl Overlay<'_> {
    fn color_at(&self, p: Point) -> Option<Color> {
        if p == self.candidate.point {
            return Some(self.candidate.color);
        }
        self.ledger.color_at(p).or_else(|| self.buffer.color_at(p))
    }

    fn node(&self, p: Point) -> Node {
        match self.ledger.group_id(p) {
            Some(g) => Node::Group(g),
            None => Node::Loose(p),
        }
    }

    /// Whether the overlay group holding the stone at `start` borders at
    /// least one empty point.
    fn has_liberty(&self, start: Point) -> bool {
        let Some(color) = self.color_at(start) else {
            return true;
        };
        let mut groups: HashSet<GroupId> = HashSet::new();
        let mut loose: HashSet<Point> = HashSet::new();
        let mut stack = vec![self.node(start)];

        while let Some(node) = stack.pop() {
            match node {
                Node::Group(g) => {
                    if !groups.insert(g) {
                        continue;
                    }
                    // A committed liberty is either still empty or holds an
                    // uncommitted stone; friendly ones extend the group.
                    for &l in self.ledger.group_liberties(g) {
                        match self.color_at(l) {
                            None => return true,
                            Some(c) if c == color => stack.push(Node::Loose(l)),
                            _ => {}
                        }
                    }
                }
                Node::Loose(s) => {
                    if !loose.insert(s) {
                        continue;
                    }
                    for n in s.neighbors() {
                        match self.color_at(n) {
                            None => return true,
                            Some(c) if c == color => stack.push(self.node(n)),
                            _ => {}
                        }
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone(x: i64, y: i64, color: Color) -> Stone {
        Stone::new(x, y, color, "tester")
    }

    fn committed(stones: &[(i64, i64, Color)]) -> GroupLedger {
        let mut ledger = GroupLedger::new();
        for &(x, y, c) in stones {
            ledger.add(&stone(x, y, c)).unwrap();
        }
        ledger
    }

    const W: Color = Color::White;
    const B: Color = Color::Black;

    #[test]
    fn test_empty_board_is_legal() {
        let ledger = GroupLedger::new();
        let buffer = PlacementBuffer::new();
        assert_eq!(check(&stone(0, 0, B), &ledger, &buffer), Ok(()));
    }

    #[test]
    fn test_occupied_committed_and_buffered() {
        let ledger = committed(&[(1, 2, W)]);
        let mut buffer = PlacementBuffer::new();
        buffer.offer(stone(3, 4, W), &ledger).unwrap();
        assert_eq!(check(&stone(1, 2, B), &ledger, &buffer), Err(PlacementError::Occupied));
        assert_eq!(check(&stone(3, 4, B), &ledger, &buffer), Err(PlacementError::Occupied));
        assert_eq!(check(&stone(3, 4, W), &ledger, &buffer), Err(PlacementError::Occupied));
    }

    #[test]
    fn test_surrounded_point_is_suicide() {
        let ledger = committed(&[(-1, 0, W), (1, 0, W), (0, -1, W), (0, 1, W)]);
        let buffer = PlacementBuffer::new();
        assert_eq!(check(&stone(0, 0, B), &ledger, &buffer), Err(PlacementError::Suicide));
        // Filling your own eye is fine.
        assert_eq!(check(&stone(0, 0, W), &ledger, &buffer), Ok(()));
    }

    #[test]
    fn test_surrounded_by_buffered_stones_is_suicide() {
        let ledger = GroupLedger::new();
        let mut buffer = PlacementBuffer::new();
        for (x, y) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            buffer.offer(stone(x, y, W), &ledger).unwrap();
        }
        assert_eq!(check(&stone(0, 0, B), &ledger, &buffer), Err(PlacementError::Suicide));
    }

    #[test]
    fn test_capture_makes_zero_liberty_placement_legal() {
        // White (1, 0) is boxed in by black except for (0, 0).
        let ledger = committed(&[
            (-1, 0, W),
            (0, -1, W),
            (0, 1, W),
            (1, 0, W),
            (2, 0, B),
            (1, 1, B),
            (1, -1, B),
        ]);
        let buffer = PlacementBuffer::new();
        assert_eq!(check(&stone(0, 0, B), &ledger, &buffer), Ok(()));
    }

    #[test]
    fn test_suicide_sees_merged_group() {
        // Black (0, 0) sits in a white ring with one gap at (1, 0); a black
        // stone in the gap joins it, and the pair has no liberties left.
        let ledger = committed(&[
            (0, 0, B),
            (-1, 0, W),
            (0, 1, W),
            (0, -1, W),
            (1, 1, W),
            (1, -1, W),
            (2, 0, W),
        ]);
        let buffer = PlacementBuffer::new();
        assert_eq!(check(&stone(1, 0, B), &ledger, &buffer), Err(PlacementError::Suicide));
    }

    #[test]
    fn test_buffered_friend_lends_liberties() {
        // (0, 0) is enclosed on three sides; the fourth holds a buffered
        // black stone that still has open neighbours.
        let ledger = committed(&[(-1, 0, W), (0, 1, W), (0, -1, W)]);
        let mut buffer = PlacementBuffer::new();
        buffer.offer(stone(1, 0, B), &ledger).unwrap();
        assert_eq!(check(&stone(0, 0, B), &ledger, &buffer), Ok(()));
    }

    #[test]
    fn test_buffered_stone_fills_last_liberty() {
        // Committed black pair's only outside liberty gets a buffered white
        // stone; black then filling its own interior point is suicide.
        let ledger = committed(&[
            (0, 0, B),
            (-1, 0, W),
            (0, 1, W),
            (0, -1, W),
            (1, 1, W),
            (1, -1, W),
        ]);
        let mut buffer = PlacementBuffer::new();
        buffer.offer(stone(2, 0, W), &ledger).unwrap();
        assert_eq!(check(&stone(1, 0, B), &ledger, &buffer), Err(PlacementError::Suicide));
    }
}
