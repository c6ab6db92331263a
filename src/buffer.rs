//! Placements accepted during the current tick but not yet committed.
//!
//! A drained stone stays in flight until the ledger holds it: it no longer
//! counts as pending, but it still occupies its point for later placements.

use std::collections::HashMap;

use crate::board::{Color, Point, Stone};
use crate::error::PlacementError;
use crate::ledger::GroupLedger;
use crate::legality;

#[derive(Debug, Default)]
pub struct PlacementBuffer {
    /// Accepted stones in acceptance order
    stones: Vec<Stone>,
    /// Drained stones the current tick is still committing
    in_flight: Vec<Point>,
    /// Pending and in-flight stones by point
    index: HashMap<Point, Color>,
}

impl PlacementBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending stones, not counting any in flight.
    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    pub fn color_at(&self, point: Point) -> Option<Color> {
        self.index.get(&point).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stone> {
        self.stones.iter()
    }

    /// Buffer `stone` if it is legal against the committed board plus
    /// everything already buffered or in flight. The first stone offered for a point wins
    /// the tick; later ones are `Occupied`.
    pub fn offer(&mut self, stone: Stone, ledger: &GroupLedger) -> Result<(), PlacementError> {
        legality::check(&stone, ledger, self)?;
        self.index.insert(stone.point, stone.color);
        self.stones.push(stone);
        Ok(())
    }

    /// Take the pending stones, in acceptance order. They stay in flight
    /// until [`settle`](Self::settle).
    pub fn drain(&mut self) -> Vec<Stone> {
        let stones = std::mem::take(&mut self.stones);
        self.in_flight.extend(stones.iter().map(|s| s.point));
        stones
    }

    /// Forget the stones in flight once the ledger has taken them over.
    pub fn settle(&mut self) {
        for p in self.in_flight.drain(..) {
            self.index.remove(&p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_writer_wins() {
        let ledger = GroupLedger::new();
        let mut buffer = PlacementBuffer::new();
        assert!(buffer.offer(Stone::new(0, 0, Color::Black, "alice"), &ledger).is_ok());
        assert_eq!(
            buffer.offer(Stone::new(0, 0, Color::White, "bob"), &ledger),
            Err(PlacementError::Occupied)
        );
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.color_at(Point::new(0, 0)), Some(Color::Black));
    }

    #[test]
    fn test_drain_keeps_order_and_empties() {
        let ledger = GroupLedger::new();
        let mut buffer = PlacementBuffer::new();
        for x in [3, 1, 2] {
            buffer.offer(Stone::new(x, 0, Color::Black, "alice"), &ledger).unwrap();
        }
        let drained: Vec<i64> = buffer.drain().iter().map(|s| s.point.x).collect();
        assert_eq!(drained, vec![3, 1, 2]);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
        buffer.settle();
        assert_eq!(buffer.color_at(Point::new(3, 0)), None);
    }

    #[test]
    fn test_in_flight_stones_still_occupy() {
        let ledger = GroupLedger::new();
        let mut buffer = PlacementBuffer::new();
        buffer.offer(Stone::new(0, 0, Color::Black, "alice"), &ledger).unwrap();
        assert_eq!(buffer.drain().len(), 1);

        assert_eq!(
            buffer.offer(Stone::new(0, 0, Color::White, "bob"), &ledger),
            Err(PlacementError::Occupied)
        );
        // Pending stones offered mid-commit survive the settle.
        buffer.offer(Stone::new(5, 5, Color::White, "bob"), &ledger).unwrap();
        buffer.settle();
        assert_eq!(buffer.color_at(Point::new(0, 0)), None);
        assert_eq!(buffer.color_at(Point::new(5, 5)), Some(Color::White));
        assert_eq!(buffer.len(), 1);
    }
}
