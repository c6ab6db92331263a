//! Durable stone storage contract and an in-memory implementation.
//!
//! The engine treats the store as the single source of truth for committed
//! stones. It only ever needs three calls: create-if-free, a rectangular
//! range read, and delete-by-point.

use std::collections::BTreeMap;

use crate::board::{Point, Rect, Stone};
use crate::error::StoreError;

pub trait Store {
    /// Persist a stone. Fails with [`StoreError::Occupied`] if the point
    /// already has a row.
    fn create(&mut self, stone: Stone) -> Result<(), StoreError>;

    /// Every stone inside `rect`, inclusive on all four edges. The corners
    /// may be given in any order.
    fn get_by_rect(&self, rect: Rect) -> Result<Vec<Stone>, StoreError>;

    /// Remove the stone at `point`. Fails with [`StoreError::Missing`] if
    /// there is none.
    fn delete_by_point(&mut self, point: Point) -> Result<Stone, StoreError>;
}

/// A [`Store`] kept in process memory, ordered by `x` then `y` so a
/// rectangle read only walks the columns it covers.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: BTreeMap<Point, Stone>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, point: Point) -> Option<&Stone> {
        self.rows.get(&point)
    }
}

impl Store for MemoryStore {
    fn create(&mut self, stone: Stone) -> Result<(), StoreError> {
        if self.rows.contains_key(&stone.point) {
            return Err(StoreError::Occupied(stone.point));
        }
        self.rows.insert(stone.point, stone);
        Ok(())
    }

    fn get_by_rect(&self, rect: Rect) -> Result<Vec<Stone>, StoreError> {
        let r = rect.normalized();
        let lo = Point::new(r.x0, r.y0);
        let hi = Point::new(r.x1, r.y1);
        Ok(self
            .rows
            .range(lo..=hi)
            .filter(|(p, _)| p.y >= r.y0 && p.y <= r.y1)
            .map(|(_, s)| s.clone())
            .collect())
    }

    fn delete_by_point(&mut self, point: Point) -> Result<Stone, StoreError> {
        self.rows.remove(&point).ok_or(StoreError::Missing(point))
    }
}
