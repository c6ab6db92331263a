//! Changed-region tracking for viewport notifications.
//!
//! The board is cut into `R x R` squares. Every point placed or removed in a
//! tick marks its square; draining yields each marked square once, as an
//! inclusive rectangle.

use std::collections::{BTreeSet, HashSet};
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::board::{Point, Rect};

/// Index of a square bucket: `(floor(x / R), floor(y / R))`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Region {
    pub rx: i64,
    pub ry: i64,
}

impl Region {
    pub fn of(point: Point, size: i64) -> Self {
        Self {
            rx: point.x.div_euclid(size),
            ry: point.y.div_euclid(size),
        }
    }

    /// The square covered by this region, inclusive. Squares at the edge of
    /// the `i64` plane are clipped to it.
    pub fn bounds(self, size: i64) -> Rect {
        let edge = |r: i64, offset: i64| -> i64 {
            let v = i128::from(r) * i128::from(size) + i128::from(offset);
            v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
        };
        Rect::new(
            edge(self.rx, 0),
            edge(self.ry, 0),
            edge(self.rx, size - 1),
            edge(self.ry, size - 1),
        )
    }
}

#[derive(Debug, Clone)]
pub struct RegionTracker {
    size: i64,
    touched: HashSet<Region>,
}

impl RegionTracker {
    pub fn new(size: NonZeroU32) -> Self {
        Self {
            size: i64::from(size.get()),
            touched: HashSet::new(),
        }
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn region_of(&self, point: Point) -> Region {
        Region::of(point, self.size)
    }

    pub fn track(&mut self, point: Point) {
        self.touched.insert(self.region_of(point));
    }

    /// Every region touched since the last drain, then clear.
    pub fn drain(&mut self) -> BTreeSet<Rect> {
        let size = self.size;
        self.touched.drain().map(|r| r.bounds(size)).collect()
    }
}
