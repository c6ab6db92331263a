//! Value types shared by every component: points, colors, stones and
//! rectangles on the unbounded board.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::constants::ORTHOGONAL;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Parse `black`/`white` (or `b`/`w`), ignoring case.
    pub fn parse(s: &str) -> Option<Color> {
        match s.to_ascii_lowercase().as_str() {
            "black" | "b" => Some(Color::Black),
            "white" | "w" => Some(Color::White),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// A position on the board. Ordered by `x` first, then `y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The orthogonal neighbours (E, W, N, S). A point on the edge of the
    /// `i64` plane has fewer than four.
    #[inline]
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        ORTHOGONAL.into_iter().filter_map(move |(dx, dy)| {
            Some(Point::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stone {
    pub point: Point,
    pub color: Color,
    /// Name of the player who placed the stone.
    pub owner: String,
    pub placed_at: SystemTime,
}

impl Stone {
    pub fn new(x: i64, y: i64, color: Color, owner: impl Into<String>) -> Self {
        Self {
            point: Point::new(x, y),
            color,
            owner: owner.into(),
            placed_at: SystemTime::now(),
        }
    }
}

/// An axis-aligned rectangle, inclusive on all four edges.
///
/// Corners may be given in any order; [`Rect::normalized`] puts the minimum
/// corner first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl Rect {
    pub const fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn normalized(self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        let r = self.normalized();
        p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]-[{}, {}]", self.x0, self.y0, self.x1, self.y1)
    }
}
