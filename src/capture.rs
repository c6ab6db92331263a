//! Capture resolution at the end of a tick.
//!
//! Only groups next to a stone placed this tick can have lost their last
//! liberty, so only those are examined. The board size never matters.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{Color, Point, Stone};
use crate::error::InvariantViolation;
use crate::ledger::GroupLedger;

/// A group taken off the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedGroup {
    /// Color of the captured stones
    pub color: Color,
    /// Former member positions, sorted
    pub points: Vec<Point>,
}

impl CapturedGroup {
    /// The side credited with the capture.
    pub fn captor(&self) -> Color {
        self.color.opponent()
    }
}

/// Remove every group left without liberties by `placed`.
///
/// Enemy groups next to each placement are examined first, in placement
/// order; each one found without liberties is removed from the ledger
/// completely before the next is looked at, so liberties it frees are seen
/// by later checks. Deleting the returned stones from the store is left to
/// the caller. The placed stones' own groups are examined last: a group
/// still without liberties at that point lost a same-tick exchange and is
/// removed too, so no liberty-less group survives the pass.
pub fn run(ledger: &mut GroupLedger, placed: &[Stone]) -> Result<Vec<CapturedGroup>, InvariantViolation> {
    let mut candidates: Vec<Point> = Vec::new();
    for stone in placed {
        let enemy = stone.color.opponent();
        candidates.extend(
            stone
                .point
                .neighbors()
                .filter(|&n| ledger.color_at(n) == Some(enemy)),
        );
    }
    candidates.extend(placed.iter().map(|s| s.point));

    let mut captured = Vec::new();
    for p in candidates {
        // Gone already if an earlier candidate shared its group.
        let Some(g) = ledger.group_id(p) else {
            continue;
        };
        if !ledger.group_liberties(g).is_empty() {
            continue;
        }
        let (Some(color), Some(members)) = (ledger.color_at(p), ledger.members(p)) else {
            continue;
        };
        let mut points: Vec<Point> = members.iter().copied().collect();
        points.sort();

        for &m in &points {
            ledger.remove(m)?;
        }
        debug!("captured {} {} stone(s) at {}", points.len(), color, points[0]);
        captured.push(CapturedGroup { color, points });
    }
    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: Color = Color::Black;
    const W: Color = Color::White;

    fn commit(ledger: &mut GroupLedger, stones: &[(i64, i64, Color)]) -> Vec<Stone> {
        let mut placed = Vec::new();
        for &(x, y, c) in stones {
            let s = Stone::new(x, y, c, "tester");
            ledger.add(&s).unwrap();
            placed.push(s);
        }
        placed
    }

    #[test]
    fn test_no_capture_when_liberties_remain() {
        let mut ledger = GroupLedger::new();
        let placed = commit(&mut ledger, &[(0, 0, B), (1, 0, W)]);
        let captured = run(&mut ledger, &placed).unwrap();
        assert!(captured.is_empty());
        assert_eq!(ledger.stone_count(), 2);
    }

    #[test]
    fn test_capture_single_stone_restores_liberties() {
        let mut ledger = GroupLedger::new();
        commit(&mut ledger, &[(0, 0, W), (-1, 0, B), (0, 1, B), (0, -1, B)]);
        let placed = commit(&mut ledger, &[(1, 0, B)]);
        let captured = run(&mut ledger, &placed).unwrap();

        assert_eq!(
            captured,
            vec![CapturedGroup { color: W, points: vec![Point::new(0, 0)] }]
        );
        assert_eq!(captured[0].captor(), B);
        assert_eq!(ledger.color_at(Point::new(0, 0)), None);
        for p in [(-1, 0), (0, 1), (0, -1), (1, 0)] {
            let libs = ledger.liberties(Point::new(p.0, p.1)).unwrap();
            assert!(libs.contains(&Point::new(0, 0)), "{p:?} should regain (0, 0)");
        }
        ledger.verify().unwrap();
    }

    #[test]
    fn test_capture_whole_group_once() {
        // Two-stone white group; the final black stone touches both members.
        let mut ledger = GroupLedger::new();
        commit(
            &mut ledger,
            &[(0, 0, W), (1, 0, W), (-1, 0, B), (2, 0, B), (0, 1, B), (0, -1, B), (1, -1, B)],
        );
        let placed = commit(&mut ledger, &[(1, 1, B)]);
        let captured = run(&mut ledger, &placed).unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].points, vec![Point::new(0, 0), Point::new(1, 0)]);
        assert_eq!(ledger.stone_count(), 6);
        ledger.verify().unwrap();
    }

    #[test]
    fn test_earlier_capture_saves_later_group() {
        // Black (0, 0) and white (1, 0) each end the tick with no liberties.
        // White's placement comes first, so black is captured and white lives.
        let mut ledger = GroupLedger::new();
        commit(&mut ledger, &[(0, 0, B), (0, 1, W), (0, -1, W), (1, 1, B), (1, -1, B), (2, 0, B)]);
        let placed = commit(&mut ledger, &[(-1, 0, W), (1, 0, W)]);
        let captured = run(&mut ledger, &placed).unwrap();
        assert_eq!(captured, vec![CapturedGroup { color: B, points: vec![Point::new(0, 0)] }]);
        assert_eq!(ledger.color_at(Point::new(1, 0)), Some(W));
        assert_eq!(
            *ledger.liberties(Point::new(1, 0)).unwrap(),
            [Point::new(0, 0)].into_iter().collect()
        );
        ledger.verify().unwrap();
    }

    #[test]
    fn test_later_placement_loses_the_exchange() {
        // Black (0, 0) was legal because it took white (1, 0)'s last
        // liberty. White (2, -1) goes first and captures black (2, 0), which
        // hands (1, 0) a fresh liberty, so black (0, 0) is the one left bare.
        let mut ledger = GroupLedger::new();
        commit(
            &mut ledger,
            &[
                (1, 0, W),
                (1, 1, B),
                (1, -1, B),
                (2, 0, B),
                (3, 0, W),
                (2, 1, W),
                (-1, 0, W),
                (0, 1, W),
                (0, -1, W),
            ],
        );
        let placed = commit(&mut ledger, &[(2, -1, W), (0, 0, B)]);
        let captured = run(&mut ledger, &placed).unwrap();

        assert_eq!(
            captured,
            vec![
                CapturedGroup { color: B, points: vec![Point::new(2, 0)] },
                CapturedGroup { color: B, points: vec![Point::new(0, 0)] },
            ]
        );
        assert!(captured.iter().all(|g| g.captor() == W));
        assert_eq!(ledger.color_at(Point::new(1, 0)), Some(W));
        assert_eq!(
            *ledger.liberties(Point::new(1, 0)).unwrap(),
            [Point::new(0, 0), Point::new(2, 0)].into_iter().collect()
        );
        ledger.verify().unwrap();
    }
}
