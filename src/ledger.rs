//! Incremental group and liberty bookkeeping.
//!
//! Every committed stone belongs to exactly one group of same-colored,
//! orthogonally connected stones. Each group keeps the exact set of empty
//! points bordering it, so legality and capture can be decided without
//! flood-filling the board.
//!
//! Groups live in an arena indexed by [`GroupId`]. A stone records the id of
//! the group it joined; when groups merge, only the smaller record's
//! forwarding pointer changes and lookups follow (and compress) the chain to
//! the canonical record. Records of captured groups are recycled.

use std::collections::{HashMap, HashSet};

use crate::board::{Color, Point, Stone};
use crate::error::InvariantViolation;

/// Index of a group record in the ledger's arena.
pub type GroupId = usize;

#[derive(Debug, Clone, Copy)]
struct StoneEntry {
    color: Color,
    /// Group the stone joined; may forward to a newer canonical record.
    group: GroupId,
}

#[derive(Debug, Clone)]
struct GroupRecord {
    color: Color,
    /// Forwarding pointer. Equal to the record's own index when canonical.
    parent: GroupId,
    members: HashSet<Point>,
    liberties: HashSet<Point>,
    /// Records that forward (directly or not) to this one.
    absorbed: Vec<GroupId>,
}

impl GroupRecord {
    fn singleton(id: GroupId, color: Color, point: Point, liberties: HashSet<Point>) -> Self {
        Self {
            color,
            parent: id,
            members: HashSet::from([point]),
            liberties,
            absorbed: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct GroupLedger {
    stones: HashMap<Point, StoneEntry>,
    groups: Vec<GroupRecord>,
    free: Vec<GroupId>,
    live: usize,
}

impl GroupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.stones.len()
    }

    /// Number of groups on the board.
    pub fn group_count(&self) -> usize {
        self.live
    }

    pub fn color_at(&self, point: Point) -> Option<Color> {
        self.stones.get(&point).map(|e| e.color)
    }

    /// Canonical id of the group holding the stone at `point`.
    pub fn group_id(&self, point: Point) -> Option<GroupId> {
        self.stones.get(&point).map(|e| self.root(e.group))
    }

    /// Liberties of the group holding the stone at `point`.
    pub fn liberties(&self, point: Point) -> Option<&HashSet<Point>> {
        self.group_id(point).map(|g| &self.groups[g].liberties)
    }

    /// Stones of the group holding the stone at `point`.
    pub fn members(&self, point: Point) -> Option<&HashSet<Point>> {
        self.group_id(point).map(|g| &self.groups[g].members)
    }

    /// Liberties of a canonical group.
    pub fn group_liberties(&self, group: GroupId) -> &HashSet<Point> {
        &self.groups[group].liberties
    }

    /// Follow forwarding pointers without compressing them.
    fn root(&self, mut id: GroupId) -> GroupId {
        while self.groups[id].parent != id {
            id = self.groups[id].parent;
        }
        id
    }

    /// Follow forwarding pointers, pointing every record on the way straight
    /// at the canonical one.
    fn find(&mut self, id: GroupId) -> GroupId {
        let root = self.root(id);
        let mut cur = id;
        while self.groups[cur].parent != root && cur != root {
            let next = self.groups[cur].parent;
            self.groups[cur].parent = root;
            cur = next;
        }
        root
    }

    fn alloc(&mut self, color: Color, point: Point, liberties: HashSet<Point>) -> GroupId {
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.groups[id] = GroupRecord::singleton(id, color, point, liberties);
                id
            }
            None => {
                let id = self.groups.len();
                self.groups.push(GroupRecord::singleton(id, color, point, liberties));
                id
            }
        }
    }

    /// Merge two canonical groups; the one with more stones absorbs the other.
    fn union(&mut self, a: GroupId, b: GroupId) -> GroupId {
        if a == b {
            return a;
        }
        let (big, small) = if self.groups[a].members.len() >= self.groups[b].members.len() {
            (a, b)
        } else {
            (b, a)
        };
        let members = std::mem::take(&mut self.groups[small].members);
        let mut liberties = std::mem::take(&mut self.groups[small].liberties);
        let absorbed = std::mem::take(&mut self.groups[small].absorbed);
        self.groups[small].parent = big;

        let target = &mut self.groups[big];
        target.members.extend(members);
        if target.liberties.len() < liberties.len() {
            std::mem::swap(&mut target.liberties, &mut liberties);
        }
        target.liberties.extend(liberties);
        target.absorbed.push(small);
        target.absorbed.extend(absorbed);
        self.live -= 1;
        big
    }

    fn disband(&mut self, root: GroupId) {
        let absorbed = std::mem::take(&mut self.groups[root].absorbed);
        self.groups[root].liberties.clear();
        self.free.push(root);
        self.free.extend(absorbed);
        self.live -= 1;
    }

    /// Add a committed stone and return the canonical id of its group.
    ///
    /// Empty neighbours become liberties, same-colored neighbour groups are
    /// merged in, and the point is struck from every neighbouring group's
    /// liberties. A group touched on several sides is only counted once.
    pub fn add(&mut self, stone: &Stone) -> Result<GroupId, InvariantViolation> {
        let p = stone.point;
        if self.stones.contains_key(&p) {
            return Err(InvariantViolation::Occupied(p));
        }

        let mut empty = HashSet::with_capacity(4);
        let mut friends: Vec<GroupId> = Vec::with_capacity(4);
        let mut enemies: Vec<GroupId> = Vec::with_capacity(4);
        for n in p.neighbors() {
            match self.stones.get(&n).copied() {
                None => {
                    empty.insert(n);
                }
                Some(entry) => {
                    let root = self.find(entry.group);
                    let bucket = if entry.color == stone.color {
                        &mut friends
                    } else {
                        &mut enemies
                    };
                    if !bucket.contains(&root) {
                        bucket.push(root);
                    }
                }
            }
        }

        for &g in friends.iter().chain(&enemies) {
            if !self.groups[g].liberties.contains(&p) {
                return Err(InvariantViolation::MissingLiberty { group: g, point: p });
            }
        }
        for &g in friends.iter().chain(&enemies) {
            self.groups[g].liberties.remove(&p);
        }

        let id = self.alloc(stone.color, p, empty);
        self.stones.insert(p, StoneEntry { color: stone.color, group: id });
        let mut root = id;
        for g in friends {
            root = self.union(root, g);
        }
        Ok(root)
    }

    /// Take the stone at `point` off the board and return its color.
    ///
    /// The point becomes a liberty of every opposing group next to it. Only
    /// whole groups are removed (one member at a time), so the stone's own
    /// group is never split; it is disbanded once its last member goes.
    pub fn remove(&mut self, point: Point) -> Result<Color, InvariantViolation> {
        let entry = self
            .stones
            .remove(&point)
            .ok_or(InvariantViolation::UnknownStone(point))?;
        let root = self.find(entry.group);
        self.groups[root].members.remove(&point);
        if self.groups[root].members.is_empty() {
            self.disband(root);
        }

        for n in point.neighbors() {
            if let Some(neighbor) = self.stones.get(&n).copied() {
                if neighbor.color != entry.color {
                    let g = self.find(neighbor.group);
                    self.groups[g].liberties.insert(point);
                }
            }
        }
        Ok(entry.color)
    }

    /// Recompute every group by flood fill and compare with the incremental
    /// records.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let mut seen: HashSet<Point> = HashSet::with_capacity(self.stones.len());
        let mut groups = 0;
        for (&start, entry) in &self.stones {
            if seen.contains(&start) {
                continue;
            }
            groups += 1;
            let root = self.root(entry.group);
            let mut members = HashSet::new();
            let mut liberties = HashSet::new();
            let mut stack = vec![start];
            while let Some(p) = stack.pop() {
                if !members.insert(p) {
                    continue;
                }
                for n in p.neighbors() {
                    match self.stones.get(&n) {
                        None => {
                            liberties.insert(n);
                        }
                        Some(e) if e.color == entry.color && !members.contains(&n) => stack.push(n),
                        _ => {}
                    }
                }
            }

            let record = &self.groups[root];
            if record.color != entry.color
                || record.members != members
                || members.iter().any(|m| self.root(self.stones[m].group) != root)
            {
                return Err(InvariantViolation::MembershipMismatch { group: root });
            }
            if record.liberties != liberties {
                return Err(InvariantViolation::LibertyMismatch { group: root });
            }
            seen.extend(members);
        }
        if groups != self.live {
            return Err(InvariantViolation::MembershipMismatch { group: self.groups.len() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone(x: i64, y: i64, color: Color) -> Stone {
        Stone::new(x, y, color, "tester")
    }

    fn set(points: &[(i64, i64)]) -> HashSet<Point> {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_single_stone_has_four_liberties() {
        let mut ledger = GroupLedger::new();
        ledger.add(&stone(0, 0, Color::Black)).unwrap();
        let libs = ledger.liberties(Point::new(0, 0)).unwrap();
        assert_eq!(*libs, set(&[(1, 0), (-1, 0), (0, 1), (0, -1)]));
        assert_eq!(ledger.group_count(), 1);
        ledger.verify().unwrap();
    }

    #[test]
    fn test_bridge_merges_liberties() {
        let mut ledger = GroupLedger::new();
        ledger.add(&stone(0, 0, Color::Black)).unwrap();
        ledger.add(&stone(2, 0, Color::Black)).unwrap();
        let a = ledger.liberties(Point::new(0, 0)).unwrap().clone();
        let b = ledger.liberties(Point::new(2, 0)).unwrap().clone();

        let g = ledger.add(&stone(1, 0, Color::Black)).unwrap();
        let mut expected: HashSet<Point> = a.union(&b).copied().collect();
        expected.remove(&Point::new(1, 0));
        // (1, 1) and (1, -1) are new liberties contributed by the bridge.
        expected.insert(Point::new(1, 1));
        expected.insert(Point::new(1, -1));
        assert_eq!(*ledger.group_liberties(g), expected);
        assert_eq!(ledger.group_count(), 1);
        assert_eq!(ledger.members(Point::new(0, 0)).unwrap().len(), 3);
        ledger.verify().unwrap();
    }

    #[test]
    fn test_touching_one_group_twice_counts_once() {
        let mut ledger = GroupLedger::new();
        for (x, y) in [(0, 0), (1, 0), (1, 1)] {
            ledger.add(&stone(x, y, Color::White)).unwrap();
        }
        // (0, 1) borders (0, 0) and (1, 1), both in the same group.
        ledger.add(&stone(0, 1, Color::White)).unwrap();
        assert_eq!(ledger.group_count(), 1);
        assert_eq!(ledger.members(Point::new(0, 1)).unwrap().len(), 4);
        assert_eq!(ledger.liberties(Point::new(0, 1)).unwrap().len(), 8);
        ledger.verify().unwrap();
    }

    #[test]
    fn test_opponent_stone_takes_liberty() {
        let mut ledger = GroupLedger::new();
        ledger.add(&stone(0, 0, Color::Black)).unwrap();
        ledger.add(&stone(1, 0, Color::White)).unwrap();
        assert!(!ledger.liberties(Point::new(0, 0)).unwrap().contains(&Point::new(1, 0)));
        assert_eq!(ledger.liberties(Point::new(0, 0)).unwrap().len(), 3);
        assert_eq!(ledger.liberties(Point::new(1, 0)).unwrap().len(), 3);
        ledger.verify().unwrap();
    }

    #[test]
    fn test_remove_restores_opponent_liberties() {
        let mut ledger = GroupLedger::new();
        ledger.add(&stone(0, 0, Color::Black)).unwrap();
        ledger.add(&stone(1, 0, Color::White)).unwrap();
        assert_eq!(ledger.remove(Point::new(1, 0)), Ok(Color::White));
        assert!(ledger.liberties(Point::new(0, 0)).unwrap().contains(&Point::new(1, 0)));
        assert_eq!(ledger.group_count(), 1);
        assert_eq!(ledger.color_at(Point::new(1, 0)), None);
        ledger.verify().unwrap();
    }

    #[test]
    fn test_add_on_occupied_point_is_an_invariant_violation() {
        let mut ledger = GroupLedger::new();
        ledger.add(&stone(5, 5, Color::Black)).unwrap();
        assert_eq!(
            ledger.add(&stone(5, 5, Color::White)),
            Err(InvariantViolation::Occupied(Point::new(5, 5)))
        );
        assert_eq!(
            ledger.remove(Point::new(9, 9)),
            Err(InvariantViolation::UnknownStone(Point::new(9, 9)))
        );
    }

    #[test]
    fn test_captured_records_are_recycled() {
        let mut ledger = GroupLedger::new();
        ledger.add(&stone(0, 0, Color::Black)).unwrap();
        ledger.add(&stone(0, 1, Color::Black)).unwrap();
        ledger.remove(Point::new(0, 0)).unwrap();
        ledger.remove(Point::new(0, 1)).unwrap();
        assert_eq!(ledger.group_count(), 0);
        let arena = ledger.groups.len();
        ledger.add(&stone(7, 7, Color::White)).unwrap();
        ledger.add(&stone(9, 9, Color::White)).unwrap();
        assert_eq!(ledger.groups.len(), arena);
        ledger.verify().unwrap();
    }

    #[test]
    fn test_long_chain_compresses_paths() {
        let mut ledger = GroupLedger::new();
        for x in 0..50 {
            ledger.add(&stone(x, 0, Color::Black)).unwrap();
        }
        assert_eq!(ledger.group_count(), 1);
        let g = ledger.group_id(Point::new(0, 0)).unwrap();
        assert!((0..50).all(|x| ledger.group_id(Point::new(x, 0)) == Some(g)));
        assert_eq!(ledger.group_liberties(g).len(), 102);
        ledger.verify().unwrap();
    }
}
