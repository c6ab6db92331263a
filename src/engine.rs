//! The engine facade: buffered placement and tick-by-tick commit.
//!
//! ## Locking
//!
//! - `store` is written by [`GobanEngine::process`] for the whole tick and
//!   read by [`GobanEngine::retrieve`], so readers never see a half-applied
//!   tick and ticks never overlap.
//! - `board` (ledger, region tracker, scores) is read by
//!   [`GobanEngine::place`] and written by `process` only while the tick's
//!   stones go into the ledger, which touches no storage. Store writes
//!   happen outside it, so placement keeps working during a commit.
//! - `buffer` is only held briefly: by `place` to offer one stone, by
//!   `process` to drain and settle.
//!
//! Lock order is `store` before `board` before `buffer`.
//!
//! While a tick is in flight its stones have left the pending buffer but are
//! not in the ledger yet. The buffer keeps them as in-flight stones until the
//! ledger holds them, so placements made during the commit are judged
//! against the last committed ledger plus those stones.

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::board::{Color, Point, Rect, Stone};
use crate::buffer::PlacementBuffer;
use crate::capture;
use crate::constants::DEFAULT_REGION_SIZE;
use crate::error::{EngineError, InvariantViolation, StoreError};
use crate::ledger::GroupLedger;
use crate::region::RegionTracker;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Side length of a notification region
    pub region_size: NonZeroU32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            region_size: NonZeroU32::new(DEFAULT_REGION_SIZE).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl EngineConfig {
    pub fn with_region_size(region_size: NonZeroU32) -> Self {
        Self { region_size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Committing,
}

/// A group removed during a tick, for scoring and notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureEvent {
    pub color: Color,
    pub points: Vec<Point>,
    /// Regions the group covered
    pub regions: BTreeSet<Rect>,
}

/// A buffered stone the store refused at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
    pub stone: Stone,
    pub error: StoreError,
}

/// Everything one call to [`GobanEngine::process`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Number of the tick (0 when nothing was pending)
    pub tick: u64,
    /// Stones committed, in acceptance order
    pub placed: Vec<Stone>,
    pub denied: Vec<Denial>,
    pub captures: Vec<CaptureEvent>,
    /// Every region where a stone appeared or disappeared
    pub regions: BTreeSet<Rect>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStats {
    pub ticks: u64,
    pub stones: usize,
    pub groups: usize,
    /// Stones captured by black
    pub black_captures: u64,
    /// Stones captured by white
    pub white_captures: u64,
}

/// Committed board state, guarded as one unit.
#[derive(Debug)]
struct Board {
    ledger: GroupLedger,
    regions: RegionTracker,
    ticks: u64,
    black_captures: u64,
    white_captures: u64,
}

impl Board {
    fn new(region_size: NonZeroU32) -> Self {
        Self {
            ledger: GroupLedger::new(),
            regions: RegionTracker::new(region_size),
            ticks: 0,
            black_captures: 0,
            white_captures: 0,
        }
    }

    fn credit(&mut self, captor: Color, stones: usize) {
        let count = stones as u64;
        match captor {
            Color::Black => self.black_captures += count,
            Color::White => self.white_captures += count,
        }
    }

    /// Put one tick's stored stones into the ledger and resolve captures.
    /// On failure the regions marked so far are dropped, so they never leak
    /// into a later report.
    fn apply(&mut self, placed: &[Stone]) -> Result<(Vec<CaptureEvent>, BTreeSet<Rect>), InvariantViolation> {
        let applied = self.resolve(placed);
        if applied.is_err() {
            self.regions.drain();
        }
        applied
    }

    fn resolve(&mut self, placed: &[Stone]) -> Result<(Vec<CaptureEvent>, BTreeSet<Rect>), InvariantViolation> {
        for stone in placed {
            self.ledger.add(stone)?;
            self.regions.track(stone.point);
        }

        let captured = capture::run(&mut self.ledger, placed)?;
        let size = self.regions.size();
        let mut captures = Vec::with_capacity(captured.len());
        for group in captured {
            let mut regions = BTreeSet::new();
            for &p in &group.points {
                self.regions.track(p);
                regions.insert(self.regions.region_of(p).bounds(size));
            }
            self.credit(group.captor(), group.points.len());
            captures.push(CaptureEvent {
                color: group.color,
                points: group.points,
                regions,
            });
        }
        Ok((captures, self.regions.drain()))
    }
}

/// Raises the committing flag and lowers it again when dropped, including
/// on early return or unwind.
struct CommitFlag<'a>(&'a AtomicBool);

impl<'a> CommitFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for CommitFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A shared, unbounded Go board.
///
/// Players call [`place`](Self::place) at any time; something outside the
/// engine decides when to call [`process`](Self::process) to commit what has
/// been buffered.
#[derive(Debug)]
pub struct GobanEngine<S> {
    board: RwLock<Board>,
    buffer: Mutex<PlacementBuffer>,
    store: RwLock<S>,
    committing: AtomicBool,
}

impl<S: Store> GobanEngine<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            board: RwLock::new(Board::new(config.region_size)),
            buffer: Mutex::new(PlacementBuffer::new()),
            store: RwLock::new(store),
            committing: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> EngineState {
        if self.committing.load(Ordering::Acquire) {
            EngineState::Committing
        } else {
            EngineState::Idle
        }
    }

    /// Admit a stone into the current tick. Does not wait for a tick that is
    /// writing to the store; during a commit the stone is judged against the
    /// last committed board plus the stones being committed.
    ///
    /// # Errors
    /// - [`EngineError::Illegal`] when the placement breaks the occupancy or
    ///   suicide rule; the stone is not buffered and not retried
    pub fn place(&self, stone: Stone) -> Result<(), EngineError> {
        let board = self.board.read()?;
        let mut buffer = self.buffer.lock()?;
        let point = stone.point;
        buffer.offer(stone, &board.ledger).inspect_err(|e| debug!("denied {point}: {e}"))?;
        Ok(())
    }

    /// Number of stones waiting for the next tick.
    pub fn pending(&self) -> Result<usize, EngineError> {
        Ok(self.buffer.lock()?.len())
    }

    /// Commit every buffered stone, resolve captures, and report what changed.
    ///
    /// A call with nothing buffered changes nothing and reports no regions.
    /// A stone the store refuses is reported in [`TickReport::denied`] and
    /// never reaches the ledger or the region report; the rest go ahead.
    ///
    /// # Errors
    /// - [`EngineError::Invariant`] if group bookkeeping breaks
    /// - [`EngineError::Storage`] if a captured stone cannot be deleted
    pub fn process(&self) -> Result<TickReport, EngineError> {
        let mut store = self.store.write()?;
        let stones = self.buffer.lock()?.drain();
        if stones.is_empty() {
            return Ok(TickReport::default());
        }
        let _flag = CommitFlag::raise(&self.committing);
        let tick = self.board.read()?.ticks + 1;

        let mut placed = Vec::with_capacity(stones.len());
        let mut denied = Vec::new();
        for stone in stones {
            match store.create(stone.clone()) {
                Ok(()) => placed.push(stone),
                Err(error) => {
                    warn!("tick {tick}: dropping {} stone at {}: {}", stone.color, stone.point, error);
                    denied.push(Denial { stone, error });
                }
            }
        }

        let (captures, regions) = {
            let mut board = self.board.write()?;
            board.ticks = tick;
            let applied = board.apply(&placed);
            self.buffer.lock()?.settle();
            applied.inspect_err(|e| error!("tick {tick}: {e}"))?
        };

        for event in &captures {
            for &p in &event.points {
                store
                    .delete_by_point(p)
                    .inspect_err(|e| error!("tick {tick}: captured stone left behind: {e}"))?;
            }
        }

        debug!(
            "tick {tick}: {} placed, {} denied, {} group(s) captured, {} region(s) changed",
            placed.len(),
            denied.len(),
            captures.len(),
            regions.len()
        );
        Ok(TickReport {
            tick,
            placed,
            denied,
            captures,
            regions,
        })
    }

    /// Committed stones inside `rect` (inclusive, corners in any order).
    pub fn retrieve(&self, rect: Rect) -> Result<Vec<Stone>, EngineError> {
        Ok(self.store.read()?.get_by_rect(rect)?)
    }

    /// Stones captured so far by `captor`.
    pub fn captures(&self, captor: Color) -> Result<u64, EngineError> {
        let board = self.board.read()?;
        Ok(match captor {
            Color::Black => board.black_captures,
            Color::White => board.white_captures,
        })
    }

    pub fn stats(&self) -> Result<BoardStats, EngineError> {
        let board = self.board.read()?;
        Ok(BoardStats {
            ticks: board.ticks,
            stones: board.ledger.stone_count(),
            groups: board.ledger.group_count(),
            black_captures: board.black_captures,
            white_captures: board.white_captures,
        })
    }

    /// Committed liberties of the group at `point`, sorted.
    pub fn liberties(&self, point: Point) -> Result<Option<Vec<Point>>, EngineError> {
        let board = self.board.read()?;
        Ok(board.ledger.liberties(point).map(|libs| {
            let mut v: Vec<Point> = libs.iter().copied().collect();
            v.sort();
            v
        }))
    }

    /// Cross-check the incremental group records against a flood fill.
    pub fn verify(&self) -> Result<(), EngineError> {
        Ok(self.board.read()?.ledger.verify()?)
    }
}
