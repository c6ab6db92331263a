//! Infinite Goban: a shared, unbounded Go board for many simultaneous players.
//!
//! Players buffer placements at any time; an outside scheduler commits them
//! in ticks. Each tick updates incremental group/liberty records, resolves
//! captures without scanning the whole board, and reports which square
//! regions changed so only interested viewers need to hear about it.
//!
//! ## Modules
//!
//! - [`board`] - Points, colors, stones and rectangles
//! - [`constants`] - Neighbour offsets and defaults
//! - [`error`] - Placement, storage and invariant errors
//! - [`store`] - Storage contract and an in-memory store
//! - [`ledger`] - Union-find groups with exact liberty sets
//! - [`legality`] - Occupancy and suicide rules
//! - [`buffer`] - Placements waiting for the next tick
//! - [`capture`] - End-of-tick capture resolution
//! - [`region`] - Changed-region tracking
//! - [`engine`] - The facade tying it together
//! - [`console`] - Line protocol front-end
//!
//! ## Example
//!
//! ```
//! use infinite_goban::board::{Color, Rect, Stone};
//! use infinite_goban::engine::{EngineConfig, GobanEngine};
//! use infinite_goban::store::MemoryStore;
//!
//! let engine = GobanEngine::new(MemoryStore::new(), EngineConfig::default());
//! engine.place(Stone::new(3, -4, Color::Black, "alice")).unwrap();
//!
//! let report = engine.process().unwrap();
//! assert_eq!(report.regions.len(), 1);
//! assert_eq!(engine.retrieve(Rect::new(0, 0, 5, -5)).unwrap().len(), 1);
//! ```

pub mod board;
pub mod buffer;
pub mod capture;
pub mod console;
pub mod constants;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod legality;
pub mod region;
pub mod store;
