//! Warebot Core - Warehouse Simulation Core
//!
//! Authoritative world state for a small multi-robot warehouse (one aerial
//! unit, one ground unit, one stationary arm), mutated only through
//! validated commands and double-checked by an independent post-condition
//! verifier.
//!
//! # Architecture
//!
//! - [`world`]: plain-data model of robots, items, and bounds
//! - [`store`]: the mutex-guarded single source of truth with deep-copy
//!   snapshots and merge upserts
//! - [`executor`]: validates one command end to end, then applies it
//! - [`verify`]: independently checks that a command's expected invariant
//!   changes actually happened between two snapshots
//! - [`supervisor`]: the deterministic reconciliation loop that re-executes
//!   a parsed command when verification disagrees with an agent's narrative
//!
//! # Example
//!
//! ```rust
//! use warebot_core::prelude::*;
//! use warebot_logic::command::{Action, CommandRequest, RobotSelector};
//!
//! let store = WorldStore::new();
//! let req = CommandRequest::new(RobotSelector::Ugv, Action::Pick).with_item("item-1");
//! let outcome = execute(&store, &req).unwrap();
//! assert!(outcome.reply.contains("picked item-1"));
//! ```

pub mod executor;
pub mod store;
pub mod supervisor;
pub mod verify;
pub mod world;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::executor::{execute, CommandError, CommandOutcome};
    pub use crate::store::{Field, RobotPatch, WorldStore};
    pub use crate::supervisor::{looks_like_robot_command, reconcile, Reconciliation};
    pub use crate::verify::{verify_after, Verdict};
    pub use crate::world::{Grip, HeldItem, Item, Robot, RobotKind, RobotStatus, WorldState};
}
