//! The single source of truth: mutex-guarded world state with deep-copy
//! snapshots and merge upserts.
//!
//! Every operation takes the process-wide lock for its own duration only.
//! The lock is never held across a whole command, so a read-validate-write
//! sequence in the executor is not atomic as a whole; a caller that needs
//! serialized commands must wrap the store in its own lock or queue.

use crate::world::{HeldItem, Item, Robot, RobotKind, RobotStatus, WorldState};
use std::sync::{Mutex, MutexGuard};
use warebot_logic::geometry::{Bounds, Vec3};

/// Three-state patch field. `Keep` leaves the current value untouched;
/// `Set` overwrites it, including setting an `Option` to `None`. The two
/// signals never collapse into one representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Field<T> {
    fn apply(self, slot: &mut T) {
        if let Field::Set(value) = self {
            *slot = value;
        }
    }

    fn take_or(self, default: T) -> T {
        match self {
            Field::Set(value) => value,
            Field::Keep => default,
        }
    }
}

/// Partial robot update for [`WorldStore::upsert_robot`].
#[derive(Debug, Clone, Default)]
pub struct RobotPatch {
    pub kind: Field<RobotKind>,
    pub position: Field<Vec3>,
    pub orientation: Field<Vec3>,
    pub status: Field<RobotStatus>,
    pub held: Field<Option<HeldItem>>,
}

impl RobotPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: RobotKind) -> Self {
        self.kind = Field::Set(kind);
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = Field::Set(position);
        self
    }

    pub fn orientation(mut self, orientation: Vec3) -> Self {
        self.orientation = Field::Set(orientation);
        self
    }

    pub fn status(mut self, status: RobotStatus) -> Self {
        self.status = Field::Set(status);
        self
    }

    /// Set the held item, where `None` explicitly clears it. Omitting this
    /// call leaves the held item unchanged.
    pub fn held(mut self, held: Option<HeldItem>) -> Self {
        self.held = Field::Set(held);
        self
    }
}

/// The canonical world state behind one process-wide mutex.
pub struct WorldStore {
    state: Mutex<WorldState>,
}

impl WorldStore {
    /// A store seeded with the fixed demo world.
    pub fn new() -> Self {
        Self::with_state(WorldState::seed())
    }

    pub fn with_state(state: WorldState) -> Self {
        Self { state: Mutex::new(state) }
    }

    fn lock(&self) -> MutexGuard<'_, WorldState> {
        self.state.lock().expect("world mutex poisoned")
    }

    /// A deep, independent copy of the whole world. Callers mutate the copy
    /// freely without affecting canonical state.
    pub fn snapshot(&self) -> WorldState {
        self.lock().clone()
    }

    /// Reset to the fixed seed state.
    pub fn reset(&self) {
        *self.lock() = WorldState::seed();
    }

    pub fn bounds(&self) -> Bounds {
        self.lock().warehouse
    }

    pub fn is_within_bounds(&self, p: Vec3) -> bool {
        self.lock().is_within_bounds(p)
    }

    /// Another robot whose Euclidean distance to `p` is below `tolerance`,
    /// if any. 2.0 units is the collision tolerance used by commands.
    pub fn find_colliding_robot(&self, exclude_id: &str, p: Vec3, tolerance: f64) -> Option<Robot> {
        self.lock().find_colliding_robot(exclude_id, p, tolerance).cloned()
    }

    /// Create or merge-update a robot. Absent fields keep their current
    /// value; a created robot defaults to an idle ground unit at the origin.
    pub fn upsert_robot(&self, id: &str, patch: RobotPatch) -> Robot {
        let mut state = self.lock();
        match state.robot_mut(id) {
            Some(robot) => {
                patch.kind.apply(&mut robot.kind);
                patch.position.apply(&mut robot.position);
                patch.orientation.apply(&mut robot.orientation);
                patch.status.apply(&mut robot.status);
                patch.held.apply(&mut robot.held);
                robot.clone()
            }
            None => {
                let robot = Robot {
                    id: id.to_string(),
                    kind: patch.kind.take_or(RobotKind::Ground),
                    position: patch.position.take_or(Vec3::ZERO),
                    orientation: patch.orientation.take_or(Vec3::ZERO),
                    status: patch.status.take_or(RobotStatus::Idle),
                    held: patch.held.take_or(None),
                };
                state.robots.push(robot.clone());
                robot
            }
        }
    }

    pub fn update_robot_position(&self, id: &str, position: Vec3) -> Robot {
        self.upsert_robot(id, RobotPatch::new().position(position))
    }

    pub fn update_robot_status(&self, id: &str, status: RobotStatus, held: Option<HeldItem>) -> Robot {
        self.upsert_robot(id, RobotPatch::new().status(status).held(held))
    }

    /// Create or overwrite an item's position and stack membership. New
    /// items are appended, which is what makes them the top of their stack.
    pub fn upsert_item(&self, id: &str, position: Vec3, stack_id: Option<String>) -> Item {
        let mut state = self.lock();
        if let Some(item) = state.items.iter_mut().find(|i| i.id == id) {
            item.position = position;
            item.stack_id = stack_id;
            return item.clone();
        }
        let item = Item { id: id.to_string(), position, stack_id };
        state.items.push(item.clone());
        item
    }

    /// Remove an item by id. Returns whether it existed.
    pub fn remove_item(&self, id: &str) -> bool {
        let mut state = self.lock();
        let before = state.items.len();
        state.items.retain(|i| i.id != id);
        state.items.len() < before
    }
}

impl Default for WorldStore {
    fn default() -> Self {
        Self::new()
    }
}
