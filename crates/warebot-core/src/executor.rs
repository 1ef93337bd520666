//! Validates a single command end to end, then applies it.
//!
//! Every action runs its checks against a snapshot first; the store is only
//! written once all of them pass, so a failed command is a full no-op.

use crate::store::WorldStore;
use crate::world::{HeldItem, Item, Robot, RobotKind, RobotStatus, WorldState};
use log::debug;
use serde::Serialize;
use thiserror::Error;
use warebot_logic::command::{Action, CommandRequest, RobotSelector};
use warebot_logic::geometry::Vec3;
use warebot_logic::movement::Direction;
use warebot_logic::stacking;

/// Minimum Euclidean clearance between robots, in warehouse units.
pub const COLLISION_TOLERANCE: f64 = 2.0;

/// A rejected command. The message carries everything the caller may
/// surface; no partial mutation ever accompanies one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("robot must be one of: uav, ugv, arm")]
    UnknownRobot,
    #[error("direction must be one of: north, south, east, west")]
    InvalidDirection,
    #[error("Provide direction or absolute coordinates (x, z) for move.")]
    NoMoveTarget,
    #[error("{param} required for {action}.")]
    MissingParameter { param: &'static str, action: &'static str },
    #[error("Only the {robot} can {capability}.")]
    WrongRobot { robot: &'static str, capability: &'static str },
    #[error("Item '{item}' not found.")]
    ItemNotFound { item: String },
    #[error("Item '{item}' is on a stack. Use the arm to pick it from the stack.")]
    ItemOnStack { item: String },
    #[error("Item '{item}' is already held by {holder}. It must be released first.")]
    ItemAlreadyHeld { item: String, holder: String },
    #[error("{robot} is already holding '{item}'. Release it before taking another.")]
    AlreadyHolding { robot: &'static str, item: String },
    #[error("{robot} is not holding '{item}'.")]
    NotHolding { robot: &'static str, item: String },
    #[error("No items in stack '{stack}'.")]
    EmptyStack { stack: String },
    #[error(
        "Target position ({x}, {y}, {z}) is outside warehouse bounds \
         (0-{width} x 0-{depth} x 0-{height})."
    )]
    OutOfBounds { x: f64, y: f64, z: f64, width: f64, depth: f64, height: f64 },
    #[error("Would collide with {robot} at ({x}, {y}, {z}). Choose another position.")]
    Collision { robot: String, x: f64, y: f64, z: f64 },
}

/// Successful command result: the confirmation string plus the post-command
/// world, in the shape the HTTP layer returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOutcome {
    pub reply: String,
    pub robots: Vec<Robot>,
    pub items: Vec<Item>,
}

/// Execute a single warehouse command against the store.
pub fn execute(store: &WorldStore, req: &CommandRequest) -> Result<CommandOutcome, CommandError> {
    let state = store.snapshot();
    let robot = state
        .robot(req.robot.canonical_id())
        .ok_or(CommandError::UnknownRobot)?
        .clone();

    let reply = match req.action {
        Action::Move => run_move(store, &state, &robot, req)?,
        Action::Pick => run_pick(store, &state, &robot, req)?,
        Action::Drop => run_drop(store, &state, &robot, req)?,
        Action::PickFromStack => run_pick_from_stack(store, &state, &robot, req)?,
        Action::PlaceOnStack => run_place_on_stack(store, &state, &robot, req)?,
    };
    debug!("executed {} for {}: {}", req.action, robot.id, reply);

    let after = store.snapshot();
    Ok(CommandOutcome { reply, robots: after.robots, items: after.items })
}

fn ensure_in_bounds(state: &WorldState, p: Vec3) -> Result<(), CommandError> {
    if state.is_within_bounds(p) {
        return Ok(());
    }
    let b = state.warehouse;
    Err(CommandError::OutOfBounds {
        x: p.x,
        y: p.y,
        z: p.z,
        width: b.width,
        depth: b.depth,
        height: b.height,
    })
}

fn ensure_clear(state: &WorldState, robot_id: &str, p: Vec3) -> Result<(), CommandError> {
    match state.find_colliding_robot(robot_id, p, COLLISION_TOLERANCE) {
        Some(other) => Err(CommandError::Collision {
            robot: other.id.clone(),
            x: p.x,
            y: p.y,
            z: p.z,
        }),
        None => Ok(()),
    }
}

fn required<'a>(
    value: &'a Option<String>,
    param: &'static str,
    action: &'static str,
) -> Result<&'a str, CommandError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(CommandError::MissingParameter { param, action })
}

fn position_reply(robot_id: &str, p: Vec3) -> String {
    format!("{robot_id} moved to [{}, {}, {}]", p.x, p.y, p.z)
}

fn run_move(
    store: &WorldStore,
    state: &WorldState,
    robot: &Robot,
    req: &CommandRequest,
) -> Result<String, CommandError> {
    let current = robot.position;
    let target = match (req.x, req.z) {
        (Some(x), Some(z)) => {
            let y = req.y.unwrap_or_else(|| robot.kind.default_height(current.y));
            Vec3::new(x, y, z)
        }
        _ => {
            let raw = req.direction.as_deref().ok_or(CommandError::NoMoveTarget)?;
            let direction: Direction = raw.parse().map_err(|_| CommandError::InvalidDirection)?;
            let (dx, dz) = direction.offset();
            Vec3::new(
                current.x + dx,
                robot.kind.default_height(current.y),
                current.z + dz,
            )
        }
    };
    ensure_in_bounds(state, target)?;
    ensure_clear(state, &robot.id, target)?;

    store.update_robot_position(&robot.id, target);
    match &robot.held {
        Some(held) => {
            // The carried item travels with the robot; ground robots keep
            // it pinned to the floor.
            let item_pos = if robot.kind == RobotKind::Ground {
                Vec3::new(target.x, 0.0, target.z)
            } else {
                target
            };
            store.upsert_item(&held.item_id, item_pos, None);
            store.update_robot_status(&robot.id, RobotStatus::Working, Some(held.clone()));
        }
        None => {
            store.update_robot_status(&robot.id, RobotStatus::Idle, None);
        }
    }
    Ok(format!("{}.", position_reply(&robot.id, target)))
}

fn run_pick(
    store: &WorldStore,
    state: &WorldState,
    robot: &Robot,
    req: &CommandRequest,
) -> Result<String, CommandError> {
    if req.robot != RobotSelector::Ugv {
        return Err(CommandError::WrongRobot {
            robot: "UGV",
            capability: "pick items from the floor",
        });
    }
    let item_id = required(&req.item_id, "item_id", "pick")?;
    if let Some(held) = &robot.held {
        return Err(CommandError::AlreadyHolding { robot: "UGV", item: held.item_id.clone() });
    }
    let item = state
        .item(item_id)
        .ok_or_else(|| CommandError::ItemNotFound { item: item_id.to_string() })?;
    if item.stack_id.is_some() {
        return Err(CommandError::ItemOnStack { item: item_id.to_string() });
    }
    if let Some(holder) = state.holder_of(item_id) {
        if holder.id != robot.id {
            return Err(CommandError::ItemAlreadyHeld {
                item: item_id.to_string(),
                holder: holder.id.clone(),
            });
        }
    }

    // The robot teleports to the item's floor position.
    let target = Vec3::new(item.position.x, 0.0, item.position.z);
    store.update_robot_position(&robot.id, target);
    store.upsert_item(item_id, target, None);
    store.update_robot_status(&robot.id, RobotStatus::Working, Some(HeldItem::carrying(item_id)));
    Ok(format!("{}, picked {item_id}.", position_reply(&robot.id, target)))
}

fn run_drop(
    store: &WorldStore,
    state: &WorldState,
    robot: &Robot,
    req: &CommandRequest,
) -> Result<String, CommandError> {
    if req.robot != RobotSelector::Ugv {
        return Err(CommandError::WrongRobot { robot: "UGV", capability: "drop items" });
    }
    let item_id = required(&req.item_id, "item_id", "drop")?;
    let (x, z) = match (req.x, req.z) {
        (Some(x), Some(z)) => (x, z),
        _ => return Err(CommandError::MissingParameter { param: "x and z", action: "drop" }),
    };
    if robot.held_item_id() != Some(item_id) {
        return Err(CommandError::NotHolding { robot: "UGV", item: item_id.to_string() });
    }
    let target = Vec3::new(x, 0.0, z);
    ensure_in_bounds(state, target)?;
    ensure_clear(state, &robot.id, target)?;

    store.update_robot_position(&robot.id, target);
    store.upsert_item(item_id, target, None);
    store.update_robot_status(&robot.id, RobotStatus::Idle, None);
    Ok(format!("{}, dropped {item_id}.", position_reply(&robot.id, target)))
}

fn run_pick_from_stack(
    store: &WorldStore,
    state: &WorldState,
    robot: &Robot,
    req: &CommandRequest,
) -> Result<String, CommandError> {
    if req.robot != RobotSelector::Arm {
        return Err(CommandError::WrongRobot { robot: "arm", capability: "pick from a stack" });
    }
    let stack_id = required(&req.stack_id, "stack_id", "pick_from_stack")?;
    if let Some(held) = &robot.held {
        return Err(CommandError::AlreadyHolding { robot: "Arm", item: held.item_id.clone() });
    }
    // Top of the stack is the most recently inserted member.
    let top = state
        .stack_members(stack_id)
        .last()
        .map(|item| (*item).clone())
        .ok_or_else(|| CommandError::EmptyStack { stack: stack_id.to_string() })?;
    ensure_clear(state, &robot.id, top.position)?;

    store.update_robot_position(&robot.id, top.position);
    store.upsert_item(&top.id, top.position, None);
    store.update_robot_status(&robot.id, RobotStatus::Working, Some(HeldItem::holding(&top.id)));
    Ok(format!(
        "{}, picked {} from {stack_id}.",
        position_reply(&robot.id, top.position),
        top.id
    ))
}

fn run_place_on_stack(
    store: &WorldStore,
    state: &WorldState,
    robot: &Robot,
    req: &CommandRequest,
) -> Result<String, CommandError> {
    if req.robot != RobotSelector::Arm {
        return Err(CommandError::WrongRobot { robot: "arm", capability: "place on a stack" });
    }
    let stack_id = required(&req.stack_id, "stack_id", "place_on_stack")?;
    let item_id = required(&req.item_id, "item_id", "place_on_stack")?;
    if robot.held_item_id() != Some(item_id) {
        return Err(CommandError::NotHolding { robot: "Arm", item: item_id.to_string() });
    }
    let (base_x, base_z) = state.stack_base(stack_id);
    let y = stacking::next_placement_y(state.stack_height(stack_id));
    let target = Vec3::new(base_x, y, base_z);
    ensure_in_bounds(state, target)?;
    ensure_clear(state, &robot.id, target)?;

    store.update_robot_position(&robot.id, target);
    store.upsert_item(item_id, target, Some(stack_id.to_string()));
    store.update_robot_status(&robot.id, RobotStatus::Idle, None);
    Ok(format!(
        "{}, placed {item_id} on {stack_id}.",
        position_reply(&robot.id, target)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_req(robot: RobotSelector, direction: Direction) -> CommandRequest {
        CommandRequest::new(robot, Action::Move).with_direction(direction)
    }

    #[test]
    fn directional_move_steps_five_units() {
        let store = WorldStore::new();
        let out = execute(&store, &move_req(RobotSelector::Ugv, Direction::North)).unwrap();
        assert_eq!(out.reply, "ugv-1 moved to [5, 0, 0].");
        let state = store.snapshot();
        assert_eq!(state.robot("ugv-1").unwrap().position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn aerial_move_defaults_to_cruise_height() {
        let store = WorldStore::new();
        let req = CommandRequest::new(RobotSelector::Uav, Action::Move).with_target(20.0, 20.0);
        execute(&store, &req).unwrap();
        assert_eq!(
            store.snapshot().robot("uav-1").unwrap().position,
            Vec3::new(20.0, 5.0, 20.0)
        );
    }

    #[test]
    fn invalid_direction_is_rejected_without_mutation() {
        let store = WorldStore::new();
        let before = store.snapshot();
        let req = CommandRequest {
            direction: Some("up".into()),
            ..CommandRequest::new(RobotSelector::Uav, Action::Move)
        };
        let err = execute(&store, &req).unwrap_err();
        assert_eq!(err, CommandError::InvalidDirection);
        assert!(err.to_string().contains("north, south, east, west"));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn out_of_bounds_move_is_rejected_without_mutation() {
        let store = WorldStore::new();
        let before = store.snapshot();
        // ugv-1 starts at z=5; two steps north leave the warehouse.
        execute(&store, &move_req(RobotSelector::Ugv, Direction::North)).unwrap();
        let err = execute(&store, &move_req(RobotSelector::Ugv, Direction::North)).unwrap_err();
        assert!(matches!(err, CommandError::OutOfBounds { .. }));
        assert_ne!(store.snapshot(), before);
        assert_eq!(store.snapshot().robot("ugv-1").unwrap().position, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn move_into_another_robot_is_rejected() {
        let store = WorldStore::new();
        // Directly onto the UAV's hover position.
        let req = CommandRequest::new(RobotSelector::Ugv, Action::Move)
            .with_target(10.0, 5.0)
            .with_height(5.0);
        let err = execute(&store, &req).unwrap_err();
        assert!(matches!(err, CommandError::Collision { ref robot, .. } if robot == "uav-1"));
    }

    #[test]
    fn only_the_ground_robot_picks_from_the_floor() {
        let store = WorldStore::new();
        let req = CommandRequest::new(RobotSelector::Uav, Action::Pick).with_item("item-1");
        let err = execute(&store, &req).unwrap_err();
        assert!(matches!(err, CommandError::WrongRobot { .. }));
    }

    #[test]
    fn picking_a_stacked_item_from_the_floor_is_rejected() {
        let store = WorldStore::new();
        let req = CommandRequest::new(RobotSelector::Ugv, Action::Pick).with_item("item-3");
        let err = execute(&store, &req).unwrap_err();
        assert_eq!(err, CommandError::ItemOnStack { item: "item-3".into() });
    }

    #[test]
    fn carried_item_follows_a_moving_ground_robot_on_the_floor() {
        let store = WorldStore::new();
        let pick = CommandRequest::new(RobotSelector::Ugv, Action::Pick).with_item("item-1");
        execute(&store, &pick).unwrap();
        execute(&store, &move_req(RobotSelector::Ugv, Direction::South)).unwrap();

        let state = store.snapshot();
        let robot = state.robot("ugv-1").unwrap();
        let item = state.item("item-1").unwrap();
        assert_eq!(robot.position, Vec3::new(8.0, 0.0, 11.0));
        assert_eq!(item.position, robot.position);
        assert_eq!(robot.status, RobotStatus::Working);
        assert_eq!(robot.held_item_id(), Some("item-1"));
    }

    #[test]
    fn drop_requires_holding_the_named_item() {
        let store = WorldStore::new();
        let req = CommandRequest::new(RobotSelector::Ugv, Action::Drop)
            .with_item("item-1")
            .with_target(10.0, 5.0);
        let err = execute(&store, &req).unwrap_err();
        assert_eq!(err, CommandError::NotHolding { robot: "UGV", item: "item-1".into() });
    }

    #[test]
    fn missing_parameters_name_the_parameter_and_action() {
        let store = WorldStore::new();
        let err = execute(&store, &CommandRequest::new(RobotSelector::Ugv, Action::Pick))
            .unwrap_err();
        assert_eq!(err.to_string(), "item_id required for pick.");

        let err = execute(&store, &CommandRequest::new(RobotSelector::Uav, Action::Move))
            .unwrap_err();
        assert_eq!(err, CommandError::NoMoveTarget);
    }
}
