//! Independent post-condition verification.
//!
//! Given the command parameters and snapshots from before and after, these
//! checks confirm the expected invariant changes actually happened. They are
//! deliberately independent of the executor so they can judge state produced
//! by any actor, including an agent that bypassed the executor entirely.

use crate::world::{Grip, Robot, WorldState};
use warebot_logic::command::{Action, CommandRequest};
use warebot_logic::geometry::{Vec3, POSITION_TOLERANCE};
use warebot_logic::movement::Direction;

/// Verification result. Failures carry the expectation that did not hold;
/// they are never raised as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail(String),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail(reason) => Some(reason),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Verdict::Fail(reason.into())
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= POSITION_TOLERANCE
}

/// Check that `post` is consistent with `req` having been applied to `pre`.
pub fn verify_after(req: &CommandRequest, pre: &WorldState, post: &WorldState) -> Verdict {
    let robot_id = req.robot.canonical_id();
    let Some(robot) = post.robot(robot_id) else {
        return Verdict::fail(format!("robot {robot_id} not in post state"));
    };
    let prev_pos = pre.robot(robot_id).map(|r| r.position);

    match req.action {
        Action::Move => verify_move(req, post, robot, prev_pos),
        Action::Pick => verify_pick(req, post, robot),
        Action::Drop => verify_drop(req, post, robot),
        Action::PickFromStack => verify_pick_from_stack(post, robot),
        Action::PlaceOnStack => verify_place_on_stack(req, post, robot),
    }
}

fn verify_move(
    req: &CommandRequest,
    post: &WorldState,
    robot: &Robot,
    prev_pos: Option<Vec3>,
) -> Verdict {
    let pos = robot.position;
    if !post.is_within_bounds(pos) {
        return Verdict::fail(format!(
            "robot position [{}, {}, {}] out of bounds",
            pos.x, pos.y, pos.z
        ));
    }

    if let (Some(x), Some(z)) = (req.x, req.z) {
        let expected_y = match req.y {
            Some(y) => y,
            // Height defaults per robot kind; the arm keeps its prior height.
            None => robot.kind.default_height(prev_pos.unwrap_or(pos).y),
        };
        if !approx(pos.x, x) || !approx(pos.y, expected_y) || !approx(pos.z, z) {
            return Verdict::fail(format!(
                "move target mismatch: expected [{x}, {expected_y}, {z}] \
                 got [{}, {}, {}]",
                pos.x, pos.y, pos.z
            ));
        }
    }

    if let (Some(raw), Some(prev)) = (req.direction.as_deref(), prev_pos) {
        let Ok(direction) = raw.parse::<Direction>() else {
            return Verdict::fail(format!("unrecognized direction '{raw}'"));
        };
        let (dx, dz) = direction.offset();
        let expected =
            Vec3::new(prev.x + dx, robot.kind.default_height(prev.y), prev.z + dz);
        if !pos.approx_eq(&expected) {
            return Verdict::fail(format!(
                "directional move mismatch: expected [{}, {}, {}] got [{}, {}, {}]",
                expected.x, expected.y, expected.z, pos.x, pos.y, pos.z
            ));
        }
    }

    Verdict::Pass
}

fn verify_pick(req: &CommandRequest, post: &WorldState, robot: &Robot) -> Verdict {
    let Some(item_id) = req.item_id.as_deref() else {
        // Nothing named, nothing to check.
        return Verdict::Pass;
    };
    let Some(held) = &robot.held else {
        return Verdict::fail(format!("{} not carrying after pick", robot.id));
    };
    if held.grip != Grip::Carrying {
        return Verdict::fail(format!(
            "{} current task is '{held}', expected carrying_{item_id}",
            robot.id
        ));
    }
    if held.item_id != item_id {
        return Verdict::fail(format!(
            "{} carrying '{}' not '{item_id}'",
            robot.id, held.item_id
        ));
    }
    let Some(item) = post.item(item_id) else {
        return Verdict::fail(format!("item {item_id} not in post state"));
    };
    if !item.position.approx_eq(&robot.position) {
        return Verdict::fail(format!(
            "picked item {item_id} position does not match robot position"
        ));
    }
    if let Some(stack) = &item.stack_id {
        return Verdict::fail(format!(
            "picked item {item_id} still has stack_id '{stack}'"
        ));
    }
    Verdict::Pass
}

fn verify_drop(req: &CommandRequest, post: &WorldState, robot: &Robot) -> Verdict {
    let Some(item_id) = req.item_id.as_deref() else {
        return Verdict::Pass;
    };
    if matches!(&robot.held, Some(held) if held.grip == Grip::Carrying) {
        return Verdict::fail(format!("{} still carrying after drop", robot.id));
    }
    if let (Some(x), Some(z)) = (req.x, req.z) {
        let Some(item) = post.item(item_id) else {
            return Verdict::fail(format!("item {item_id} not in post state"));
        };
        if !approx(item.position.y, 0.0) {
            return Verdict::fail(format!(
                "dropped item must rest on the floor at y=0, got {}",
                item.position.y
            ));
        }
        if let Some(stack) = &item.stack_id {
            return Verdict::fail(format!(
                "dropped item should not be on a stack, got stack_id '{stack}'"
            ));
        }
        if !approx(item.position.x, x) || !approx(item.position.z, z) {
            return Verdict::fail(format!(
                "item not at drop position: expected ({x}, 0, {z}), got [{}, {}, {}]",
                item.position.x, item.position.y, item.position.z
            ));
        }
    }
    Verdict::Pass
}

fn verify_pick_from_stack(post: &WorldState, robot: &Robot) -> Verdict {
    let Some(held) = &robot.held else {
        return Verdict::fail(format!("{} not holding after pick_from_stack", robot.id));
    };
    if held.grip != Grip::Holding {
        return Verdict::fail(format!(
            "{} current task is '{held}', expected a holding_ task",
            robot.id
        ));
    }
    let Some(item) = post.item(&held.item_id) else {
        return Verdict::fail(format!("held item '{}' not present in items", held.item_id));
    };
    if let Some(stack) = &item.stack_id {
        return Verdict::fail(format!(
            "held item '{}' still has stack_id '{stack}'",
            held.item_id
        ));
    }
    Verdict::Pass
}

fn verify_place_on_stack(req: &CommandRequest, post: &WorldState, robot: &Robot) -> Verdict {
    if let (Some(item_id), Some(stack_id)) = (req.item_id.as_deref(), req.stack_id.as_deref()) {
        let Some(item) = post.item(item_id) else {
            return Verdict::fail(format!("item {item_id} not in post state"));
        };
        if item.stack_id.as_deref() != Some(stack_id) {
            return Verdict::fail(format!(
                "item {item_id} not on stack {stack_id} after place"
            ));
        }
        if item.position.y <= 0.0 {
            return Verdict::fail(format!(
                "stacked item {item_id} should sit above the floor, got y={}",
                item.position.y
            ));
        }
    }
    if matches!(&robot.held, Some(held) if held.grip == Grip::Holding) {
        return Verdict::fail(format!("{} still holding after place_on_stack", robot.id));
    }
    Verdict::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{HeldItem, WorldState};
    use warebot_logic::command::RobotSelector;

    fn move_north() -> CommandRequest {
        CommandRequest::new(RobotSelector::Ugv, Action::Move).with_direction(Direction::North)
    }

    #[test]
    fn unmoved_robot_fails_directional_verification() {
        let pre = WorldState::seed();
        let post = pre.clone();
        let verdict = verify_after(&move_north(), &pre, &post);
        assert!(!verdict.passed());
        assert!(verdict.reason().unwrap().contains("directional move mismatch"));
    }

    #[test]
    fn correct_directional_move_passes() {
        let pre = WorldState::seed();
        let mut post = pre.clone();
        post.robot_mut("ugv-1").unwrap().position = Vec3::new(5.0, 0.0, 0.0);
        assert_eq!(verify_after(&move_north(), &pre, &post), Verdict::Pass);
    }

    #[test]
    fn absolute_move_checks_defaulted_height() {
        let pre = WorldState::seed();
        let mut post = pre.clone();
        // The UAV claims to be at floor level after an absolute move.
        post.robot_mut("uav-1").unwrap().position = Vec3::new(20.0, 0.0, 20.0);
        let req = CommandRequest::new(RobotSelector::Uav, Action::Move).with_target(20.0, 20.0);
        let verdict = verify_after(&req, &pre, &post);
        assert!(verdict.reason().unwrap().contains("move target mismatch"));
    }

    #[test]
    fn pick_requires_matching_carry_task_and_position() {
        let pre = WorldState::seed();
        let mut post = pre.clone();
        post.robot_mut("ugv-1").unwrap().held = Some(HeldItem::carrying("item-2"));
        let req = CommandRequest::new(RobotSelector::Ugv, Action::Pick).with_item("item-1");
        let verdict = verify_after(&req, &pre, &post);
        assert!(verdict.reason().unwrap().contains("carrying 'item-2' not 'item-1'"));
    }

    #[test]
    fn place_requires_stack_membership_and_elevation() {
        let pre = WorldState::seed();
        let mut post = pre.clone();
        post.robot_mut("arm-1").unwrap().held = None;
        let req = CommandRequest::new(RobotSelector::Arm, Action::PlaceOnStack)
            .with_item("item-2")
            .with_stack("stack-1");
        let verdict = verify_after(&req, &pre, &post);
        assert!(verdict.reason().unwrap().contains("not on stack stack-1"));
    }
}
