//! Deterministic free-text command recognition.
//!
//! Recognizes a closed set of phrasings ("move ugv north", "pick up item-1",
//! "put item-3 on stack stack-1") and reduces them to a [`CommandRequest`]
//! without invoking any language model. Anything outside the set stays in
//! agent territory: movement toward another robot by name, scanning or
//! mapping requests, and any shape the patterns do not cover.

use crate::command::{Action, CommandRequest, RobotSelector};
use regex::Regex;
use std::sync::LazyLock;

const ID: &str = r"([a-z0-9._-]+)";
const NUM: &str = r"(-?\d+(?:\.\d+)?)";

static MOVE_DIRECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:move\s+)?(?:the\s+)?(ugv|ugx|agv|uav|arm)(?:\s+move(?:\s+to)?|\s+to)?\s+(north|south|east|west)$",
    )
    .unwrap()
});

static MOVE_DIRECTION_REVERSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^move\s+(north|south|east|west)\s+(?:the\s+)?(ugv|ugx|agv|uav|arm)$").unwrap()
});

static MOVE_ABSOLUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:move\s+)?(?:the\s+)?(ugv|ugx|agv|uav|arm)(?:\s+move)?\s+to\s+{NUM}\s+{NUM}(?:\s+{NUM})?$"
    ))
    .unwrap()
});

static ARM_PICK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^arm\s+(?:pick|grab|take|get)\s+(?:from\s+)?(?:stack\s+)?{ID}$"
    ))
    .unwrap()
});

static PICK_FROM_STACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:pick|grab|take|get)\s+from\s+stack\s+{ID}$")).unwrap()
});

static PLACE_ON_STACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:arm\s+)?(?:place|put|stack|add)\s+{ID}\s+(?:on|onto|to)\s+stack\s+{ID}$"
    ))
    .unwrap()
});

static DROP_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:(?:ugv|ugx)\s+)?(?:drop|place|put|release)\s+{ID}\s+(?:at|to)?\s*\(?\s*{NUM}\s*[, ]\s*{NUM}\s*\)?$"
    ))
    .unwrap()
});

static PICK_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?:(?:ugv|ugx)\s+)?(?:move\s+)?(?:pick|grab|collect|take|get)(?:\s+up)?\s+(?:item\s+)?{ID}$"
    ))
    .unwrap()
});

static HAS_ROBOT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(ugv|ugx|agv|uav|arm)\b").unwrap());

static HAS_ACTION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(move|north|south|east|west|pick|drop|place|put|stack|grab|collect|take|get|release)\b",
    )
    .unwrap()
});

/// Lowercase, collapse whitespace, strip leading politeness, strip trailing
/// punctuation.
fn normalize(message: &str) -> String {
    let mut msg = message
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    for prefix in ["please ", "kindly "] {
        if let Some(rest) = msg.strip_prefix(prefix) {
            msg = rest.to_string();
            break;
        }
    }
    msg.trim_end_matches(['.', '!', '?']).trim().to_string()
}

fn normalize_robot(token: &str) -> Option<RobotSelector> {
    match token.trim() {
        "ugv" | "ugv-1" | "ugx" | "ugx-1" | "agv" | "agv-1" => Some(RobotSelector::Ugv),
        "uav" | "uav-1" => Some(RobotSelector::Uav),
        "arm" | "arm-1" => Some(RobotSelector::Arm),
        _ => None,
    }
}

fn num(m: &regex::Captures<'_>, group: usize) -> Option<f64> {
    m.get(group).and_then(|g| g.as_str().parse().ok())
}

/// Parse a deterministic warehouse command from free text.
///
/// Returns `None` for anything that must stay on the agent path.
pub fn parse_direct_command(message: &str) -> Option<CommandRequest> {
    let msg = normalize(message);
    if msg.is_empty() {
        return None;
    }

    // Relative-to-robot movement and scanning stay with the agents.
    if msg.contains("toward") {
        return None;
    }
    if ["scan", "mapping", "map ", "find items", "find item"]
        .iter()
        .any(|k| msg.contains(k))
    {
        return None;
    }

    if let Some(m) = MOVE_DIRECTION.captures(&msg) {
        if let Some(robot) = normalize_robot(&m[1]) {
            let direction = m[2].parse().ok()?;
            return Some(CommandRequest::new(robot, Action::Move).with_direction(direction));
        }
    }

    if let Some(m) = MOVE_DIRECTION_REVERSED.captures(&msg) {
        if let Some(robot) = normalize_robot(&m[2]) {
            let direction = m[1].parse().ok()?;
            return Some(CommandRequest::new(robot, Action::Move).with_direction(direction));
        }
    }

    if let Some(m) = MOVE_ABSOLUTE.captures(&msg) {
        if let Some(robot) = normalize_robot(&m[1]) {
            let first = num(&m, 2)?;
            let second = num(&m, 3)?;
            let req = CommandRequest::new(robot, Action::Move);
            return Some(match num(&m, 4) {
                // Two numbers are (x, z); three are (x, y, z).
                None => req.with_target(first, second),
                Some(third) => req.with_target(first, third).with_height(second),
            });
        }
    }

    if let Some(m) = ARM_PICK.captures(&msg) {
        return Some(
            CommandRequest::new(RobotSelector::Arm, Action::PickFromStack).with_stack(&m[1]),
        );
    }
    if let Some(m) = PICK_FROM_STACK.captures(&msg) {
        return Some(
            CommandRequest::new(RobotSelector::Arm, Action::PickFromStack).with_stack(&m[1]),
        );
    }

    if let Some(m) = PLACE_ON_STACK.captures(&msg) {
        return Some(
            CommandRequest::new(RobotSelector::Arm, Action::PlaceOnStack)
                .with_item(&m[1])
                .with_stack(&m[2]),
        );
    }

    if let Some(m) = DROP_AT.captures(&msg) {
        return Some(
            CommandRequest::new(RobotSelector::Ugv, Action::Drop)
                .with_item(&m[1])
                .with_target(num(&m, 2)?, num(&m, 3)?),
        );
    }

    // The bare pick pattern would swallow stack phrasings, so it only
    // applies when the message never mentions a stack.
    if !msg.contains("stack") {
        if let Some(m) = PICK_ITEM.captures(&msg) {
            return Some(CommandRequest::new(RobotSelector::Ugv, Action::Pick).with_item(&m[1]));
        }
    }

    None
}

/// Whether a message even looks like a direct robot command: it names a
/// robot and an action or direction, even if no specific pattern parses.
///
/// Used upstream to decide whether a free-form agent answer may stand.
pub fn looks_like_robot_command(message: &str) -> bool {
    let msg = normalize(message);
    if msg.is_empty() {
        return false;
    }
    HAS_ROBOT_TOKEN.is_match(&msg) && HAS_ACTION_TOKEN.is_match(&msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::Direction;

    fn move_cmd(robot: RobotSelector, direction: Direction) -> CommandRequest {
        CommandRequest::new(robot, Action::Move).with_direction(direction)
    }

    #[test]
    fn move_direction_variants() {
        assert_eq!(
            parse_direct_command("move uav south"),
            Some(move_cmd(RobotSelector::Uav, Direction::South))
        );
        assert_eq!(
            parse_direct_command("move the ugv north"),
            Some(move_cmd(RobotSelector::Ugv, Direction::North))
        );
        assert_eq!(
            parse_direct_command("move south ugx"),
            Some(move_cmd(RobotSelector::Ugv, Direction::South))
        );
        assert_eq!(
            parse_direct_command("move agv to south"),
            Some(move_cmd(RobotSelector::Ugv, Direction::South))
        );
        assert_eq!(
            parse_direct_command("Please move the UGV west!"),
            Some(move_cmd(RobotSelector::Ugv, Direction::West))
        );
    }

    #[test]
    fn move_absolute_coordinates() {
        assert_eq!(
            parse_direct_command("move ugv to 10 5"),
            Some(CommandRequest::new(RobotSelector::Ugv, Action::Move).with_target(10.0, 5.0))
        );
        assert_eq!(
            parse_direct_command("uav move to 10 5 2"),
            Some(
                CommandRequest::new(RobotSelector::Uav, Action::Move)
                    .with_target(10.0, 2.0)
                    .with_height(5.0)
            )
        );
    }

    #[test]
    fn pick_drop_and_stack_variants() {
        assert_eq!(
            parse_direct_command("pick up item-1"),
            Some(CommandRequest::new(RobotSelector::Ugv, Action::Pick).with_item("item-1"))
        );
        assert_eq!(
            parse_direct_command("grab item-2"),
            Some(CommandRequest::new(RobotSelector::Ugv, Action::Pick).with_item("item-2"))
        );
        assert_eq!(
            parse_direct_command("put item-1 at 10 5"),
            Some(
                CommandRequest::new(RobotSelector::Ugv, Action::Drop)
                    .with_item("item-1")
                    .with_target(10.0, 5.0)
            )
        );
        assert_eq!(
            parse_direct_command("drop item-1 at (10, 5)"),
            Some(
                CommandRequest::new(RobotSelector::Ugv, Action::Drop)
                    .with_item("item-1")
                    .with_target(10.0, 5.0)
            )
        );
        assert_eq!(
            parse_direct_command("arm pick stack-1"),
            Some(
                CommandRequest::new(RobotSelector::Arm, Action::PickFromStack)
                    .with_stack("stack-1")
            )
        );
        assert_eq!(
            parse_direct_command("take from stack stack-2"),
            Some(
                CommandRequest::new(RobotSelector::Arm, Action::PickFromStack)
                    .with_stack("stack-2")
            )
        );
        assert_eq!(
            parse_direct_command("put item-3 on stack stack-1"),
            Some(
                CommandRequest::new(RobotSelector::Arm, Action::PlaceOnStack)
                    .with_item("item-3")
                    .with_stack("stack-1")
            )
        );
    }

    #[test]
    fn stack_mentions_suppress_the_bare_pick_pattern() {
        // "get item-4 stack" is not a recognized shape; it must not parse
        // as a floor pick just because the pick verb matches.
        assert_eq!(parse_direct_command("stack pick item-4"), None);
    }

    #[test]
    fn agent_territory_returns_none() {
        assert_eq!(parse_direct_command("move towards arm"), None);
        assert_eq!(parse_direct_command("move ugv toward the uav"), None);
        assert_eq!(parse_direct_command("scan the area"), None);
        assert_eq!(parse_direct_command("map the north aisle"), None);
        assert_eq!(parse_direct_command("what are the robots doing?"), None);
        assert_eq!(parse_direct_command(""), None);
    }

    #[test]
    fn command_intent_detection() {
        assert!(looks_like_robot_command("move agv to south"));
        assert!(looks_like_robot_command("uav north"));
        assert!(looks_like_robot_command("arm release item-9"));
        assert!(!looks_like_robot_command("scan the north section"));
        assert!(!looks_like_robot_command("how are you today"));
    }
}
