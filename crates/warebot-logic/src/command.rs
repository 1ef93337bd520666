//! Structured command parameters shared by every invocation surface.
//!
//! The same [`CommandRequest`] is produced by the HTTP body, by agent tool
//! calls, and by the free-text [`parser`](crate::parser), so a command always
//! executes identically no matter where it came from.

use crate::movement::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the three controllable robots a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotSelector {
    /// The aerial unit.
    #[serde(alias = "aerial")]
    Uav,
    /// The ground unit.
    #[serde(alias = "ground", alias = "ugx", alias = "agv")]
    Ugv,
    /// The stationary arm.
    Arm,
}

impl RobotSelector {
    /// Stable robot id in the world state.
    pub fn canonical_id(self) -> &'static str {
        match self {
            RobotSelector::Uav => "uav-1",
            RobotSelector::Ugv => "ugv-1",
            RobotSelector::Arm => "arm-1",
        }
    }

    /// Human label used in confirmation and error messages.
    pub fn label(self) -> &'static str {
        match self {
            RobotSelector::Uav => "UAV",
            RobotSelector::Ugv => "UGV",
            RobotSelector::Arm => "Arm",
        }
    }
}

impl fmt::Display for RobotSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five supported state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Move,
    Pick,
    Drop,
    PickFromStack,
    PlaceOnStack,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Move => "move",
            Action::Pick => "pick",
            Action::Drop => "drop",
            Action::PickFromStack => "pick_from_stack",
            Action::PlaceOnStack => "place_on_stack",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single warehouse command, mirroring the wire body
/// `{robot, action, direction?, item_id?, stack_id?, x?, y?, z?}`.
///
/// `direction` stays a free string here; the executor parses it so an
/// invalid direction is reported as a command failure, not a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub robot: RobotSelector,
    #[serde(default)]
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl CommandRequest {
    pub fn new(robot: RobotSelector, action: Action) -> Self {
        Self {
            robot,
            action,
            direction: None,
            item_id: None,
            stack_id: None,
            x: None,
            y: None,
            z: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction.as_str().to_string());
        self
    }

    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    pub fn with_stack(mut self, stack_id: impl Into<String>) -> Self {
        self.stack_id = Some(stack_id.into());
        self
    }

    pub fn with_target(mut self, x: f64, z: f64) -> Self {
        self.x = Some(x);
        self.z = Some(z);
        self
    }

    pub fn with_height(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_maps_to_stable_ids() {
        assert_eq!(RobotSelector::Uav.canonical_id(), "uav-1");
        assert_eq!(RobotSelector::Ugv.canonical_id(), "ugv-1");
        assert_eq!(RobotSelector::Arm.canonical_id(), "arm-1");
    }

    #[test]
    fn builders_fill_only_what_they_name() {
        let req = CommandRequest::new(RobotSelector::Ugv, Action::Drop)
            .with_item("item-1")
            .with_target(10.0, 5.0);
        assert_eq!(req.item_id.as_deref(), Some("item-1"));
        assert_eq!((req.x, req.z), (Some(10.0), Some(5.0)));
        assert_eq!(req.y, None);
        assert_eq!(req.stack_id, None);
    }
}
