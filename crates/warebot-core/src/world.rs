//! Plain-data model of robots, items, and the warehouse box.
//!
//! All types serialize to the exact wire shape the HTTP layer exposes:
//! positions as `[x, y, z]` arrays, robot `type`/`current_task`/`stack_id`
//! under their historical field names.

use serde::{Deserialize, Serialize};
use std::fmt;
use warebot_logic::geometry::{Bounds, Vec3};
use warebot_logic::stacking::DEFAULT_STACK_BASE;

/// The three controllable robot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotKind {
    #[serde(rename = "uav")]
    Aerial,
    #[serde(rename = "ugv")]
    Ground,
    #[serde(rename = "arm")]
    Arm,
}

impl RobotKind {
    /// Height a robot of this kind settles at when a move command does not
    /// name one: ground robots stay on the floor, aerial robots cruise at 5,
    /// the arm keeps whatever height it already has.
    pub fn default_height(self, current_y: f64) -> f64 {
        match self {
            RobotKind::Ground => 0.0,
            RobotKind::Aerial => 5.0,
            RobotKind::Arm => current_y,
        }
    }
}

/// Robot activity state carried for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    #[default]
    Idle,
    Moving,
    Working,
}

/// How a robot holds an item. The two spellings are semantically identical
/// (at most one item held per robot); they differ only on the wire, where
/// ground-held items read `carrying_<id>` and arm-held items `holding_<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grip {
    Carrying,
    Holding,
}

impl Grip {
    fn prefix(self) -> &'static str {
        match self {
            Grip::Carrying => "carrying_",
            Grip::Holding => "holding_",
        }
    }
}

/// The item a robot is physically holding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeldItem {
    pub item_id: String,
    pub grip: Grip,
}

impl HeldItem {
    pub fn carrying(item_id: impl Into<String>) -> Self {
        Self { item_id: item_id.into(), grip: Grip::Carrying }
    }

    pub fn holding(item_id: impl Into<String>) -> Self {
        Self { item_id: item_id.into(), grip: Grip::Holding }
    }

    /// Wire encoding: `carrying_<id>` or `holding_<id>`.
    pub fn encode(&self) -> String {
        format!("{}{}", self.grip.prefix(), self.item_id)
    }

    /// Decode a wire `current_task` string.
    pub fn parse(raw: &str) -> Option<Self> {
        if let Some(id) = raw.strip_prefix(Grip::Carrying.prefix()) {
            return Some(Self::carrying(id.trim()));
        }
        if let Some(id) = raw.strip_prefix(Grip::Holding.prefix()) {
            return Some(Self::holding(id.trim()));
        }
        None
    }
}

impl fmt::Display for HeldItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Serde bridge keeping `Option<HeldItem>` as the historical
/// `current_task` string on the wire.
mod held_wire {
    use super::HeldItem;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        held: &Option<HeldItem>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        held.as_ref().map(HeldItem::encode).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<HeldItem>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => HeldItem::parse(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("unrecognized current_task '{raw}'"))
            }),
        }
    }
}

/// A controllable robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RobotKind,
    pub position: Vec3,
    /// Carried for display only; no logic reads it.
    pub orientation: Vec3,
    pub status: RobotStatus,
    #[serde(rename = "current_task", with = "held_wire")]
    pub held: Option<HeldItem>,
}

impl Robot {
    pub fn new(id: impl Into<String>, kind: RobotKind, position: Vec3) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            orientation: Vec3::ZERO,
            status: RobotStatus::Idle,
            held: None,
        }
    }

    /// Id of the item this robot holds, if any.
    pub fn held_item_id(&self) -> Option<&str> {
        self.held.as_ref().map(|h| h.item_id.as_str())
    }
}

/// A movable item. `stack_id` marks membership in a named vertical stack;
/// a held item never has one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub position: Vec3,
    pub stack_id: Option<String>,
}

/// Deep-copyable snapshot of the whole warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub warehouse: Bounds,
    pub robots: Vec<Robot>,
    pub items: Vec<Item>,
}

impl WorldState {
    /// The fixed demo world: one robot of each kind and three items, one of
    /// them already stacked.
    pub fn seed() -> Self {
        Self {
            warehouse: Bounds::new(50.0, 30.0, 10.0),
            robots: vec![
                Robot::new("uav-1", RobotKind::Aerial, Vec3::new(10.0, 5.0, 5.0)),
                Robot::new("ugv-1", RobotKind::Ground, Vec3::new(5.0, 0.0, 5.0)),
                Robot::new("arm-1", RobotKind::Arm, Vec3::new(25.0, 0.0, 10.0)),
            ],
            items: vec![
                Item { id: "item-1".into(), position: Vec3::new(8.0, 0.0, 6.0), stack_id: None },
                Item { id: "item-2".into(), position: Vec3::new(12.0, 0.0, 12.0), stack_id: None },
                Item {
                    id: "item-3".into(),
                    position: Vec3::new(25.0, 0.0, 10.0),
                    stack_id: Some("stack-1".into()),
                },
            ],
        }
    }

    pub fn robot(&self, id: &str) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id == id)
    }

    pub(crate) fn robot_mut(&mut self, id: &str) -> Option<&mut Robot> {
        self.robots.iter_mut().find(|r| r.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// The robot currently holding the given item, if any.
    pub fn holder_of(&self, item_id: &str) -> Option<&Robot> {
        self.robots.iter().find(|r| r.held_item_id() == Some(item_id))
    }

    /// Members of a stack in insertion order. The last member is the top.
    pub fn stack_members(&self, stack_id: &str) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|i| i.stack_id.as_deref() == Some(stack_id))
            .collect()
    }

    pub fn stack_height(&self, stack_id: &str) -> usize {
        self.stack_members(stack_id).len()
    }

    /// `(x, z)` base of a stack: an existing member's position if the stack
    /// has one, otherwise the fixed default base.
    pub fn stack_base(&self, stack_id: &str) -> (f64, f64) {
        self.stack_members(stack_id)
            .first()
            .map(|item| (item.position.x, item.position.z))
            .unwrap_or(DEFAULT_STACK_BASE)
    }

    pub fn is_within_bounds(&self, p: Vec3) -> bool {
        self.warehouse.contains(p)
    }

    /// Another robot whose Euclidean distance to `p` is below `tolerance`.
    pub fn find_colliding_robot(&self, exclude_id: &str, p: Vec3, tolerance: f64) -> Option<&Robot> {
        self.robots
            .iter()
            .filter(|r| r.id != exclude_id)
            .find(|r| r.position.distance(&p) < tolerance)
    }
}
