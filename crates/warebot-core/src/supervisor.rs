//! Deterministic reconciliation of agent narratives against ground truth.
//!
//! When a free-text message parses as a direct command, whatever an agent
//! claims to have done is checked against before/after snapshots. On
//! disagreement the parsed command is re-executed deterministically and its
//! reply replaces the narrative (self-heal). If that re-run is itself
//! rejected, the failure is surfaced instead of guessing.

use crate::executor::{execute, CommandError, CommandOutcome};
use crate::store::WorldStore;
use crate::verify::{verify_after, Verdict};
use crate::world::WorldState;
use log::{debug, warn};
use warebot_logic::command::CommandRequest;
use warebot_logic::parser::parse_direct_command;

pub use warebot_logic::parser::looks_like_robot_command;

/// Outcome of reconciling one message against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// The message is not a recognized direct command; the narrative stands.
    NotDirect,
    /// Post-state already matches the parsed command.
    Verified { command: CommandRequest },
    /// Verification failed; the parsed command was re-executed and its
    /// outcome overrides the narrative.
    Healed { command: CommandRequest, reason: String, outcome: CommandOutcome },
    /// Verification failed and the deterministic re-run was rejected too.
    Failed { command: CommandRequest, reason: String, error: CommandError },
}

/// Reconcile a user message against the world, given the snapshot taken
/// before the message was handled.
pub fn reconcile(store: &WorldStore, message: &str, pre: &WorldState) -> Reconciliation {
    let Some(command) = parse_direct_command(message) else {
        return Reconciliation::NotDirect;
    };
    let post = store.snapshot();
    match verify_after(&command, pre, &post) {
        Verdict::Pass => {
            debug!("verified '{message}' as {:?}", command.action);
            Reconciliation::Verified { command }
        }
        Verdict::Fail(reason) => {
            warn!("post-state disagrees for '{message}' ({reason}); re-executing");
            match execute(store, &command) {
                Ok(outcome) => Reconciliation::Healed { command, reason, outcome },
                Err(error) => {
                    warn!("self-heal re-run rejected: {error}");
                    Reconciliation::Failed { command, reason, error }
                }
            }
        }
    }
}
