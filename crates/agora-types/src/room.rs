use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::RoomId;
use crate::scenario::{DEFAULT_SCENARIO, ScenarioMode};

/// A conversation room.
///
/// The scenario key is fixed at creation and decides which template family
/// governs every turn in the room (see [`ScenarioMode`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Freeform display name.
    pub name: String,
    /// Scenario key from the catalog (e.g. "debate", "argument_short").
    pub scenario: String,
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Template family for this room's scenario.
    pub fn mode(&self) -> ScenarioMode {
        ScenarioMode::for_scenario(&self.scenario)
    }
}

/// Request to create a new room. Only `name` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default = "default_scenario")]
    pub scenario: String,
    /// Seed the room with the scenario's persona list (default: true).
    #[serde(default = "default_seed_agents")]
    pub seed_agents: bool,
}

fn default_scenario() -> String {
    DEFAULT_SCENARIO.to_string()
}

fn default_seed_agents() -> bool {
    true
}
