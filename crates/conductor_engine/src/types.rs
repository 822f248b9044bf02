//! Request DTOs accepted by the engine's three entry points (spec.md §4.6-§4.8).

use serde::{Deserialize, Serialize};

/// Summons the Planner for one room (`POST /api/create_plan`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub room_id: String,
    pub query: String,
    pub summoner: String,
    pub assigner: String,
    pub assignee: String,
}

/// Summons the Admin Handler for one room (`POST /api/ask_admin`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerMessage {
    pub room_id: String,
    pub owner_id: String,
    pub owner_message: String,
    #[serde(default)]
    pub trust: bool,
}
