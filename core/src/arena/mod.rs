//! Arena stages
//!
//! This module provides:
//! - **Definitions**: per-stage hazards, route and detection region (loaded from TOML)
//! - **Registry**: stage lookup by phase and by player position
//! - **Map**: runtime state of the stage the player is currently in

mod definition;
mod error;
mod loader;
mod map;
mod phase;


pub use definition::{ArenaConfig, ArenaHeader, HazardDefinition, Region, WaypointDefinition};
pub use error::DefinitionError;
pub use loader::{builtin_arenas, load_arena_from_file, load_arenas_from_dir, parse_arena};
pub use map::{ArenaMap, MapRegistry};
pub use phase::ArenaPhase;
