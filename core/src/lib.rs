pub mod arena;
pub mod automation;
pub mod chat;
pub mod context;
pub mod frame;
pub mod geometry;
pub mod hazard;
pub mod host;
pub mod kinematics;
pub mod path;
pub mod timing;

// Re-exports for convenience
pub use arena::{ArenaConfig, ArenaMap, ArenaPhase, DefinitionError, MapRegistry};
pub use automation::{DebouncedTrigger, DutyAutomation, TriggerEvent};
pub use context::{AppConfig, AppConfigExt, ConfigError, load_registry};
pub use frame::FrameOrchestrator;
pub use geometry::Span;
pub use hazard::{Hazard, Outline, Schedule, Shape};
pub use host::{
    Conditions, DutyActions, DutyError, NotificationSink, NotifyError, PlayerState,
    RenderSink, WorldState,
};
pub use kinematics::{KinematicSample, Kinematics};
pub use path::{Path, PathLeg, Waypoint};
