pub mod commands;
pub mod host;
pub mod logging;
pub mod scenario;

pub use scenario::{RunReport, Scenario, ScenarioError};
