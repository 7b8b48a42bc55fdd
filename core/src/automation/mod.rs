//! Join/leave automation
//!
//! This module provides:
//! - **Triggers**: debounced single-slot timers that fire once a gating
//!   condition has held for a configured delay
//! - **Gates**: the conditions driving the join and leave triggers
//! - **Duty wrapper**: issues duty commands and tracks the busy cooldown

mod duty;
mod gates;
mod trigger;


pub use duty::DutyAutomation;
pub use gates::{GateInputs, headcount, join_gate, leave_gate};
pub use trigger::{DebouncedTrigger, TriggerEvent};
