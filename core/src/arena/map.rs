//! Per-stage map state
//!
//! An `ArenaMap` owns the hazards and route of the stage the player is in.
//! It is built fresh on every stage change and dropped when the player leaves
//! the stage; nothing carries over between stages.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use glam::Vec3;

use super::{ArenaConfig, ArenaPhase};
use crate::geometry::direction_from_angle;
use crate::hazard::{Hazard, Schedule};
use crate::path::{Path, Waypoint};
use crate::timing::{add_secs, secs_between};

// ═══════════════════════════════════════════════════════════════════════════
// Map Registry
// ═══════════════════════════════════════════════════════════════════════════

/// Stage definitions keyed by phase
#[derive(Debug, Clone, Default)]
pub struct MapRegistry {
    definitions: HashMap<ArenaPhase, ArenaConfig>,
}

impl MapRegistry {
    /// Later definitions for the same phase replace earlier ones
    pub fn new(definitions: Vec<ArenaConfig>) -> Self {
        let mut registry = Self::default();
        for def in definitions {
            if registry.definitions.insert(def.arena.phase, def).is_some() {
                tracing::warn!("Duplicate arena definition, keeping the last one");
            }
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definition(&self, phase: ArenaPhase) -> Option<&ArenaConfig> {
        self.definitions.get(&phase)
    }

    /// Stage whose region contains the player, if any
    pub fn detect(&self, zone: u32, pos: Vec3) -> Option<ArenaPhase> {
        ArenaPhase::ALL.into_iter().find(|phase| {
            self.definitions
                .get(phase)
                .is_some_and(|def| def.arena.zone == zone && def.arena.region.contains(pos))
        })
    }

    /// Build a fresh map for `phase`, starting its clock at `now`
    pub fn build(&self, phase: ArenaPhase, now: NaiveDateTime) -> Option<ArenaMap> {
        self.definitions.get(&phase).map(|def| ArenaMap::new(def, now))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Arena Map
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ArenaMap {
    phase: ArenaPhase,
    name: String,
    notes: Vec<String>,
    hazards: Vec<Hazard>,
    path: Path,
    player_pos: Vec3,
    started_at: NaiveDateTime,
    last_update: Option<NaiveDateTime>,
}

impl ArenaMap {
    pub fn new(def: &ArenaConfig, now: NaiveDateTime) -> Self {
        let hazards = def
            .hazards
            .iter()
            .map(|h| {
                let mut schedule = Schedule::new(h.repeat_secs, h.sequence_delay_secs);
                if let Some(first) = h.first_activation_secs {
                    schedule.next_activation = add_secs(now, first);
                    if schedule.next_activation.is_none() {
                        tracing::warn!(
                            hazard = %h.name,
                            first,
                            "First activation out of range, unscheduled"
                        );
                    }
                }
                let hazard = Hazard::new(
                    h.name.clone(),
                    h.shape,
                    h.origin,
                    direction_from_angle(h.facing_deg.to_radians()),
                )
                .with_schedule(schedule);
                match &h.group {
                    Some(group) => hazard.with_group(group.clone()),
                    None => hazard,
                }
            })
            .collect();

        let waypoints = def
            .waypoints
            .iter()
            .filter_map(|wp| match add_secs(now, wp.start_move_secs) {
                Some(start_move_at) => Some(Waypoint {
                    dest: wp.dest,
                    start_move_at,
                }),
                None => {
                    tracing::warn!(
                        start_move_secs = wp.start_move_secs,
                        "Waypoint start out of range, dropped"
                    );
                    None
                }
            })
            .collect();

        Self {
            phase: def.arena.phase,
            name: def.arena.display_name().to_string(),
            notes: def.arena.notes.clone(),
            hazards,
            path: Path::new(waypoints, def.arena.arrival_tolerance),
            player_pos: Vec3::ZERO,
            started_at: now,
            last_update: None,
        }
    }

    pub fn phase(&self) -> ArenaPhase {
        self.phase
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn player_pos(&self) -> Vec3 {
        self.player_pos
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    /// Advance hazard schedules, then route progress.
    ///
    /// Expected once per frame. A timestamp earlier than the previous update
    /// is clamped so schedules never rewind.
    pub fn update(&mut self, now: NaiveDateTime, player_pos: Vec3) {
        let now = match self.last_update {
            Some(last) if now < last => {
                tracing::warn!(
                    behind_secs = secs_between(now, last),
                    "Map update went back in time, clamping"
                );
                last
            }
            _ => now,
        };
        self.last_update = Some(now);
        self.player_pos = player_pos;

        for hazard in &mut self.hazards {
            hazard.advance_schedule(now);
        }
        self.path.advance(player_pos);
    }

    /// Start the hazards of a sequence group at `at` (each staggered by its
    /// own sequence delay). Returns how many hazards were scheduled.
    pub fn trigger_sequence(&mut self, group: &str, at: NaiveDateTime) -> usize {
        let mut count = 0;
        for hazard in self
            .hazards
            .iter_mut()
            .filter(|h| h.group.as_deref() == Some(group))
        {
            hazard.schedule.trigger(at);
            count += 1;
        }
        if count == 0 {
            tracing::debug!(group, "No hazards in sequence group");
        } else {
            tracing::debug!(group, count, "Sequence triggered");
        }
        count
    }

    /// Human readable status for the overlay window
    pub fn status_lines(&self, now: NaiveDateTime) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.notes.len() + 4);
        lines.push(format!(
            "{} ({:.1}s)",
            self.name,
            secs_between(self.started_at, now)
        ));
        lines.extend(self.notes.iter().cloned());
        lines.push(format!(
            "Pos: <{:.2}, {:.2}, {:.2}>",
            self.player_pos.x, self.player_pos.y, self.player_pos.z
        ));
        lines.push(format!("Path: {}-{}", self.path.skip(), self.path.len()));
        if let Some(next) = self.path.remaining().first() {
            let delay = secs_between(now, next.start_move_at);
            if delay > 0.0 {
                lines.push(format!("Move in {:.1}s", delay));
            } else {
                lines.push("Move now".to_string());
            }
        }
        lines
    }
}
