//! Per-frame orchestration
//!
//! [`FrameOrchestrator::frame`] runs once per host frame, in a fixed order:
//!
//! 1. Sample player kinematics
//! 2. Recompute the open/closed predicate from the zone
//! 3. Select the arena map and advance it (schedules before any query)
//! 4. Run the join trigger, then the leave trigger
//! 5. Draw the route and every hazard inside the look-ahead horizon
//!
//! Collaborators are injected at construction and owned by the orchestrator.
//! The render sink is borrowed per frame since draw calls only make sense
//! inside one.

use chrono::NaiveDateTime;
use glam::Vec3;

use dodger_types::{AppConfig, overlay_colors};

use crate::arena::{ArenaMap, ArenaPhase, MapRegistry};
use crate::automation::{
    DebouncedTrigger, DutyAutomation, GateInputs, TriggerEvent, headcount, join_gate, leave_gate,
};
use crate::chat::{self, ChatEvent};
use crate::geometry::normalized_xz;
use crate::host::{Conditions, DutyActions, NotificationSink, PlayerState, RenderSink, WorldState};
use crate::kinematics::{KinematicSample, Kinematics};
use crate::timing::secs_between;

#[cfg(test)]
mod frame_tests;

pub struct FrameOrchestrator<W, P, D, N> {
    config: AppConfig,
    registry: MapRegistry,

    world: W,
    player: P,
    duty: DutyAutomation<D>,
    notifier: N,

    kinematics: Kinematics,
    map: Option<ArenaMap>,
    join: DebouncedTrigger,
    leave: DebouncedTrigger,

    is_open: bool,
    headcount: u32,
    last_reward: Option<u32>,
}

impl<W, P, D, N> FrameOrchestrator<W, P, D, N>
where
    W: WorldState,
    P: PlayerState,
    D: DutyActions,
    N: NotificationSink,
{
    pub fn new(
        config: AppConfig,
        registry: MapRegistry,
        world: W,
        player: P,
        duty: D,
        notifier: N,
    ) -> Self {
        let automation = &config.automation;
        Self {
            join: DebouncedTrigger::new("join", automation.auto_join_delay_secs),
            leave: DebouncedTrigger::new("leave", automation.auto_leave_delay_secs),
            duty: DutyAutomation::new(duty, automation.action_cooldown_secs),
            config,
            registry,
            world,
            player,
            notifier,
            kinematics: Kinematics::new(),
            map: None,
            is_open: false,
            headcount: 0,
            last_reward: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Apply new settings. Trigger delays take effect the next time they arm.
    pub fn set_config(&mut self, config: AppConfig) {
        self.join.set_delay(config.automation.auto_join_delay_secs);
        self.leave.set_delay(config.automation.auto_leave_delay_secs);
        self.duty.set_cooldown(config.automation.action_cooldown_secs);
        self.config = config;
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn duty(&self) -> &D {
        self.duty.actions()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn map(&self) -> Option<&ArenaMap> {
        self.map.as_ref()
    }

    pub fn phase(&self) -> Option<ArenaPhase> {
        self.map.as_ref().map(ArenaMap::phase)
    }

    /// Whether the overlay is shown (player in a tracked zone)
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn headcount(&self) -> u32 {
        self.headcount
    }

    pub fn kinematics(&self) -> KinematicSample {
        self.kinematics.last()
    }

    pub fn is_duty_idle(&self) -> bool {
        self.duty.is_idle()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frame
    // ─────────────────────────────────────────────────────────────────────────

    /// Run one frame. `now` must not go backwards between calls.
    pub fn frame<R: RenderSink + ?Sized>(&mut self, now: NaiveDateTime, dt_secs: f32, render: &mut R) {
        self.duty.update(now);

        let zone = self.world.zone();
        let conditions = self.world.conditions();
        let position = self.player.position();
        let sample = self.kinematics.sample(position, dt_secs);

        self.is_open = self.config.zones.is_tracked(zone);

        self.update_map(now, zone, conditions, position);
        self.update_auto_join(now, zone, conditions);
        self.update_auto_leave(now, zone, conditions);
        self.draw_overlays(now, conditions, &sample, render);
    }

    /// Stage selection and map update. Skipped while loading or without a
    /// position, keeping the current map as it is.
    fn update_map(
        &mut self,
        now: NaiveDateTime,
        zone: u32,
        conditions: Conditions,
        pos: Option<Vec3>,
    ) {
        if conditions.between_areas {
            return;
        }
        let Some(pos) = pos else {
            return;
        };

        let phase = if self.is_open && zone == self.config.zones.arena_zone {
            self.registry.detect(zone, pos)
        } else {
            None
        };

        if self.phase() != phase {
            match phase {
                Some(phase) => tracing::info!(%phase, "Entering arena stage"),
                None => tracing::info!("Leaving arena stage"),
            }
            self.map = phase.and_then(|phase| self.registry.build(phase, now));
        }

        if let Some(map) = &mut self.map {
            map.update(now, pos);
        }
    }

    fn gate_inputs(&self, zone: u32, conditions: Conditions) -> GateInputs {
        GateInputs {
            overlay_open: self.is_open,
            zone,
            conditions,
            duty_idle: self.duty.is_idle(),
            headcount: self.headcount,
        }
    }

    fn update_auto_join(&mut self, now: NaiveDateTime, zone: u32, conditions: Conditions) {
        let inputs = self.gate_inputs(zone, conditions);
        let want = join_gate(&self.config.automation, &self.config.zones, &inputs);
        if self.join.tick(now, want) == TriggerEvent::Fired {
            tracing::info!("Auto-joining");
            self.duty.register_for_duty(now);
        }
    }

    fn update_auto_leave(&mut self, now: NaiveDateTime, zone: u32, conditions: Conditions) {
        self.headcount = headcount(
            &self.config.zones,
            zone,
            conditions,
            self.player.player_count(),
        );
        let inputs = self.gate_inputs(zone, conditions);
        let want = leave_gate(&self.config.automation, &inputs);
        if self.leave.tick(now, want) == TriggerEvent::Fired {
            tracing::info!(players = self.headcount, "Auto-leaving");
            self.duty.leave_duty(now);
        }
    }

    fn draw_overlays<R: RenderSink + ?Sized>(
        &self,
        now: NaiveDateTime,
        conditions: Conditions,
        sample: &KinematicSample,
        render: &mut R,
    ) {
        let Some(map) = &self.map else {
            return;
        };
        if conditions.between_areas {
            return;
        }

        let display = &self.config.display;
        let pos = map.player_pos();

        if display.show_path {
            for (i, leg) in map.path().legs(pos, now).iter().enumerate() {
                // Only the leg from the player is urgent; waypoints already
                // passed do not count, unlike indexing from the first waypoint
                let color = if i > 0 {
                    overlay_colors::ROUTE
                } else if leg.delay_secs <= 0.0 {
                    overlay_colors::MOVE_NOW
                } else {
                    overlay_colors::WAIT
                };
                render.draw_world_line(leg.from, leg.to, color);
                if leg.delay_secs > 0.0 {
                    render.draw_world_text(
                        leg.from,
                        overlay_colors::WAIT,
                        &format!("{:.3}", leg.delay_secs),
                    );
                }
            }
        }

        let prediction = &self.config.prediction;
        let inv_speed = prediction.inv_speed();
        let padding = prediction.window_padding_secs;

        for hazard in map.hazards() {
            let Some(next) = hazard.next_activation() else {
                continue;
            };
            let until = secs_between(now, next);
            if until >= prediction.lookahead_secs {
                continue;
            }

            let span = hazard.trajectory(pos, sample.direction, sample.is_moving());
            let window = span.scaled(inv_speed);
            let delay = if window.is_none() {
                0.0
            } else {
                hazard.activates_between(now, window.enter - padding, window.exit + padding)
            };
            let color = if delay > 0.0 {
                overlay_colors::IMMINENT
            } else {
                overlay_colors::SAFE
            };

            if display.show_hazards {
                render.draw_outline(&hazard.outline(), color);
            }

            if display.show_hazard_text {
                let text = format!(
                    "{:.3} [{:.2}-{:.2}, {:.2}]",
                    until, window.enter, window.exit, delay
                );
                // Label sits where the straight line to the hazard meets its edge
                let dir = normalized_xz(hazard.origin - pos);
                let edge = hazard.intersect(pos, dir);
                let reach = if edge.is_none() { 0.0 } else { edge.enter.max(0.0) };
                render.draw_world_text(pos + dir * reach, color, &text);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chat & Manual Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// React to an incoming chat line
    pub fn on_chat_line(&mut self, now: NaiveDateTime, line: &str) {
        match chat::classify(&self.config.chat, line) {
            Some(ChatEvent::RoundStarting) => self.notify_round_starting(),
            Some(ChatEvent::RewardGranted { amount }) => {
                if amount.is_some() {
                    self.last_reward = amount;
                }
                if chat::leave_after_reward(&self.config.automation, self.phase()) {
                    tracing::info!(phase = ?self.phase(), "Reward granted, leaving");
                    self.duty.leave_duty(now);
                }
            }
            None => {}
        }
    }

    fn notify_round_starting(&mut self) {
        let notify = &self.config.notify;
        let Some(message) = chat::match_notification(notify, self.headcount) else {
            return;
        };
        match self.notifier.send(&message, &notify.recipient, &notify.sender) {
            Ok(()) => tracing::debug!(players = self.headcount, "Match notification queued"),
            Err(e) => tracing::warn!(error = %e, "Failed to queue match notification"),
        }
    }

    /// Start a hazard sequence group on the current map
    pub fn trigger_sequence(&mut self, group: &str, at: NaiveDateTime) -> usize {
        match &mut self.map {
            Some(map) => map.trigger_sequence(group, at),
            None => {
                tracing::debug!(group, "No arena map, sequence ignored");
                0
            }
        }
    }

    /// Manual queue request; shares the busy flag with the automation
    pub fn request_join(&mut self, now: NaiveDateTime) -> bool {
        self.duty.register_for_duty(now)
    }

    /// Manual leave request; shares the busy flag with the automation
    pub fn request_leave(&mut self, now: NaiveDateTime) -> bool {
        self.duty.leave_duty(now)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Status
    // ─────────────────────────────────────────────────────────────────────────

    /// Lines for the overlay status window
    pub fn status_lines(&self, now: NaiveDateTime) -> Vec<String> {
        let mut lines = Vec::new();

        let auto_leave = match self.leave.remaining_secs(now) {
            Some(secs) => format!("in {:.1}s", secs),
            None => "none".to_string(),
        };
        lines.push(format!(
            "Players: {} (auto-leave: {})",
            self.headcount, auto_leave
        ));
        lines.push(format!("Speed: {:.2}", self.kinematics.last().speed));
        if let Some(reward) = self.last_reward {
            lines.push(format!("Last reward: {}", reward));
        }

        if let Some(map) = &self.map {
            lines.extend(map.status_lines(now));
        }
        lines
    }
}
