//! Frame orchestrator tests against recording fakes

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use glam::Vec3;

use dodger_types::{AppConfig, overlay_colors};

use super::FrameOrchestrator;
use crate::arena::{ArenaPhase, MapRegistry, parse_arena};
use crate::hazard::Outline;
use crate::host::Conditions;
use crate::host::testing::{
    DutyCall, FakePlayer, FakeWorld, RecordingDuty, RecordingNotifier, RecordingRender,
};
use crate::timing::add_secs;

type TestOrchestrator = FrameOrchestrator<FakeWorld, FakePlayer, RecordingDuty, RecordingNotifier>;

const LOBBY: u32 = 1197;
const ARENA: u32 = 1165;

const STAGE1: &str = r#"
[arena]
phase = "stage1"
zone = 1165
region = { min_x = -50.0, max_x = 50.0, min_z = -50.0, max_z = 50.0 }

[[hazard]]
name = "Slam"
shape = { type = "circle", radius = 5.0 }
origin = [0.0, 0.0, 0.0]
first_activation_secs = 2.0

[[waypoint]]
dest = [0.0, 0.0, 30.0]
start_move_secs = 1.0

[[waypoint]]
dest = [10.0, 0.0, 40.0]
start_move_secs = 4.0
"#;

const STAGE3: &str = r#"
[arena]
phase = "stage3"
zone = 1165
region = { min_x = -40.0, max_x = 40.0, min_z = 100.0, max_z = 350.0 }
"#;

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(20, 0, 0))
        .expect("valid timestamp")
}

fn at(secs: f32) -> NaiveDateTime {
    add_secs(t0(), secs).expect("in range")
}

fn registry() -> MapRegistry {
    MapRegistry::new(vec![
        parse_arena(STAGE1, Path::new("stage1.toml")).expect("stage1"),
        parse_arena(STAGE3, Path::new("stage3.toml")).expect("stage3"),
    ])
}

fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.prediction.travel_speed = 10.0;
    config
}

fn bound() -> Conditions {
    Conditions {
        bound_by_duty: true,
        ..Default::default()
    }
}

fn orchestrator(config: AppConfig, zone: u32, conditions: Conditions) -> TestOrchestrator {
    FrameOrchestrator::new(
        config,
        registry(),
        FakeWorld { zone, conditions },
        FakePlayer::default(),
        RecordingDuty::default(),
        RecordingNotifier::default(),
    )
}

/// Run one 100ms frame with the player at `pos`
fn step(o: &mut TestOrchestrator, secs: f32, pos: Vec3) -> RecordingRender {
    o.player_mut().position = Some(pos);
    let mut render = RecordingRender::default();
    o.frame(at(secs), 0.1, &mut render);
    render
}

// ─────────────────────────────────────────────────────────────────────────────
// Hazard prediction
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_approaching_player_sees_imminent_hazard() {
    let mut o = orchestrator(config(), ARENA, bound());
    step(&mut o, 0.0, Vec3::new(-21.0, 0.0, 0.0));
    let render = step(&mut o, 0.1, Vec3::new(-20.0, 0.0, 0.0));

    assert_eq!(o.phase(), Some(ArenaPhase::Stage1));
    assert!((o.kinematics().speed - 10.0).abs() < 1e-3);

    let outlines = render.outlines();
    assert_eq!(outlines.len(), 1);
    assert_eq!(
        outlines[0],
        (
            Outline::Circle {
                center: Vec3::ZERO,
                radius: 5.0
            },
            overlay_colors::IMMINENT
        )
    );

    // Activation at 1.9s lands in the [1.4, 2.6] crossing window
    let texts = render.texts();
    let (label_pos, color, text) = texts
        .iter()
        .find(|(_, _, t)| t.contains('['))
        .expect("hazard label");
    assert_eq!(text, "1.900 [1.50-2.50, 1.90]");
    assert_eq!(*color, overlay_colors::IMMINENT);
    assert!((*label_pos - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-4);
}

#[test]
fn test_stationary_outside_is_safe() {
    let mut o = orchestrator(config(), ARENA, bound());
    let pos = Vec3::new(-20.0, 0.0, 0.0);
    step(&mut o, 0.0, pos);
    let render = step(&mut o, 0.1, pos);

    let outlines = render.outlines();
    assert_eq!(outlines.len(), 1);
    assert_eq!(outlines[0].1, overlay_colors::SAFE);
    assert!(render.texts().iter().any(|(_, _, t)| t.ends_with(", 0.00]")));
}

#[test]
fn test_stationary_inside_is_imminent() {
    let mut o = orchestrator(config(), ARENA, bound());
    let pos = Vec3::new(1.0, 0.0, 0.0);
    step(&mut o, 0.0, pos);
    let render = step(&mut o, 0.1, pos);

    assert_eq!(render.outlines()[0].1, overlay_colors::IMMINENT);
    assert!(
        render
            .texts()
            .iter()
            .any(|(_, _, t)| t == "1.900 [0.00-inf, 1.90]")
    );
}

#[test]
fn test_lookahead_hides_distant_activations() {
    let mut config = config();
    config.prediction.lookahead_secs = 1.0;
    let mut o = orchestrator(config, ARENA, bound());

    let render = step(&mut o, 0.0, Vec3::new(-20.0, 0.0, 0.0));
    assert!(render.outlines().is_empty());

    // 0.9s before activation it shows up
    let render = step(&mut o, 1.1, Vec3::new(-20.0, 0.0, 0.0));
    assert_eq!(render.outlines().len(), 1);
}

#[test]
fn test_passed_one_shot_is_not_drawn() {
    let mut o = orchestrator(config(), ARENA, bound());
    step(&mut o, 0.0, Vec3::new(-20.0, 0.0, 0.0));
    let render = step(&mut o, 2.0, Vec3::new(-20.0, 0.0, 0.0));
    assert!(render.outlines().is_empty());
    assert!(o.map().expect("map").hazards()[0].next_activation().is_none());
}

#[test]
fn test_display_toggles() {
    let mut config = config();
    config.display.show_hazards = false;
    config.display.show_hazard_text = false;
    config.display.show_path = false;
    let mut o = orchestrator(config, ARENA, bound());
    let render = step(&mut o, 0.0, Vec3::new(-20.0, 0.0, 0.0));
    assert!(render.calls.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Route
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_route_colors_and_wait_text() {
    let mut o = orchestrator(config(), ARENA, bound());
    let pos = Vec3::new(-20.0, 0.0, 0.0);
    step(&mut o, 0.0, pos);
    let render = step(&mut o, 0.1, pos);

    let lines = render.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], (pos, Vec3::new(0.0, 0.0, 30.0), overlay_colors::WAIT));
    assert_eq!(
        lines[1],
        (
            Vec3::new(0.0, 0.0, 30.0),
            Vec3::new(10.0, 0.0, 40.0),
            overlay_colors::ROUTE
        )
    );
    assert!(
        render
            .texts()
            .contains(&(pos, overlay_colors::WAIT, "0.900".to_string()))
    );

    let render = step(&mut o, 1.0, pos);
    assert_eq!(render.lines()[0].2, overlay_colors::MOVE_NOW);
}

#[test]
fn test_route_urgency_follows_first_remaining_leg() {
    let mut o = orchestrator(config(), ARENA, bound());
    let waypoint = Vec3::new(0.0, 0.0, 30.0);
    step(&mut o, 0.0, waypoint);
    let render = step(&mut o, 1.0, waypoint);
    assert_eq!(o.map().expect("map").path().skip(), 1);

    // Next leg starts at 4.0, so it waits rather than showing as plain route
    let lines = render.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], (waypoint, Vec3::new(10.0, 0.0, 40.0), overlay_colors::WAIT));
}

// ─────────────────────────────────────────────────────────────────────────────
// Map selection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stage_switch_rebuilds_map() {
    let mut o = orchestrator(config(), ARENA, bound());
    step(&mut o, 0.0, Vec3::new(0.0, 0.0, -20.0));
    assert_eq!(o.phase(), Some(ArenaPhase::Stage1));

    step(&mut o, 1.0, Vec3::new(0.0, 0.0, 200.0));
    assert_eq!(o.phase(), Some(ArenaPhase::Stage3));
    assert_eq!(o.map().expect("map").started_at(), at(1.0));

    // Leaving the arena zone drops the map
    o.world_mut().zone = LOBBY;
    step(&mut o, 2.0, Vec3::ZERO);
    assert!(o.map().is_none());
}

#[test]
fn test_between_areas_freezes_map_and_overlays() {
    let mut o = orchestrator(config(), ARENA, bound());
    step(&mut o, 0.0, Vec3::new(-20.0, 0.0, 0.0));

    o.world_mut().conditions.between_areas = true;
    let render = step(&mut o, 0.5, Vec3::new(0.0, 0.0, 200.0));
    assert!(render.calls.is_empty());
    assert_eq!(o.phase(), Some(ArenaPhase::Stage1));

    o.world_mut().conditions.between_areas = false;
    step(&mut o, 1.0, Vec3::new(0.0, 0.0, 200.0));
    assert_eq!(o.phase(), Some(ArenaPhase::Stage3));
}

#[test]
fn test_missing_position_keeps_ticking() {
    let mut o = orchestrator(config(), ARENA, bound());
    o.player_mut().position = None;
    let mut render = RecordingRender::default();
    o.frame(at(0.0), 0.1, &mut render);
    assert_eq!(o.kinematics().speed, 0.0);
    // No position, no stage detection
    assert!(o.map().is_none());
}

#[test]
fn test_missing_position_keeps_current_map() {
    let mut o = orchestrator(config(), ARENA, bound());
    step(&mut o, 0.0, Vec3::new(0.0, 0.0, 200.0));
    assert_eq!(o.phase(), Some(ArenaPhase::Stage3));

    o.player_mut().position = None;
    let mut render = RecordingRender::default();
    o.frame(at(0.1), 0.1, &mut render);
    assert_eq!(o.phase(), Some(ArenaPhase::Stage3));

    step(&mut o, 0.2, Vec3::new(0.0, 0.0, 200.0));
    assert_eq!(o.phase(), Some(ArenaPhase::Stage3));
    assert_eq!(o.map().expect("map").started_at(), at(0.0));
}

#[test]
fn test_missing_position_leaves_map_position() {
    let mut o = orchestrator(config(), ARENA, bound());
    step(&mut o, 0.0, Vec3::new(-20.0, 0.0, 0.0));

    o.player_mut().position = None;
    let mut render = RecordingRender::default();
    o.frame(at(0.1), 0.1, &mut render);
    assert_eq!(o.map().expect("map").path().skip(), 0);
    assert_eq!(o.map().expect("map").player_pos(), Vec3::new(-20.0, 0.0, 0.0));
}

// ─────────────────────────────────────────────────────────────────────────────
// Automation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_auto_join_fires_once_after_delay() {
    let mut config = config();
    config.automation.auto_join = true;
    let mut o = orchestrator(config, LOBBY, Conditions::default());

    for secs in [0.0, 0.2, 0.4] {
        step(&mut o, secs, Vec3::ZERO);
        assert!(o.duty().calls.is_empty());
    }
    step(&mut o, 0.6, Vec3::ZERO);
    assert_eq!(o.duty().calls, vec![DutyCall::Register]);
    assert!(!o.is_duty_idle());

    // The game acknowledges the queue
    o.world_mut().conditions.waiting_for_duty = true;
    for i in 1..=50 {
        step(&mut o, 0.6 + i as f32 * 0.1, Vec3::ZERO);
    }
    assert_eq!(o.duty().count(DutyCall::Register), 1);
}

#[test]
fn test_auto_join_cancelled_by_queue_pop() {
    let mut config = config();
    config.automation.auto_join = true;
    let mut o = orchestrator(config, LOBBY, Conditions::default());

    step(&mut o, 0.0, Vec3::ZERO);
    o.world_mut().conditions.between_areas = true;
    step(&mut o, 0.2, Vec3::ZERO);
    o.world_mut().conditions.between_areas = false;
    // Re-armed at 0.4, so nothing may fire at the first 0.5
    step(&mut o, 0.4, Vec3::ZERO);
    step(&mut o, 0.6, Vec3::ZERO);
    assert!(o.duty().calls.is_empty());

    step(&mut o, 0.9, Vec3::ZERO);
    assert_eq!(o.duty().count(DutyCall::Register), 1);
}

#[test]
fn test_auto_leave_when_not_solo() {
    let mut config = config();
    config.automation.auto_leave_if_not_solo = true;
    let mut o = orchestrator(config, ARENA, bound());
    o.player_mut().player_count = 3;

    for i in 0..6 {
        step(&mut o, i as f32 * 0.5, Vec3::ZERO);
    }
    assert_eq!(o.headcount(), 3);
    assert!(o.duty().calls.is_empty());
    assert!(o.status_lines(at(2.5))[0].starts_with("Players: 3 (auto-leave: in 0.5s)"));

    step(&mut o, 3.0, Vec3::ZERO);
    assert_eq!(o.duty().calls, vec![DutyCall::Leave]);
}

#[test]
fn test_auto_leave_cancelled_when_players_leave() {
    let mut config = config();
    config.automation.auto_leave_if_not_solo = true;
    let mut o = orchestrator(config, ARENA, bound());
    o.player_mut().player_count = 2;

    step(&mut o, 0.0, Vec3::ZERO);
    step(&mut o, 1.0, Vec3::ZERO);
    o.player_mut().player_count = 1;
    for i in 2..10 {
        step(&mut o, i as f32, Vec3::ZERO);
    }
    assert!(o.duty().calls.is_empty());
    assert_eq!(o.headcount(), 1);
}

#[test]
fn test_headcount_zero_outside_duty() {
    let mut config = config();
    config.automation.auto_leave_if_not_solo = true;
    let mut o = orchestrator(config, ARENA, Conditions::default());
    o.player_mut().player_count = 5;
    for i in 0..10 {
        step(&mut o, i as f32, Vec3::ZERO);
    }
    assert_eq!(o.headcount(), 0);
    assert!(o.duty().calls.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

fn chat_config() -> AppConfig {
    let mut config = config();
    config.chat.round_starting = vec!["about to begin".to_string()];
    config.chat.reward_granted = vec!["You obtain {n} MGP.".to_string()];
    config.notify.enabled = true;
    config.notify.account_name = "Alt".to_string();
    config.notify.recipient = "1001".to_string();
    config.notify.sender = "2002".to_string();
    config
}

#[test]
fn test_round_start_sends_notification() {
    let mut o = orchestrator(chat_config(), ARENA, bound());
    step(&mut o, 0.0, Vec3::ZERO);
    o.on_chat_line(at(0.1), "The show is about to begin!");

    let sent = &o.notifier().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "Alt: 1-player match");
    assert_eq!(sent[0].recipient, "1001");
    assert_eq!(sent[0].sender, "2002");
}

#[test]
fn test_notification_failure_is_not_fatal() {
    let mut o = orchestrator(chat_config(), ARENA, bound());
    step(&mut o, 0.0, Vec3::ZERO);
    o.notifier.closed = true;
    o.on_chat_line(at(0.1), "about to begin");
    assert!(o.notifier().sent.is_empty());

    // Frames keep running
    step(&mut o, 0.2, Vec3::ZERO);
    assert_eq!(o.phase(), Some(ArenaPhase::Stage1));
}

#[test]
fn test_reward_leaves_when_farming() {
    let mut config = chat_config();
    config.automation.farming_mode = true;
    let mut o = orchestrator(config, ARENA, bound());
    step(&mut o, 0.0, Vec3::ZERO);

    o.on_chat_line(at(0.1), "You obtain 150 MGP.");
    assert_eq!(o.duty().calls, vec![DutyCall::Leave]);
    assert!(o.status_lines(at(0.1)).contains(&"Last reward: 150".to_string()));
}

#[test]
fn test_reward_waits_for_final_stage() {
    let mut config = chat_config();
    config.automation.leave_after_final_stage = true;
    let mut o = orchestrator(config, ARENA, bound());

    step(&mut o, 0.0, Vec3::ZERO);
    o.on_chat_line(at(0.1), "You obtain 10 MGP.");
    assert!(o.duty().calls.is_empty());

    step(&mut o, 1.0, Vec3::new(0.0, 0.0, 200.0));
    o.on_chat_line(at(1.1), "You obtain 50 MGP.");
    assert_eq!(o.duty().calls, vec![DutyCall::Leave]);
}

#[test]
fn test_manual_requests_share_busy_flag() {
    let mut o = orchestrator(config(), LOBBY, Conditions::default());
    assert!(o.request_join(at(0.0)));
    assert!(!o.request_leave(at(0.5)));

    // Cooldown clears on the next frame after it expires
    step(&mut o, 2.0, Vec3::ZERO);
    assert!(o.request_leave(at(2.0)));
    assert_eq!(o.duty().calls, vec![DutyCall::Register, DutyCall::Leave]);
}
