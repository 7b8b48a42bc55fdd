//! Gating conditions for the join and leave triggers

use dodger_types::{AutomationSettings, ZoneSettings};

use crate::host::Conditions;

/// Everything the gates look at, sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateInputs {
    pub overlay_open: bool,
    pub zone: u32,
    pub conditions: Conditions,
    pub duty_idle: bool,
    pub headcount: u32,
}

/// Player count that counts towards "not solo".
///
/// Only meaningful while inside the arena, bound by the duty and not loading;
/// zero otherwise.
pub fn headcount(zones: &ZoneSettings, zone: u32, conditions: Conditions, player_count: u32) -> u32 {
    if zone == zones.arena_zone && conditions.bound_by_duty && !conditions.between_areas {
        player_count
    } else {
        0
    }
}

pub fn join_gate(settings: &AutomationSettings, zones: &ZoneSettings, inputs: &GateInputs) -> bool {
    settings.auto_join
        && inputs.overlay_open
        && inputs.zone == zones.lobby_zone
        && !inputs.conditions.waiting_for_duty
        && !inputs.conditions.between_areas
        && inputs.duty_idle
}

pub fn leave_gate(settings: &AutomationSettings, inputs: &GateInputs) -> bool {
    settings.auto_leave_if_not_solo
        && inputs.headcount > settings.auto_leave_player_limit
        && inputs.duty_idle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby_inputs() -> GateInputs {
        GateInputs {
            overlay_open: true,
            zone: 1197,
            conditions: Conditions::default(),
            duty_idle: true,
            headcount: 0,
        }
    }

    fn enabled() -> AutomationSettings {
        AutomationSettings {
            auto_join: true,
            auto_leave_if_not_solo: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_join_gate_requires_every_flag() {
        let zones = ZoneSettings::default();
        let settings = enabled();
        assert!(join_gate(&settings, &zones, &lobby_inputs()));

        let mut inputs = lobby_inputs();
        inputs.conditions.waiting_for_duty = true;
        assert!(!join_gate(&settings, &zones, &inputs));

        let mut inputs = lobby_inputs();
        inputs.conditions.between_areas = true;
        assert!(!join_gate(&settings, &zones, &inputs));

        let mut inputs = lobby_inputs();
        inputs.duty_idle = false;
        assert!(!join_gate(&settings, &zones, &inputs));

        let mut inputs = lobby_inputs();
        inputs.zone = 1165;
        assert!(!join_gate(&settings, &zones, &inputs));

        let mut inputs = lobby_inputs();
        inputs.overlay_open = false;
        assert!(!join_gate(&settings, &zones, &inputs));

        let disabled = AutomationSettings::default();
        assert!(!join_gate(&disabled, &zones, &lobby_inputs()));
    }

    #[test]
    fn test_headcount_only_inside_duty() {
        let zones = ZoneSettings::default();
        let bound = Conditions {
            bound_by_duty: true,
            ..Default::default()
        };
        assert_eq!(headcount(&zones, 1165, bound, 3), 3);
        assert_eq!(headcount(&zones, 1197, bound, 3), 0);
        assert_eq!(headcount(&zones, 1165, Conditions::default(), 3), 0);

        let loading = Conditions {
            between_areas: true,
            ..bound
        };
        assert_eq!(headcount(&zones, 1165, loading, 3), 0);
    }

    #[test]
    fn test_leave_gate_compares_against_limit() {
        let settings = enabled();
        let mut inputs = lobby_inputs();

        inputs.headcount = 1;
        assert!(!leave_gate(&settings, &inputs));

        inputs.headcount = 2;
        assert!(leave_gate(&settings, &inputs));

        inputs.duty_idle = false;
        assert!(!leave_gate(&settings, &inputs));
    }
}
