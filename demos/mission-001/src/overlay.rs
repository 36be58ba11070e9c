/// HUD state for the mission: nitro gauge, speed readout, level banner,
/// mission log and the arrival fade. The host renders it from JSON.

use serde::Serialize;
use crate::sequencer::{MissionSequencer, Phase, SpeedUnit};
use crate::settings::Starfield;

pub const INFO_LINES: [&str; 3] = [
    "Distance to Mercury: 91,000,000 km",
    "Time to reach Mercury: 1 second",
    "Speed of light: 299,792,458 m/s",
];

pub const OBJECTIVE_UNIT: &str = "Change the speed unit to Kilometers";
pub const OBJECTIVE_SPEED: &str = "Adjust the speed to arrive in 1 second";

/// Dismissable mission log. Hiding it is immediate; the button that brings
/// it back only appears once the hide transition has played out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionLog {
    visible: bool,
    dismissed: bool,
}

impl Default for MissionLog {
    fn default() -> Self {
        Self {
            visible: true,
            dismissed: false,
        }
    }
}

impl MissionLog {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn show_button(&self) -> bool {
        self.dismissed
    }

    /// Returns true when this actually hid the log.
    pub fn dismiss(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    /// The hide transition finished.
    pub fn settle(&mut self) {
        if !self.visible {
            self.dismissed = true;
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
        self.dismissed = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Objective {
    pub text: &'static str,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionLogView {
    pub visible: bool,
    pub show_button: bool,
    pub objectives: Vec<Objective>,
    pub info: [&'static str; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitButtons {
    pub selected: SpeedUnit,
    pub light_years_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayState {
    pub phase: Phase,
    /// Everything but the fade waits for loading to settle.
    pub loaded: bool,
    pub units: UnitButtons,
    pub nitro_percent: f32,
    /// Threshold marker on the gauge, only in the gated unit.
    pub nitro_marker: Option<f32>,
    pub speed_readout: String,
    pub level_indicator: bool,
    pub mission_log: MissionLogView,
    pub fade_opacity: f32,
    pub starfield: Starfield,
}

/// Speed shown next to the gauge, e.g. `91mil Km/s` at the threshold.
pub fn speed_readout(unit: SpeedUnit, level: f32) -> String {
    match unit {
        SpeedUnit::LightYears => format!("{}mil Ly/s", level.round() as i64),
        SpeedUnit::Kilometers => format!("{}mil Km/s", (level / 100.0 * 1000.0).round() as i64),
    }
}

pub fn objectives(seq: &MissionSequencer) -> Vec<Objective> {
    let gated = seq.is_gated();
    vec![
        Objective {
            text: OBJECTIVE_UNIT,
            done: gated,
        },
        Objective {
            text: OBJECTIVE_SPEED,
            done: gated && seq.charge_level() >= seq.settings().gated_cap,
        },
    ]
}

impl OverlayState {
    pub fn build(
        seq: &MissionSequencer,
        log: &MissionLog,
        loaded: bool,
        level_shown: bool,
        starfield: Starfield,
    ) -> Self {
        let unit = seq.unit();
        Self {
            phase: seq.phase(),
            loaded,
            units: UnitButtons {
                selected: unit,
                light_years_enabled: !seq.is_gated(),
            },
            nitro_percent: seq.charge_level(),
            nitro_marker: seq.is_gated().then_some(seq.settings().gated_cap),
            speed_readout: speed_readout(unit, seq.charge_level()),
            level_indicator: level_shown && loaded,
            mission_log: MissionLogView {
                visible: log.is_visible(),
                show_button: log.show_button(),
                objectives: objectives(seq),
                info: INFO_LINES,
            },
            fade_opacity: seq.fade_opacity(),
            starfield,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::SequencerSettings;

    fn build(seq: &MissionSequencer) -> OverlayState {
        OverlayState::build(seq, &MissionLog::default(), true, false, Starfield::default())
    }

    #[test]
    fn readouts() {
        assert_eq!(speed_readout(SpeedUnit::Kilometers, 9.1), "91mil Km/s");
        assert_eq!(speed_readout(SpeedUnit::Kilometers, 0.0), "0mil Km/s");
        assert_eq!(speed_readout(SpeedUnit::LightYears, 42.4), "42mil Ly/s");
    }

    #[test]
    fn objectives_strike_through() {
        let mut seq = MissionSequencer::new(SequencerSettings::default());
        assert!(objectives(&seq).iter().all(|o| !o.done));

        seq.select_unit(SpeedUnit::Kilometers);
        let o = objectives(&seq);
        assert!(o[0].done);
        assert!(!o[1].done);

        for _ in 0..5 {
            seq.update(true, 0.05);
        }
        assert!(objectives(&seq).iter().all(|o| o.done));
    }

    #[test]
    fn marker_and_unit_lock_follow_the_gated_unit() {
        let mut seq = MissionSequencer::new(SequencerSettings::default());
        let state = build(&seq);
        assert_eq!(state.nitro_marker, None);
        assert!(state.units.light_years_enabled);

        seq.select_unit(SpeedUnit::Kilometers);
        let state = build(&seq);
        assert_eq!(state.nitro_marker, Some(9.1));
        assert!(!state.units.light_years_enabled);
        assert_eq!(state.units.selected, SpeedUnit::Kilometers);
    }

    #[test]
    fn level_banner_waits_for_load() {
        let seq = MissionSequencer::new(SequencerSettings::default());
        let log = MissionLog::default();
        assert!(!OverlayState::build(&seq, &log, false, true, Starfield::default()).level_indicator);
        assert!(OverlayState::build(&seq, &log, true, true, Starfield::default()).level_indicator);
        assert!(!OverlayState::build(&seq, &log, true, false, Starfield::default()).level_indicator);
    }

    #[test]
    fn log_dismiss_then_show() {
        let mut log = MissionLog::default();
        assert!(log.dismiss());
        assert!(!log.is_visible());
        assert!(!log.show_button());
        assert!(!log.dismiss());

        log.settle();
        assert!(log.show_button());

        log.show();
        assert!(log.is_visible());
        assert!(!log.show_button());

        // A late settle after showing again is ignored.
        log.settle();
        assert!(!log.show_button());
    }

    #[test]
    fn serializes_for_the_host() {
        let seq = MissionSequencer::new(SequencerSettings::default());
        let json = serde_json::to_value(build(&seq)).unwrap();
        assert_eq!(json["phase"], "ambient_idle");
        assert_eq!(json["speed_readout"], "0mil Ly/s");
        assert_eq!(json["nitro_marker"], serde_json::Value::Null);
        assert_eq!(json["mission_log"]["info"][2], "Speed of light: 299,792,458 m/s");
        assert_eq!(json["units"]["selected"], "LightYears");
        assert_eq!(json["starfield"]["count"], 50_000);
    }
}
