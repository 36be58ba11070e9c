/// Mission sequencer: ambient idle, nitro charge, takeoff cue, stepped
/// transit to Mercury, fade-out on arrival.
///
/// Pure state: the sequencer never touches audio, camera or scene. It
/// reports what happened as `SequencerEffect`s and the game applies them.

use orrery_engine::{Easing, FixedTimestep, FrameGate, Tween};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AmbientIdle,
    Charging,
    Takeoff,
    Transit,
    Arrived,
}

/// Speed unit chosen in the overlay. Kilometers is the gated unit that
/// enables the launch; once chosen it cannot be switched back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[default]
    LightYears,
    Kilometers,
}

/// Things the game must do in response to a sequencer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequencerEffect {
    /// Charge crossed the threshold: start the takeoff cue.
    PlayTakeoff,
    /// Thrust released before the cue finished: stop and rewind it.
    CancelTakeoff,
    /// Cue finished: silence the idle loop, transit begins.
    StopAmbient,
    /// Ship advanced to this coordinate along the travel axis.
    ShipMoved(f32),
    /// Destination reached: start the fade to black.
    BeginFade,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SequencerSettings {
    /// Seconds per charge tick.
    pub charge_tick: f32,
    pub charge_step: f32,
    pub decay_step: f32,
    /// Charge cap in the gated unit; also the takeoff threshold.
    pub gated_cap: f32,
    pub open_cap: f32,
    pub start_position: f32,
    pub destination: f32,
    pub transit_step: f32,
    pub transit_fps: f32,
    pub fade_seconds: f32,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            charge_tick: 0.05,
            charge_step: 2.0,
            decay_step: 1.0,
            gated_cap: 9.1,
            open_cap: 100.0,
            start_position: -200.0,
            destination: 200.0,
            transit_step: 25.0,
            transit_fps: 120.0,
            fade_seconds: 3.0,
        }
    }
}

pub struct MissionSequencer {
    settings: SequencerSettings,
    phase: Phase,
    unit: SpeedUnit,
    charge_level: f32,
    travel_position: f32,
    charge_clock: FixedTimestep,
    /// Thrust state seen last frame; the charge clock restarts on every edge.
    thrust_held: bool,
    transit_gate: FrameGate,
    /// Overlay opacity 0 → 1, present once arrived.
    fade: Option<Tween<f32>>,
}

impl MissionSequencer {
    pub fn new(settings: SequencerSettings) -> Self {
        Self {
            charge_clock: FixedTimestep::new(settings.charge_tick),
            thrust_held: false,
            transit_gate: FrameGate::new(settings.transit_fps),
            phase: Phase::AmbientIdle,
            unit: SpeedUnit::default(),
            charge_level: 0.0,
            travel_position: settings.start_position,
            fade: None,
            settings,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn unit(&self) -> SpeedUnit {
        self.unit
    }

    pub fn charge_level(&self) -> f32 {
        self.charge_level
    }

    pub fn travel_position(&self) -> f32 {
        self.travel_position
    }

    pub fn settings(&self) -> &SequencerSettings {
        &self.settings
    }

    /// Current fade overlay opacity, 0 until arrival.
    pub fn fade_opacity(&self) -> f32 {
        self.fade.as_ref().map_or(0.0, Tween::value)
    }

    /// Upper bound of the charge level in the active unit.
    pub fn charge_cap(&self) -> f32 {
        match self.unit {
            SpeedUnit::Kilometers => self.settings.gated_cap,
            SpeedUnit::LightYears => self.settings.open_cap,
        }
    }

    pub fn is_gated(&self) -> bool {
        self.unit == SpeedUnit::Kilometers
    }

    /// Switch units. Returns false when the request is refused
    /// (leaving Kilometers is not allowed).
    pub fn select_unit(&mut self, unit: SpeedUnit) -> bool {
        if self.unit == SpeedUnit::Kilometers && unit != SpeedUnit::Kilometers {
            return false;
        }
        if self.unit != unit {
            log::info!("speed unit {:?} -> {:?}", self.unit, unit);
            self.unit = unit;
        }
        true
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            log::info!("mission {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// One frame. `thrust_held` is the current state of the thrust key.
    pub fn update(&mut self, thrust_held: bool, dt: f32) -> Vec<SequencerEffect> {
        let mut effects = Vec::new();

        // First step after a press or release lands a full tick later.
        if thrust_held != self.thrust_held {
            self.thrust_held = thrust_held;
            self.charge_clock.reset();
        }

        match self.phase {
            Phase::AmbientIdle if thrust_held && self.is_gated() => {
                self.set_phase(Phase::Charging);
            }
            Phase::Takeoff if !thrust_held => {
                self.set_phase(Phase::Charging);
                effects.push(SequencerEffect::CancelTakeoff);
            }
            _ => {}
        }

        for _ in 0..self.charge_clock.accumulate(dt) {
            self.charge_tick(thrust_held);
            if self.phase == Phase::Charging {
                if thrust_held && self.charge_level >= self.settings.gated_cap {
                    self.set_phase(Phase::Takeoff);
                    effects.push(SequencerEffect::PlayTakeoff);
                } else if !thrust_held && self.charge_level <= 0.0 {
                    self.set_phase(Phase::AmbientIdle);
                }
            }
        }

        match self.phase {
            Phase::Transit => self.transit_step(dt, &mut effects),
            Phase::Arrived => {
                if let Some(fade) = self.fade.as_mut() {
                    fade.tick(dt);
                }
            }
            _ => {}
        }

        effects
    }

    fn charge_tick(&mut self, thrust_held: bool) {
        if thrust_held {
            if self.is_gated() {
                self.charge_level = (self.charge_level + self.settings.charge_step).min(self.charge_cap());
            }
        } else {
            self.charge_level = (self.charge_level - self.settings.decay_step).max(0.0);
        }
    }

    fn transit_step(&mut self, dt: f32, effects: &mut Vec<SequencerEffect>) {
        if !self.transit_gate.admit(dt) {
            return;
        }
        let next = self.travel_position + self.settings.transit_step;
        if next >= self.settings.destination {
            self.travel_position = self.settings.destination;
            effects.push(SequencerEffect::ShipMoved(self.travel_position));
            self.set_phase(Phase::Arrived);
            self.fade = Some(Tween::new(0.0, 1.0, self.settings.fade_seconds, Easing::SineInOut));
            effects.push(SequencerEffect::BeginFade);
        } else {
            self.travel_position = next;
            effects.push(SequencerEffect::ShipMoved(next));
        }
    }

    /// The takeoff cue finished playing. Ignored outside Takeoff.
    pub fn on_takeoff_complete(&mut self) -> Vec<SequencerEffect> {
        if self.phase != Phase::Takeoff {
            return Vec::new();
        }
        self.transit_gate = FrameGate::new(self.settings.transit_fps);
        self.set_phase(Phase::Transit);
        vec![SequencerEffect::StopAmbient]
    }
}
