/// Orbital and rotational integrator.
///
/// Angles advance linearly with time at the ephemeris rates and are wrapped
/// to [0, 2π) after every step, so a session left open for weeks keeps full
/// precision. Positions are derived from the angles on demand, never stored.
///
/// All math is f64; conversion to f32 happens when writing entities.

use std::f64::consts::TAU;
use glam::DVec3;
use crate::bodies::{CelestialBody, Ephemeris};

/// Uniform flattening of every planetary orbit along Z.
pub const ELLIPTICAL_FACTOR: f64 = 0.1;

/// Largest step the integrator accepts; longer gaps are clamped.
pub const MAX_STEP_SECONDS: f64 = 0.25;

/// Phase of one body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitalState {
    pub orbital_angle: f64,
    pub rotation_angle: f64,
}

impl OrbitalState {
    /// Orbital phase from the ephemeris, spin starting at zero.
    pub fn initial(body: &CelestialBody) -> Self {
        Self {
            orbital_angle: body.orbit().map_or(0.0, |o| o.initial_angle),
            rotation_angle: 0.0,
        }
    }
}

/// Advance one body by `dt` seconds. Pure and unclamped; negative or NaN
/// deltas are treated as zero.
pub fn advance(body: &CelestialBody, state: OrbitalState, dt: f64) -> OrbitalState {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let orbital_rate = body.orbit().map_or(0.0, |o| o.angular_velocity);
    OrbitalState {
        orbital_angle: (state.orbital_angle + orbital_rate * dt).rem_euclid(TAU),
        rotation_angle: (state.rotation_angle + body.rotational_angular_velocity() * dt)
            .rem_euclid(TAU),
    }
}

/// Offset from the parent (or the origin) for the current phase.
///
/// Planets trace a flattened ellipse; moons a circle whose radius is scaled
/// by `distance_scale` (the hover "spread" effect).
pub fn local_offset(body: &CelestialBody, state: &OrbitalState, distance_scale: f64) -> DVec3 {
    let Some(orbit) = body.orbit() else {
        return DVec3::ZERO;
    };
    let (sin, cos) = state.orbital_angle.sin_cos();
    if body.parent().is_some() {
        let r = orbit.radius * distance_scale;
        DVec3::new(cos * r, 0.0, sin * r)
    } else {
        DVec3::new(cos * orbit.radius, 0.0, sin * orbit.radius * (1.0 - ELLIPTICAL_FACTOR))
    }
}

/// Wall-clock seeded simulation time, advanced at real-time rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    elapsed: f64,
    max_step: f64,
}

impl SimulationClock {
    pub fn new(seed_seconds: f64) -> Self {
        Self {
            elapsed: seed_seconds,
            max_step: MAX_STEP_SECONDS,
        }
    }

    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    /// Clamp `raw_dt` to [0, max_step], accumulate it and return it.
    pub fn advance(&mut self, raw_dt: f64) -> f64 {
        let dt = if raw_dt.is_finite() {
            raw_dt.clamp(0.0, self.max_step)
        } else {
            0.0
        };
        self.elapsed += dt;
        dt
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// Phases of every body in an `Ephemeris`, indexed the same way.
pub struct Integrator {
    clock: SimulationClock,
    states: Vec<OrbitalState>,
}

impl Integrator {
    pub fn new(ephemeris: &Ephemeris, now_seconds: f64) -> Self {
        Self {
            clock: SimulationClock::new(now_seconds),
            states: ephemeris.bodies().iter().map(OrbitalState::initial).collect(),
        }
    }

    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.clock = self.clock.with_max_step(max_step);
        self
    }

    /// One frame: clamp the delta, then advance every body by it.
    pub fn step_frame(&mut self, ephemeris: &Ephemeris, raw_dt: f64) -> f64 {
        let dt = self.clock.advance(raw_dt);
        for (state, body) in self.states.iter_mut().zip(ephemeris.bodies()) {
            *state = advance(body, *state, dt);
        }
        dt
    }

    pub fn state(&self, index: usize) -> Option<OrbitalState> {
        self.states.get(index).copied()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// World positions for this frame. Children are placed relative to where
    /// their parent is now, so this must run after every `step_frame`.
    pub fn world_positions(
        &self,
        ephemeris: &Ephemeris,
        distance_scale: impl Fn(usize) -> f64,
    ) -> Vec<DVec3> {
        let mut positions: Vec<DVec3> = Vec::with_capacity(self.states.len());
        for (i, (body, state)) in ephemeris.bodies().iter().zip(&self.states).enumerate() {
            let base = body
                .parent()
                .and_then(|p| positions.get(p).copied())
                .unwrap_or(DVec3::ZERO);
            positions.push(base + local_offset(body, state, distance_scale(i)));
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{SECONDS_PER_DAY, PLANETS, SUN};

    const EPS: f64 = 1e-9;

    fn angle_diff(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    fn solar_system() -> Ephemeris {
        Ephemeris::solar_system(1_700_000_000.0).unwrap()
    }

    #[test]
    fn full_period_returns_to_start() {
        let eph = solar_system();
        for body in eph.bodies() {
            let Some(orbit) = body.orbit() else { continue };
            let start = OrbitalState::initial(body);
            let end = advance(body, start, orbit.period_seconds);
            assert!(
                angle_diff(end.orbital_angle, start.orbital_angle) < EPS,
                "{}",
                body.name()
            );
        }
    }

    #[test]
    fn advance_is_additive() {
        let eph = solar_system();
        let deltas = [(0.0, 0.0), (0.016, 0.033), (1.5, 3600.0), (86_400.0, 7.25)];
        for body in eph.bodies() {
            let start = OrbitalState::initial(body);
            for &(d1, d2) in &deltas {
                let twice = advance(body, advance(body, start, d1), d2);
                let once = advance(body, start, d1 + d2);
                assert!(angle_diff(twice.orbital_angle, once.orbital_angle) < EPS);
                assert!(angle_diff(twice.rotation_angle, once.rotation_angle) < EPS);
            }
        }
    }

    #[test]
    fn earth_after_one_year_is_unchanged() {
        let eph = Ephemeris::from_specs(&[PLANETS[2]], 0.0).unwrap();
        let earth = eph.get(0).unwrap();
        let year = 365.25 * SECONDS_PER_DAY;
        assert_eq!(earth.orbit().unwrap().period_seconds, year);
        let start = OrbitalState {
            orbital_angle: 1.0,
            rotation_angle: 0.0,
        };
        let end = advance(earth, start, year);
        assert!(angle_diff(end.orbital_angle, 1.0) < EPS);
    }

    #[test]
    fn angles_stay_wrapped() {
        let eph = solar_system();
        let earth = eph.by_name("earth").unwrap();
        let mut state = OrbitalState::initial(earth);
        for _ in 0..1000 {
            state = advance(earth, state, 86_400.0 * 3.7);
            assert!((0.0..TAU).contains(&state.orbital_angle));
            assert!((0.0..TAU).contains(&state.rotation_angle));
        }
    }

    #[test]
    fn negative_and_nan_deltas_do_nothing() {
        let eph = solar_system();
        let mars = eph.by_name("mars").unwrap();
        let start = OrbitalState::initial(mars);
        assert_eq!(advance(mars, start, -1.0), start);
        assert_eq!(advance(mars, start, f64::NAN), start);
    }

    #[test]
    fn planet_orbit_is_flattened() {
        let eph = solar_system();
        let venus = eph.by_name("venus").unwrap();
        let at = |angle: f64| {
            let state = OrbitalState {
                orbital_angle: angle,
                rotation_angle: 0.0,
            };
            local_offset(venus, &state, 1.0)
        };
        let east = at(0.0);
        assert!((east.x - 60.0).abs() < EPS && east.z.abs() < EPS && east.y == 0.0);
        let north = at(std::f64::consts::FRAC_PI_2);
        assert!((north.z - 54.0).abs() < EPS && north.x.abs() < EPS);
    }

    #[test]
    fn moon_follows_earth_every_frame() {
        let eph = solar_system();
        let earth = eph.index_of("earth").unwrap();
        let moon = eph.index_of("moon").unwrap();
        let mut integrator = Integrator::new(&eph, 0.0);

        for scale in [1.0, 1.3] {
            integrator.step_frame(&eph, 0.016);
            let positions = integrator.world_positions(&eph, |i| if i == moon { scale } else { 1.0 });
            let offset = positions[moon] - positions[earth];
            assert!((offset.length() - 10.0 * scale).abs() < 1e-9);
        }
    }

    #[test]
    fn step_frame_clamps_long_gaps() {
        let eph = solar_system();
        let mut integrator = Integrator::new(&eph, 100.0);
        assert_eq!(integrator.step_frame(&eph, 5.0), MAX_STEP_SECONDS);
        assert_eq!(integrator.step_frame(&eph, -0.1), 0.0);
        assert!((integrator.clock().elapsed() - 100.25).abs() < EPS);

        let earth = eph.get(3).unwrap();
        let expected = advance(earth, OrbitalState::initial(earth), MAX_STEP_SECONDS);
        assert_eq!(integrator.state(3), Some(expected));
    }

    #[test]
    fn sun_stays_at_origin() {
        let eph = Ephemeris::from_specs(&[SUN], 0.0).unwrap();
        let mut integrator = Integrator::new(&eph, 0.0);
        integrator.step_frame(&eph, 0.1);
        assert_eq!(integrator.world_positions(&eph, |_| 1.0)[0], DVec3::ZERO);
    }
}
