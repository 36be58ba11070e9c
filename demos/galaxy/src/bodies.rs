/// Ephemeris: per-body constants and the angular velocities derived from them.
///
/// Distances and radii are scene units, exaggerated for readability. Periods
/// are real: Earth takes a real year to go round, Jupiter a real 9.9 hours to
/// spin once. Initial phases come from the wall clock, so the layout on
/// screen matches the actual time of day and year.

use std::f64::consts::TAU;
use std::fmt;
use orrery_engine::Color;
use thiserror::Error;

pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyClass {
    Star,
    InnerPlanet,
    OuterPlanet,
    Moon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Orbital,
    Rotation,
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKind::Orbital => f.write_str("orbital"),
            PeriodKind::Rotation => f.write_str("rotation"),
        }
    }
}

/// Errors raised while building the ephemeris. All of them are fatal
/// configuration errors: a body with a bad period would spin at NaN.
#[derive(Debug, Error, PartialEq)]
pub enum EphemerisError {
    #[error("{body}: {kind} period must be positive, got {value}")]
    NonPositivePeriod {
        body: String,
        kind: PeriodKind,
        value: f64,
    },
    #[error("{body}: {kind} period is not finite")]
    NonFinitePeriod { body: String, kind: PeriodKind },
    #[error("{body}: parent `{parent}` is not a top-level body")]
    UnknownParent { body: String, parent: String },
    #[error("{body}: orbiting bodies need an orbital period")]
    MissingOrbit { body: String },
}

// ── Data tables ──────────────────────────────────────────────────────

/// Static description of one body, as written in the tables below.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySpec {
    pub name: &'static str,
    pub class: BodyClass,
    /// Orbit radius around the parent (or the sun), scene units.
    pub distance: f64,
    /// Sphere radius, scene units.
    pub radius: f64,
    /// `None` for the star, which sits at the origin.
    pub orbital_period_days: Option<f64>,
    pub rotation_period_hours: f64,
    pub color: u32,
    /// Name of the body this one orbits, if not the sun.
    pub parent: Option<&'static str>,
}

pub const SUN_RADIUS: f64 = 25.0;
pub const SUN_EMISSIVE: u32 = 0xff8c00;
pub const SUN_EMISSIVE_INTENSITY: f32 = 2.5;

pub const SUN: BodySpec = BodySpec {
    name: "sun",
    class: BodyClass::Star,
    distance: 0.0,
    radius: SUN_RADIUS,
    orbital_period_days: None,
    rotation_period_hours: 609.12,
    color: 0xffd700,
    parent: None,
};

pub const PLANETS: [BodySpec; 8] = [
    BodySpec {
        name: "mercury",
        class: BodyClass::InnerPlanet,
        distance: 40.0,
        radius: 2.0,
        orbital_period_days: Some(87.97),
        rotation_period_hours: 1407.6,
        color: 0x8c8c8c,
        parent: None,
    },
    BodySpec {
        name: "venus",
        class: BodyClass::InnerPlanet,
        distance: 60.0,
        radius: 4.0,
        orbital_period_days: Some(224.7),
        rotation_period_hours: 5832.5,
        color: 0xe6b800,
        parent: None,
    },
    BodySpec {
        name: "earth",
        class: BodyClass::InnerPlanet,
        distance: 80.0,
        radius: 4.5,
        orbital_period_days: Some(365.25),
        rotation_period_hours: 23.934,
        color: 0x4b9fe3,
        parent: None,
    },
    BodySpec {
        name: "mars",
        class: BodyClass::InnerPlanet,
        distance: 100.0,
        radius: 2.5,
        orbital_period_days: Some(686.98),
        rotation_period_hours: 24.623,
        color: 0xff6b4d,
        parent: None,
    },
    BodySpec {
        name: "jupiter",
        class: BodyClass::OuterPlanet,
        distance: 200.0,
        radius: 12.0,
        orbital_period_days: Some(4332.59),
        rotation_period_hours: 9.925,
        color: 0xe3a372,
        parent: None,
    },
    BodySpec {
        name: "saturn",
        class: BodyClass::OuterPlanet,
        distance: 300.0,
        radius: 10.0,
        orbital_period_days: Some(10759.22),
        rotation_period_hours: 10.656,
        color: 0xf4d03f,
        parent: None,
    },
    BodySpec {
        name: "uranus",
        class: BodyClass::OuterPlanet,
        distance: 400.0,
        radius: 5.0,
        orbital_period_days: Some(30688.5),
        rotation_period_hours: 17.24,
        color: 0x73c2fb,
        parent: None,
    },
    BodySpec {
        name: "neptune",
        class: BodyClass::OuterPlanet,
        distance: 500.0,
        radius: 5.0,
        orbital_period_days: Some(60182.0),
        rotation_period_hours: 16.11,
        color: 0x3498db,
        parent: None,
    },
];

pub const MOON: BodySpec = BodySpec {
    name: "moon",
    class: BodyClass::Moon,
    distance: 10.0,
    radius: 1.0,
    orbital_period_days: Some(27.32),
    rotation_period_hours: 655.72,
    color: 0xc2c2c2,
    parent: Some("earth"),
};

// ── Bodies ───────────────────────────────────────────────────────────

/// Orbit constants of a body that goes round something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub radius: f64,
    pub period_seconds: f64,
    /// rad/s, 2π / period.
    pub angular_velocity: f64,
    /// Phase at process start, radians in [0, 2π).
    pub initial_angle: f64,
}

/// Immutable constants of one body. Rebuild instead of editing.
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    name: String,
    class: BodyClass,
    radius: f64,
    color: Color,
    rotation_period_hours: f64,
    rotational_angular_velocity: f64,
    orbit: Option<Orbit>,
    parent: Option<usize>,
}

fn checked_period(body: &str, kind: PeriodKind, value: f64) -> Result<f64, EphemerisError> {
    if !value.is_finite() {
        return Err(EphemerisError::NonFinitePeriod {
            body: body.to_owned(),
            kind,
        });
    }
    if value <= 0.0 {
        return Err(EphemerisError::NonPositivePeriod {
            body: body.to_owned(),
            kind,
            value,
        });
    }
    Ok(value)
}

/// Phase of a periodic motion at `now_seconds` since the epoch, in [0, 2π).
pub fn initial_phase(now_seconds: f64, period_seconds: f64) -> f64 {
    (now_seconds / period_seconds).rem_euclid(1.0) * TAU
}

impl CelestialBody {
    /// Validate the periods and derive angular velocities. The parent link
    /// is resolved by `Ephemeris`.
    pub fn from_spec(spec: &BodySpec, now_seconds: f64) -> Result<Self, EphemerisError> {
        let rotation_hours =
            checked_period(spec.name, PeriodKind::Rotation, spec.rotation_period_hours)?;

        let orbit = match spec.orbital_period_days {
            Some(days) => {
                let period_seconds =
                    checked_period(spec.name, PeriodKind::Orbital, days * SECONDS_PER_DAY)?;
                Some(Orbit {
                    radius: spec.distance,
                    period_seconds,
                    angular_velocity: TAU / period_seconds,
                    initial_angle: initial_phase(now_seconds, period_seconds),
                })
            }
            None => None,
        };

        Ok(Self {
            name: spec.name.to_owned(),
            class: spec.class,
            radius: spec.radius,
            color: Color::from_hex(spec.color),
            rotation_period_hours: rotation_hours,
            rotational_angular_velocity: TAU / (rotation_hours * SECONDS_PER_HOUR),
            orbit,
            parent: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> BodyClass {
        self.class
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn rotation_period_hours(&self) -> f64 {
        self.rotation_period_hours
    }

    /// Spin rate, rad/s.
    pub fn rotational_angular_velocity(&self) -> f64 {
        self.rotational_angular_velocity
    }

    pub fn orbit(&self) -> Option<&Orbit> {
        self.orbit.as_ref()
    }

    /// Index of the parent body in the owning `Ephemeris`.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Display name: "mercury" becomes "Mercury".
    pub fn label_text(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// All bodies of a scene, parents before children.
#[derive(Debug, Clone, PartialEq)]
pub struct Ephemeris {
    bodies: Vec<CelestialBody>,
}

impl Ephemeris {
    /// Build from a table. Children may only orbit top-level bodies that
    /// appear earlier in the table.
    pub fn from_specs(specs: &[BodySpec], now_seconds: f64) -> Result<Self, EphemerisError> {
        let mut bodies: Vec<CelestialBody> = Vec::with_capacity(specs.len());
        for spec in specs {
            let mut body = CelestialBody::from_spec(spec, now_seconds)?;
            if let Some(parent_name) = spec.parent {
                let parent = bodies
                    .iter()
                    .position(|b| b.name == parent_name && b.parent.is_none())
                    .ok_or_else(|| EphemerisError::UnknownParent {
                        body: spec.name.to_owned(),
                        parent: parent_name.to_owned(),
                    })?;
                if body.orbit.is_none() {
                    return Err(EphemerisError::MissingOrbit {
                        body: spec.name.to_owned(),
                    });
                }
                body.parent = Some(parent);
            }
            bodies.push(body);
        }
        log::debug!("ephemeris built with {} bodies", bodies.len());
        Ok(Self { bodies })
    }

    /// Sun, the eight planets and the Moon.
    pub fn solar_system(now_seconds: f64) -> Result<Self, EphemerisError> {
        let mut specs = Vec::with_capacity(PLANETS.len() + 2);
        specs.push(SUN);
        specs.extend_from_slice(&PLANETS);
        specs.push(MOON);
        Self::from_specs(&specs, now_seconds)
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn get(&self, index: usize) -> Option<&CelestialBody> {
        self.bodies.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    pub fn by_name(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_velocities_match_periods() {
        let eph = Ephemeris::solar_system(0.0).unwrap();
        let earth = eph.by_name("earth").unwrap();
        let orbit = earth.orbit().unwrap();
        assert_eq!(orbit.period_seconds, 365.25 * SECONDS_PER_DAY);
        assert!((orbit.angular_velocity * orbit.period_seconds - TAU).abs() < 1e-12);
        let spin = earth.rotational_angular_velocity() * 23.934 * SECONDS_PER_HOUR;
        assert!((spin - TAU).abs() < 1e-12);
    }

    #[test]
    fn all_velocities_positive() {
        let eph = Ephemeris::solar_system(1.7e9).unwrap();
        assert_eq!(eph.len(), 10);
        for body in eph.bodies() {
            assert!(body.rotational_angular_velocity() > 0.0, "{}", body.name());
            if let Some(orbit) = body.orbit() {
                assert!(orbit.angular_velocity > 0.0, "{}", body.name());
                assert!((0.0..TAU).contains(&orbit.initial_angle));
            }
        }
    }

    #[test]
    fn sun_has_no_orbit() {
        let eph = Ephemeris::solar_system(0.0).unwrap();
        let sun = eph.get(0).unwrap();
        assert_eq!(sun.class(), BodyClass::Star);
        assert!(sun.orbit().is_none());
    }

    #[test]
    fn moon_orbits_earth() {
        let eph = Ephemeris::solar_system(0.0).unwrap();
        let moon = eph.by_name("moon").unwrap();
        assert_eq!(moon.parent(), eph.index_of("earth"));
    }

    #[test]
    fn initial_phase_follows_wall_clock() {
        assert_eq!(initial_phase(0.0, 100.0), 0.0);
        assert!((initial_phase(25.0, 100.0) - TAU / 4.0).abs() < 1e-12);
        assert!((initial_phase(125.0, 100.0) - TAU / 4.0).abs() < 1e-12);
    }

    #[test]
    fn zero_period_is_rejected() {
        let spec = BodySpec {
            orbital_period_days: Some(0.0),
            ..PLANETS[0]
        };
        let err = CelestialBody::from_spec(&spec, 0.0).unwrap_err();
        assert!(matches!(
            err,
            EphemerisError::NonPositivePeriod { kind: PeriodKind::Orbital, .. }
        ));
    }

    #[test]
    fn negative_rotation_is_rejected() {
        let spec = BodySpec {
            rotation_period_hours: -1.0,
            ..PLANETS[2]
        };
        let err = CelestialBody::from_spec(&spec, 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "earth: rotation period must be positive, got -1"
        );
    }

    #[test]
    fn nan_period_is_rejected() {
        let spec = BodySpec {
            rotation_period_hours: f64::NAN,
            ..SUN
        };
        assert!(matches!(
            CelestialBody::from_spec(&spec, 0.0),
            Err(EphemerisError::NonFinitePeriod { .. })
        ));
    }

    #[test]
    fn parent_must_exist_and_be_top_level() {
        let err = Ephemeris::from_specs(&[SUN, MOON], 0.0).unwrap_err();
        assert!(matches!(err, EphemerisError::UnknownParent { .. }));

        let sub_moon = BodySpec {
            name: "submoon",
            parent: Some("moon"),
            ..MOON
        };
        let err = Ephemeris::from_specs(&[SUN, PLANETS[2], MOON, sub_moon], 0.0).unwrap_err();
        assert!(matches!(err, EphemerisError::UnknownParent { .. }));
    }

    #[test]
    fn label_text_is_title_case() {
        let eph = Ephemeris::solar_system(0.0).unwrap();
        assert_eq!(eph.by_name("mercury").unwrap().label_text(), "Mercury");
        assert_eq!(eph.get(0).unwrap().label_text(), "Sun");
    }
}
