//! # Central bodies and canonical units
//!
//! Every computation in this crate runs in the **canonical unit system** of a single
//! central body: one canonical distance unit (CDU) and one canonical time unit (CTU)
//! chosen such that the gravitational parameter is exactly one.
//!
//! ```text
//! CTU = sqrt(CDU³ / mu)
//! ```
//!
//! [`CentralBody`] is a small catalog of solar-system bodies. For planets and the Moon
//! the CDU is the body's mean radius. The Sun is offered twice: once with its radius
//! as CDU, once with the astronomical unit, which allows heliocentric orbits of several
//! AU to stay within a reasonable range of semi-major axes.
//!
//! [`UnitSystem`] converts canonical quantities to kilometers and seconds for readouts.

use std::fmt;
use std::str::FromStr;

use crate::{
    conic_errors::ConicError,
    constants::{Cdu, Ctu, Kilometer, Second},
};

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: Kilometer = 149_597_870.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CentralBody {
    /// Sun, with its radius as canonical distance unit.
    Sun,
    /// Sun, with the astronomical unit as canonical distance unit.
    SunAu,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl CentralBody {
    pub const ALL: [CentralBody; 11] = [
        CentralBody::Sun,
        CentralBody::SunAu,
        CentralBody::Mercury,
        CentralBody::Venus,
        CentralBody::Earth,
        CentralBody::Moon,
        CentralBody::Mars,
        CentralBody::Jupiter,
        CentralBody::Saturn,
        CentralBody::Uranus,
        CentralBody::Neptune,
    ];

    /// Gravitational parameter GM in km³/s².
    pub fn mu_km3_s2(&self) -> f64 {
        match self {
            CentralBody::Sun | CentralBody::SunAu => 132_712_440_018.0,
            CentralBody::Mercury => 22_032.0,
            CentralBody::Venus => 324_859.0,
            CentralBody::Earth => 398_600.4418,
            CentralBody::Moon => 4_904.8695,
            CentralBody::Mars => 42_828.0,
            CentralBody::Jupiter => 126_687_000.0,
            CentralBody::Saturn => 37_931_000.0,
            CentralBody::Uranus => 5_794_000.0,
            CentralBody::Neptune => 6_835_100.0,
        }
    }

    /// Mean physical radius in km.
    pub fn radius_km(&self) -> Kilometer {
        match self {
            CentralBody::Sun | CentralBody::SunAu => 696_000.0,
            CentralBody::Mercury => 2_439.7,
            CentralBody::Venus => 6_051.8,
            CentralBody::Earth => 6_378.1,
            CentralBody::Moon => 1_737.4,
            CentralBody::Mars => 3_389.5,
            CentralBody::Jupiter => 69_911.0,
            CentralBody::Saturn => 58_232.0,
            CentralBody::Uranus => 25_362.0,
            CentralBody::Neptune => 24_622.0,
        }
    }

    /// Canonical distance unit in km.
    pub fn canonical_distance_km(&self) -> Kilometer {
        match self {
            CentralBody::SunAu => AU,
            other => other.radius_km(),
        }
    }

    /// Build the canonical unit system attached to this body.
    pub fn unit_system(&self) -> UnitSystem {
        UnitSystem::new(
            self.canonical_distance_km(),
            self.mu_km3_s2(),
            self.radius_km(),
        )
    }

    /// Stable key used in persisted settings.
    pub fn key(&self) -> &'static str {
        match self {
            CentralBody::Sun => "sun",
            CentralBody::SunAu => "sun-au",
            CentralBody::Mercury => "mercury",
            CentralBody::Venus => "venus",
            CentralBody::Earth => "earth",
            CentralBody::Moon => "moon",
            CentralBody::Mars => "mars",
            CentralBody::Jupiter => "jupiter",
            CentralBody::Saturn => "saturn",
            CentralBody::Uranus => "uranus",
            CentralBody::Neptune => "neptune",
        }
    }
}

impl Default for CentralBody {
    fn default() -> Self {
        CentralBody::Earth
    }
}

impl fmt::Display for CentralBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for CentralBody {
    type Err = ConicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        CentralBody::ALL
            .into_iter()
            .find(|body| body.key() == lower)
            .ok_or_else(|| ConicError::UnknownCentralBody(s.to_string()))
    }
}

/// Canonical unit system of a central body.
///
/// Fields
/// -----------------
/// * `cdu_km`: canonical distance unit in km.
/// * `ctu_s`: canonical time unit in seconds, `sqrt(cdu³/mu)`.
/// * `mu_km3_s2`: gravitational parameter of the body.
/// * `radius_km`: physical radius of the body, used for the periapsis check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSystem {
    pub cdu_km: Kilometer,
    pub ctu_s: Second,
    pub mu_km3_s2: f64,
    pub radius_km: Kilometer,
}

impl UnitSystem {
    pub fn new(cdu_km: Kilometer, mu_km3_s2: f64, radius_km: Kilometer) -> Self {
        UnitSystem {
            cdu_km,
            ctu_s: (cdu_km.powi(3) / mu_km3_s2).sqrt(),
            mu_km3_s2,
            radius_km,
        }
    }

    /// Radius of the central body in CDU.
    pub fn canonical_radius(&self) -> Cdu {
        self.radius_km / self.cdu_km
    }

    /// Canonical speed unit (CDU/CTU) in km/s.
    pub fn speed_unit_km_s(&self) -> f64 {
        self.cdu_km / self.ctu_s
    }

    pub fn to_km(&self, distance: Cdu) -> Kilometer {
        distance * self.cdu_km
    }

    pub fn to_km_s(&self, speed: f64) -> f64 {
        speed * self.speed_unit_km_s()
    }

    pub fn to_seconds(&self, time: Ctu) -> Second {
        time * self.ctu_s
    }

    pub fn to_canonical_time(&self, seconds: Second) -> Ctu {
        seconds / self.ctu_s
    }

    /// Specific energy (CDU²/CTU²) in km²/s².
    pub fn to_km2_s2(&self, energy: f64) -> f64 {
        energy * self.speed_unit_km_s().powi(2)
    }

    /// Specific angular momentum (CDU²/CTU) in km²/s.
    pub fn to_km2_s(&self, angular_momentum: f64) -> f64 {
        angular_momentum * self.cdu_km * self.speed_unit_km_s()
    }
}

impl Default for UnitSystem {
    fn default() -> Self {
        CentralBody::default().unit_system()
    }
}

#[cfg(test)]
mod central_body_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_earth_canonical_time_unit() {
        let units = CentralBody::Earth.unit_system();
        assert_relative_eq!(units.ctu_s, 806.804103286409, epsilon = 1e-6);
        assert_relative_eq!(units.speed_unit_km_s(), 7.905388648892, epsilon = 1e-6);
        assert_eq!(units.canonical_radius(), 1.0);
    }

    #[test]
    fn test_heliocentric_astronomical_unit() {
        let units = CentralBody::SunAu.unit_system();
        assert_relative_eq!(units.ctu_s, 5_022_642.8914, max_relative = 1e-6);
        assert!(units.canonical_radius() < 0.005);
    }

    #[test]
    fn test_parse_body() {
        assert_eq!("Earth".parse::<CentralBody>().unwrap(), CentralBody::Earth);
        assert_eq!("sun-au".parse::<CentralBody>().unwrap(), CentralBody::SunAu);
        assert_eq!(
            "pluto".parse::<CentralBody>(),
            Err(ConicError::UnknownCentralBody("pluto".into()))
        );
        for body in CentralBody::ALL {
            assert_eq!(body.to_string().parse::<CentralBody>().unwrap(), body);
        }
    }
}
