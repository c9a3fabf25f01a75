use nalgebra::Vector3;
use rand::Rng;

/// Static orbital parameters, fixed at body construction.
///
/// Periods are signed: a negative orbital period orbits the other way round,
/// a negative spin period spins retrograde (venus). Zero periods are invalid
/// and rejected when the body is built.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalParameters {
    /// Orbital radius around the parent body. Zero for the star.
    pub distance_from_parent: f64,
    /// Render scale applied to the base mesh.
    pub scale: Vector3<f64>,
    /// Tilt of the spin axis out of the orbital plane, in degrees.
    pub axial_tilt: f64,
    /// Simulated time for one revolution around the parent.
    pub orbital_period: f64,
    /// Simulated time for one self-rotation.
    pub spin_period: f64,
    /// Random starting offset in [0, 360), drawn once at construction so the
    /// bodies don't read as synchronized. Never re-rolled.
    pub phase_offset: f64,
}

impl OrbitalParameters {
    pub fn new(
        distance_from_parent: f64,
        scale: f64,
        axial_tilt: f64,
        orbital_period: f64,
        spin_period: f64,
        rng: &mut impl Rng,
    ) -> Self {
        OrbitalParameters {
            distance_from_parent,
            scale: Vector3::new(scale, scale, scale),
            axial_tilt,
            orbital_period,
            spin_period,
            phase_offset: rng.gen_range(0.0..360.0),
        }
    }

    /// Pin the phase offset to a known value (used by tests, where a random
    /// starting angle would make positions unpredictable).
    pub fn with_phase_offset(mut self, degrees: f64) -> Self {
        self.phase_offset = degrees;
        self
    }

    /// Current angle around the parent, in degrees (unbounded; callers that
    /// care about the principal value take it mod 360).
    pub fn orbit_angle(&self, time: f64) -> f64 {
        (time + self.phase_offset) * (360.0 / self.orbital_period)
    }

    /// Current self-rotation angle, in degrees.
    pub fn spin_angle(&self, time: f64) -> f64 {
        time * (360.0 / self.spin_period)
    }
}
