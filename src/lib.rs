//! Ion Arena - charged particles in a closed 2D box
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, pair dispatch, collisions, reactions)
//! - `settings`: Physical constants and thresholds as a serializable config object
//! - `error`: Crate error type

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Simulation constants that are not tunable through [`Settings`]
pub mod consts {
    /// Fixed timestep used by the headless driver (seconds)
    pub const SIM_DT: f64 = 1e-6;
    /// Default number of ticks the driver runs
    pub const DEFAULT_TICKS: u64 = 2_000;

    /// Electron radius used by the scene generator
    pub const ELECTRON_RADIUS: f64 = 0.2;
    /// Atom radius range used by the scene generator
    pub const ATOM_RADIUS_MIN: f64 = 0.4;
    pub const ATOM_RADIUS_MAX: f64 = 1.2;
    /// Initial speed range per axis for generated particles
    pub const SPAWN_SPEED: f64 = 3e4;
    /// Share of generated atoms that start as positive ions
    pub const ION_SHARE: f64 = 0.3;

    /// Samples kept by a census history
    pub const CENSUS_SAMPLES: usize = 1000;
}

/// Volume of a sphere with the given radius
#[inline]
pub fn sphere_volume(radius: f64) -> f64 {
    4.0 / 3.0 * std::f64::consts::PI * radius * radius * radius
}

/// Radius of the sphere enclosing the given volume
#[inline]
pub fn sphere_radius_from_volume(volume: f64) -> f64 {
    (volume * 3.0 / (4.0 * std::f64::consts::PI)).cbrt()
}
