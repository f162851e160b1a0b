//! Simulation settings
//!
//! Physical constants and reaction thresholds. Passed to the simulator at
//! construction and never mutated during a tick.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sphere_volume;

/// Tunable physical constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Particles ===
    /// Charge carried by one electron, in elementary units (signed)
    pub electron_charge: i8,
    /// Electron mass
    pub electron_mass: f64,
    /// Energy an electron carries at rest
    pub electron_rest_energy: f64,
    /// Energy reported by a wall
    pub wall_rest_energy: f64,
    /// Mass per unit volume of atoms
    pub atom_density: f64,

    // === Reactions ===
    /// Combined energy at which an atom captures an electron
    pub electron_capture_energy_threshold: f64,
    /// Combined mass at which two neutral atoms fuse
    pub atom_combine_mass_threshold: f64,
    /// Combined mass at which two neutral atoms break apart
    pub atom_break_mass_threshold: f64,
    /// Radius of each fragment produced by fission
    pub broken_atom_radius: f64,

    // === Electrodes ===
    /// Step used when an electrode field is nudged up or down
    pub field_step: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            electron_charge: -1,
            electron_mass: 1e-4,
            electron_rest_energy: 1e-5,
            wall_rest_energy: 1e5,
            atom_density: 1e-3,

            electron_capture_energy_threshold: 1e5,
            atom_combine_mass_threshold: 5e-3,
            atom_break_mass_threshold: 1e-2,
            broken_atom_radius: 0.7,

            field_step: 500.0,
        }
    }
}

impl Settings {
    /// Volume of one fission fragment
    pub fn fragment_volume(&self) -> f64 {
        sphere_volume(self.broken_atom_radius)
    }

    /// Check ranges and cross-field consistency
    pub fn validate(&self) -> Result<()> {
        if self.electron_charge == 0 {
            return Err(Error::InvalidSettings("electron_charge must be non-zero".into()));
        }
        let positive = [
            ("electron_mass", self.electron_mass),
            ("atom_density", self.atom_density),
            ("atom_combine_mass_threshold", self.atom_combine_mass_threshold),
            ("atom_break_mass_threshold", self.atom_break_mass_threshold),
            ("broken_atom_radius", self.broken_atom_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSettings(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        let finite = [
            ("electron_rest_energy", self.electron_rest_energy),
            ("wall_rest_energy", self.wall_rest_energy),
            ("electron_capture_energy_threshold", self.electron_capture_energy_threshold),
            ("field_step", self.field_step),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidSettings(format!("{name} must be finite")));
            }
        }
        if self.atom_combine_mass_threshold > self.atom_break_mass_threshold {
            return Err(Error::InvalidSettings(
                "atom_combine_mass_threshold must not exceed atom_break_mass_threshold".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
