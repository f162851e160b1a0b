//! Entity model
//!
//! Every simulated object shares position, velocity and mass. The kind-specific
//! geometry and charge live in a closed [`Body`] enum that is fixed at
//! construction, so an entity's kind can never change.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Entity kinds, in canonical pair order (Electron < Wall < Atom)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Electron,
    Wall,
    Atom,
}

impl EntityKind {
    pub const COUNT: usize = 3;

    /// Row/column in the interaction table
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Sign of an entity's charge or field, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Neutral,
    Positive,
    Negative,
}

impl Polarity {
    fn of(value: f64) -> Self {
        if value > 0.0 {
            Polarity::Positive
        } else if value < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

/// A free electron (circle)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Electron {
    pub radius: f64,
}

/// A charged electrode: an infinite line through the entity position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Direction of the line (need not be unit length)
    pub direction: DVec2,
    /// Signed field strength
    pub field: f64,
}

impl Wall {
    /// Unit direction of the wall's line
    #[inline]
    pub fn along(&self) -> DVec2 {
        self.direction.normalize_or_zero()
    }
}

/// An atom or ion (square footprint)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Edge length of the square footprint
    pub size: f64,
    /// Charge in elementary units
    pub charge: i8,
}

impl Atom {
    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.charge == 0
    }
}

/// Kind-specific attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Electron(Electron),
    Wall(Wall),
    Atom(Atom),
}

/// A simulated object
///
/// Fields are public for reading and for the simulation's own phases. Code
/// outside the tick should edit live entities through
/// [`Simulator::update`](super::world::Simulator::update), which re-checks
/// [`Entity::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Position (for walls: the anchor point of the line)
    pub pos: DVec2,
    /// Velocity (always zero for walls)
    pub vel: DVec2,
    pub mass: f64,
    body: Body,
}

impl Entity {
    pub fn electron(pos: DVec2, vel: DVec2, mass: f64, radius: f64) -> Self {
        Self {
            pos,
            vel,
            mass,
            body: Body::Electron(Electron { radius }),
        }
    }

    pub fn wall(anchor: DVec2, direction: DVec2, field: f64) -> Self {
        Self {
            pos: anchor,
            vel: DVec2::ZERO,
            mass: 1.0,
            body: Body::Wall(Wall { direction, field }),
        }
    }

    pub fn atom(pos: DVec2, vel: DVec2, mass: f64, size: f64, charge: i8) -> Self {
        Self {
            pos,
            vel,
            mass,
            body: Body::Atom(Atom { size, charge }),
        }
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        match self.body {
            Body::Electron(_) => EntityKind::Electron,
            Body::Wall(_) => EntityKind::Wall,
            Body::Atom(_) => EntityKind::Atom,
        }
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn as_electron(&self) -> Option<&Electron> {
        match &self.body {
            Body::Electron(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_wall(&self) -> Option<&Wall> {
        match &self.body {
            Body::Wall(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_wall_mut(&mut self) -> Option<&mut Wall> {
        match &mut self.body {
            Body::Wall(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match &self.body {
            Body::Atom(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_atom_mut(&mut self) -> Option<&mut Atom> {
        match &mut self.body {
            Body::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// Charge seen by electrode fields, in elementary units
    pub fn charge(&self, settings: &Settings) -> i8 {
        match &self.body {
            Body::Electron(_) => settings.electron_charge,
            Body::Wall(_) => 0,
            Body::Atom(a) => a.charge,
        }
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Total energy used by the capture threshold
    pub fn energy(&self, settings: &Settings) -> f64 {
        match &self.body {
            Body::Electron(_) => self.kinetic_energy() + settings.electron_rest_energy,
            Body::Wall(_) => settings.wall_rest_energy,
            Body::Atom(a) => {
                self.kinetic_energy() + f64::from(a.charge.unsigned_abs()) * settings.electron_rest_energy
            }
        }
    }

    /// Sign used to pick a display color
    pub fn polarity(&self) -> Polarity {
        match &self.body {
            Body::Electron(_) => Polarity::Negative,
            Body::Wall(w) => Polarity::of(w.field),
            Body::Atom(a) => Polarity::of(f64::from(a.charge)),
        }
    }

    /// Advance position by one step; walls stay put
    #[inline]
    pub fn integrate(&mut self, dt: f64) {
        if !matches!(self.body, Body::Wall(_)) {
            self.pos += self.vel * dt;
        }
    }

    /// Check invariants for externally constructed entities
    pub fn validate(&self) -> Result<()> {
        if !self.pos.is_finite() {
            return Err(Error::InvalidEntity("position must be finite".into()));
        }
        if !self.vel.is_finite() {
            return Err(Error::InvalidEntity("velocity must be finite".into()));
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(Error::InvalidEntity("mass must be finite and > 0".into()));
        }
        match &self.body {
            Body::Electron(e) => {
                if !e.radius.is_finite() || e.radius <= 0.0 {
                    return Err(Error::InvalidEntity("electron radius must be finite and > 0".into()));
                }
            }
            Body::Wall(w) => {
                if !w.direction.is_finite() || w.direction.length_squared() == 0.0 {
                    return Err(Error::InvalidEntity("wall direction must be finite and non-zero".into()));
                }
                if !w.field.is_finite() {
                    return Err(Error::InvalidEntity("wall field must be finite".into()));
                }
                if self.vel != DVec2::ZERO {
                    return Err(Error::InvalidEntity("walls cannot move".into()));
                }
            }
            Body::Atom(a) => {
                if !a.size.is_finite() || a.size <= 0.0 {
                    return Err(Error::InvalidEntity("atom size must be finite and > 0".into()));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_order_is_canonical() {
        assert!(EntityKind::Electron < EntityKind::Wall);
        assert!(EntityKind::Wall < EntityKind::Atom);
        assert_eq!(EntityKind::Atom.index(), 2);
    }

    #[test]
    fn test_energy_per_kind() {
        let s = Settings::default();

        // v = (3,4), |v|^2 = 25
        let e = Entity::electron(DVec2::ZERO, DVec2::new(3.0, 4.0), 2.0, 0.2);
        assert!((e.energy(&s) - (25.0 + s.electron_rest_energy)).abs() < 1e-12);

        let a = Entity::atom(DVec2::ZERO, DVec2::new(3.0, 4.0), 2.0, 1.0, -2);
        assert!((a.energy(&s) - (25.0 + 2.0 * s.electron_rest_energy)).abs() < 1e-12);

        let w = Entity::wall(DVec2::ZERO, DVec2::Y, 10.0);
        assert_eq!(w.energy(&s), s.wall_rest_energy);
    }

    #[test]
    fn test_wall_integrate_is_identity() {
        let mut w = Entity::wall(DVec2::new(1.0, 2.0), DVec2::X, 0.0);
        w.integrate(10.0);
        assert_eq!(w.pos, DVec2::new(1.0, 2.0));
        assert_eq!(w.vel, DVec2::ZERO);
    }

    #[test]
    fn test_integrate_moves_particles() {
        let mut a = Entity::atom(DVec2::ZERO, DVec2::new(2.0, -1.0), 1.0, 1.0, 0);
        a.integrate(0.5);
        assert_eq!(a.pos, DVec2::new(1.0, -0.5));
    }

    #[test]
    fn test_polarity() {
        assert_eq!(Entity::atom(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0, 1).polarity(), Polarity::Positive);
        assert_eq!(Entity::atom(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0, 0).polarity(), Polarity::Neutral);
        assert_eq!(Entity::wall(DVec2::ZERO, DVec2::Y, -5.0).polarity(), Polarity::Negative);
        assert_eq!(Entity::electron(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0).polarity(), Polarity::Negative);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(Entity::electron(DVec2::ZERO, DVec2::ZERO, 0.0, 0.2).validate().is_err());
        assert!(Entity::atom(DVec2::ZERO, DVec2::ZERO, 1.0, -1.0, 0).validate().is_err());
        assert!(Entity::wall(DVec2::ZERO, DVec2::ZERO, 0.0).validate().is_err());
        assert!(Entity::atom(DVec2::new(f64::NAN, 0.0), DVec2::ZERO, 1.0, 1.0, 0).validate().is_err());

        let mut moving_wall = Entity::wall(DVec2::ZERO, DVec2::Y, 0.0);
        moving_wall.vel = DVec2::X;
        assert!(moving_wall.validate().is_err());

        assert!(Entity::electron(DVec2::ZERO, DVec2::X, 1e-4, 0.2).validate().is_ok());
    }

    #[test]
    fn test_typed_accessors() {
        let mut a = Entity::atom(DVec2::ZERO, DVec2::ZERO, 1.0, 1.0, 0);
        assert!(a.as_electron().is_none());
        assert!(a.as_wall().is_none());
        if let Some(atom) = a.as_atom_mut() {
            atom.charge = 3;
        }
        assert_eq!(a.as_atom().map(|x| x.charge), Some(3));
        assert_eq!(a.kind(), EntityKind::Atom);
    }
}
