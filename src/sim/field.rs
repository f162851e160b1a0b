//! Electrode fields (distant interaction)
//!
//! A charged wall pushes every charged particle in the arena, proportionally to
//! the particle's perpendicular offset from the wall's line. Only velocities
//! change here; positions are integrated afterwards.

use glam::DVec2;

use super::collision::perpendicular_offset;
use super::entity::Entity;
use crate::settings::Settings;

/// Velocity change imparted on `particle` by `wall` over `dt`
///
/// `force = -field * offset * charge`, `dv = force / mass * dt`
pub fn field_impulse(wall: &Entity, particle: &Entity, dt: f64, settings: &Settings) -> DVec2 {
    let Some(w) = wall.as_wall() else {
        return DVec2::ZERO;
    };
    let charge = f64::from(particle.charge(settings));
    if charge == 0.0 || w.field == 0.0 {
        return DVec2::ZERO;
    }

    let offset = perpendicular_offset(particle.pos, wall.pos, w);
    let force = -w.field * offset * charge;
    force / particle.mass * dt
}

pub fn distant_electron_wall(electron: &mut Entity, wall: &mut Entity, dt: f64, settings: &Settings) {
    electron.vel += field_impulse(wall, electron, dt, settings);
}

pub fn distant_wall_atom(wall: &mut Entity, atom: &mut Entity, dt: f64, settings: &Settings) {
    atom.vel += field_impulse(wall, atom, dt, settings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_wall_attracts_electron() {
        let s = Settings::default();
        let mut e = Entity::electron(DVec2::ZERO, DVec2::ZERO, 1e-4, 0.2);
        let mut wall = Entity::wall(DVec2::new(-1.0, 0.0), DVec2::new(0.0, 1.0), 1e3);

        distant_electron_wall(&mut e, &mut wall, 1e-6, &s);

        // offset (-1,0), force = -1e3 * (-1,0) * (-1) = (-1e3, 0), dv = -1e7 * 1e-6
        assert!((e.vel.x - (-10.0)).abs() < 1e-9);
        assert_eq!(e.vel.y, 0.0);
        assert_eq!(e.pos, DVec2::ZERO);
        assert_eq!(wall.vel, DVec2::ZERO);
    }

    #[test]
    fn test_positive_wall_repels_positive_ion() {
        let s = Settings::default();
        let mut wall = Entity::wall(DVec2::new(0.0, 2.0), DVec2::new(5.0, 0.0), 100.0);
        let mut ion = Entity::atom(DVec2::ZERO, DVec2::ZERO, 0.5, 1.0, 1);

        distant_wall_atom(&mut wall, &mut ion, 0.1, &s);

        // offset (0,2), force = -100 * (0,2) = (0,-200), dv = -400 * 0.1
        assert!((ion.vel - DVec2::new(0.0, -40.0)).length() < 1e-9);
    }

    #[test]
    fn test_neutral_atom_ignores_field() {
        let s = Settings::default();
        let mut wall = Entity::wall(DVec2::ZERO, DVec2::Y, 1e6);
        let mut atom = Entity::atom(DVec2::new(3.0, 0.0), DVec2::X, 1.0, 1.0, 0);
        distant_wall_atom(&mut wall, &mut atom, 1.0, &s);
        assert_eq!(atom.vel, DVec2::X);
    }

    #[test]
    fn test_field_grows_with_offset() {
        let s = Settings::default();
        let wall = Entity::wall(DVec2::ZERO, DVec2::Y, 10.0);
        let near = Entity::atom(DVec2::new(1.0, 0.0), DVec2::ZERO, 1.0, 1.0, 2);
        let far = Entity::atom(DVec2::new(3.0, 0.0), DVec2::ZERO, 1.0, 1.0, 2);
        let dv_near = field_impulse(&wall, &near, 1.0, &s);
        let dv_far = field_impulse(&wall, &far, 1.0, &s);
        assert!((dv_far.length() - 3.0 * dv_near.length()).abs() < 1e-9);
    }
}
