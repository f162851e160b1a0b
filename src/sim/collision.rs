//! Collision detection and response
//!
//! Detection is a static overlap test on post-integration positions; there is
//! no time-of-impact refinement. Every function takes its two entities in
//! canonical kind order (see [`super::interaction`]).

use glam::DVec2;

use super::entity::{Entity, Wall};

/// Effective radius used to approximate an atom's square footprint by a circle
#[inline]
pub fn atom_effective_radius(size: f64) -> f64 {
    size * (1.0 + std::f64::consts::SQRT_2) / 4.0
}

/// Perpendicular distance from a point to a wall's infinite line
pub fn distance_to_wall(point: DVec2, anchor: DVec2, wall: &Wall) -> f64 {
    perpendicular_offset(point, anchor, wall).length()
}

/// Vector from `point` to the nearest point of the wall's line
pub fn perpendicular_offset(point: DVec2, anchor: DVec2, wall: &Wall) -> DVec2 {
    let along = wall.along();
    let to_anchor = anchor - point;
    to_anchor - along * to_anchor.dot(along)
}

#[inline]
fn circles_overlap(a: DVec2, ra: f64, b: DVec2, rb: f64) -> bool {
    let sum = ra + rb;
    a.distance_squared(b) <= sum * sum
}

pub fn detect_electron_electron(first: &Entity, second: &Entity) -> bool {
    let (Some(e1), Some(e2)) = (first.as_electron(), second.as_electron()) else {
        return false;
    };
    circles_overlap(first.pos, e1.radius, second.pos, e2.radius)
}

pub fn detect_electron_wall(electron: &Entity, wall: &Entity) -> bool {
    let (Some(e), Some(w)) = (electron.as_electron(), wall.as_wall()) else {
        return false;
    };
    distance_to_wall(electron.pos, wall.pos, w) <= e.radius
}

pub fn detect_wall_atom(wall: &Entity, atom: &Entity) -> bool {
    let (Some(w), Some(a)) = (wall.as_wall(), atom.as_atom()) else {
        return false;
    };
    distance_to_wall(atom.pos, wall.pos, w) <= a.size / 2.0
}

/// Axis-aligned square overlap (touching edges count)
pub fn detect_atom_atom(first: &Entity, second: &Entity) -> bool {
    let (Some(a1), Some(a2)) = (first.as_atom(), second.as_atom()) else {
        return false;
    };
    let half1 = a1.size / 2.0;
    let half2 = a2.size / 2.0;
    let (min1, max1) = (first.pos - half1, first.pos + half1);
    let (min2, max2) = (second.pos - half2, second.pos + half2);

    !(min2.x > max1.x || max2.x < min1.x || min2.y > max1.y || max2.y < min1.y)
}

/// Circle test against the atom's effective radius, not its exact square
pub fn detect_electron_atom(electron: &Entity, atom: &Entity) -> bool {
    let (Some(e), Some(a)) = (electron.as_electron(), atom.as_atom()) else {
        return false;
    };
    circles_overlap(electron.pos, e.radius, atom.pos, atom_effective_radius(a.size))
}

/// 1D elastic collision along the axis from `first` to `second`
///
/// Only the along-axis velocity components change; perpendicular components
/// are kept. Coincident centers leave both velocities untouched.
pub fn elastic_exchange(first: &mut Entity, second: &mut Entity) {
    let along = (second.pos - first.pos).normalize_or_zero();
    if along == DVec2::ZERO {
        return;
    }

    let v1 = first.vel.dot(along);
    let v2 = second.vel.dot(along);
    let m1 = first.mass;
    let m2 = second.mass;

    let new_v1 = (2.0 * m2 * v2 + v1 * (m1 - m2)) / (m1 + m2);
    let new_v2 = (2.0 * m1 * v1 + v2 * (m2 - m1)) / (m1 + m2);

    first.vel = (first.vel - v1 * along) + new_v1 * along;
    second.vel = (second.vel - v2 * along) + new_v2 * along;
}

/// Specular bounce: keep the along-wall component, negate the perpendicular one
#[inline]
pub fn reflect_off_wall(velocity: DVec2, along: DVec2) -> DVec2 {
    let v_along = velocity.dot(along) * along;
    let v_perp = velocity - v_along;
    v_along - v_perp
}

pub fn respond_electron_electron(first: &mut Entity, second: &mut Entity) {
    elastic_exchange(first, second);
}

pub fn respond_electron_wall(electron: &mut Entity, wall: &mut Entity) {
    if let Some(w) = wall.as_wall() {
        electron.vel = reflect_off_wall(electron.vel, w.along());
    }
}

pub fn respond_wall_atom(wall: &mut Entity, atom: &mut Entity) {
    if let Some(w) = wall.as_wall() {
        atom.vel = reflect_off_wall(atom.vel, w.along());
    }
}

pub fn respond_atom_atom(first: &mut Entity, second: &mut Entity) {
    elastic_exchange(first, second);
}

pub fn respond_electron_atom(electron: &mut Entity, atom: &mut Entity) {
    elastic_exchange(electron, atom);
}
