//! Chemical reactions
//!
//! Structural changes triggered by a collision: electron capture, fission,
//! fusion and charge exchange. A handler returns `true` when it changed the
//! entity set, in which case the ordinary collision response is skipped.

use glam::DVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use slotmap::SlotMap;

use super::entity::Entity;
use super::world::{Collision, EntityId};
use crate::settings::Settings;
use crate::sphere_radius_from_volume;

/// Mutable view handed to reaction handlers
pub struct ReactionContext<'a> {
    pub entities: &'a mut SlotMap<EntityId, Entity>,
    pub settings: &'a Settings,
    pub rng: &'a mut Pcg32,
    /// Entities created by reactions this tick
    pub spawned: usize,
    /// Entities consumed by reactions this tick
    pub consumed: usize,
}

impl<'a> ReactionContext<'a> {
    pub fn new(
        entities: &'a mut SlotMap<EntityId, Entity>,
        settings: &'a Settings,
        rng: &'a mut Pcg32,
    ) -> Self {
        Self {
            entities,
            settings,
            rng,
            spawned: 0,
            consumed: 0,
        }
    }

    fn spawn(&mut self, entity: Entity) -> EntityId {
        self.spawned += 1;
        self.entities.insert(entity)
    }

    fn consume(&mut self, id: EntityId) {
        if self.entities.remove(id).is_some() {
            self.consumed += 1;
        }
    }
}

/// Atom absorbs the electron when their combined energy reaches the threshold
pub fn react_electron_atom(ctx: &mut ReactionContext<'_>, collision: Collision) -> bool {
    let Some([electron, atom]) = ctx.entities.get_disjoint_mut([collision.first, collision.second])
    else {
        return false;
    };
    let energy = atom.energy(ctx.settings) + electron.energy(ctx.settings);
    if energy < ctx.settings.electron_capture_energy_threshold {
        return false;
    }
    let Some(a) = atom.as_atom_mut() else {
        return false;
    };
    // An ion already at the charge limit cannot hold another electron
    let Some(charge) = a.charge.checked_add(ctx.settings.electron_charge) else {
        return false;
    };
    a.charge = charge;

    ctx.consume(collision.first);
    log::debug!("electron captured, ion charge now {charge}");
    true
}

/// Fission, fusion or charge exchange between two atoms
pub fn react_atom_atom(ctx: &mut ReactionContext<'_>, collision: Collision) -> bool {
    let (Some(first), Some(second)) = (
        ctx.entities.get(collision.first),
        ctx.entities.get(collision.second),
    ) else {
        return false;
    };
    let (Some(a1), Some(a2)) = (first.as_atom(), second.as_atom()) else {
        return false;
    };

    if a1.is_neutral() && a2.is_neutral() {
        let combined_mass = first.mass + second.mass;
        if combined_mass >= ctx.settings.atom_break_mass_threshold {
            let (first, second) = (first.clone(), second.clone());
            fission(ctx, &first, &second);
            ctx.consume(collision.first);
            ctx.consume(collision.second);
            return true;
        }
        if combined_mass >= ctx.settings.atom_combine_mass_threshold {
            let fused = fuse(ctx.settings, first, second);
            ctx.spawn(fused);
            ctx.consume(collision.first);
            ctx.consume(collision.second);
            log::debug!("atoms fused, mass {combined_mass}");
            return true;
        }
        return false;
    }

    let sum = i16::from(a1.charge) + i16::from(a2.charge);
    if sum % 2 == 0 {
        let half = (sum / 2) as i8;
        for id in [collision.first, collision.second] {
            if let Some(a) = ctx.entities.get_mut(id).and_then(Entity::as_atom_mut) {
                a.charge = half;
            }
        }
    }
    false
}

/// Number of fragments two atoms of `combined_mass` break into
///
/// Never less than one, so the fragment mass is always defined.
pub fn fragment_count(combined_mass: f64, settings: &Settings) -> usize {
    let volume = combined_mass / settings.atom_density;
    let count = (volume / settings.fragment_volume()).floor();
    if count < 1.0 { 1 } else { count as usize }
}

fn fission(ctx: &mut ReactionContext<'_>, first: &Entity, second: &Entity) {
    let combined_mass = first.mass + second.mass;
    let count = fragment_count(combined_mass, ctx.settings);
    let fragment_mass = combined_mass / count as f64;

    let kinetic = first.mass * first.vel.length_squared() + second.mass * second.vel.length_squared();
    let speed = (kinetic / (count as f64 * fragment_mass)).sqrt();
    let spread = first.as_atom().map_or(0.0, |a| a.size);

    for _ in 0..count {
        let dir = DVec2::from_angle(ctx.rng.random_range(0.0..std::f64::consts::TAU));
        let fragment = Entity::atom(
            first.pos + 2.0 * dir * spread,
            dir * speed,
            fragment_mass,
            ctx.settings.broken_atom_radius,
            0,
        );
        ctx.spawn(fragment);
    }
    log::debug!("atoms broke into {count} fragments of mass {fragment_mass}");
}

fn fuse(settings: &Settings, first: &Entity, second: &Entity) -> Entity {
    let combined_mass = first.mass + second.mass;
    let momentum = first.vel * first.mass + second.vel * second.mass;
    let size = sphere_radius_from_volume(combined_mass / settings.atom_density);
    Entity::atom(first.pos, momentum / combined_mass, combined_mass, size, 0)
}
