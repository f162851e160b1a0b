//! The simulator: entity arena and the four-phase tick
//!
//! Entities live in a generational slot arena. A handle to a removed entity
//! never resolves again, even after its slot is reused, which is how
//! collisions made stale by an earlier reaction in the same tick are detected
//! and skipped.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use super::census::Census;
use super::entity::Entity;
use super::interaction::{canonical, interaction, needs_swap};
use super::reaction::ReactionContext;
use crate::error::{Error, Result};
use crate::settings::Settings;

new_key_type! {
    /// Stable handle to an entity in the simulator
    pub struct EntityId;
}

/// A detected overlap, stored in canonical kind order
///
/// Only meaningful for the rest of the tick that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub first: EntityId,
    pub second: EntityId,
}

/// What happened during one call to [`Simulator::simulate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number (1-based)
    pub tick: u64,
    /// Collisions found in the detection phase
    pub collisions: usize,
    /// Collisions consumed by a chemical reaction
    pub reactions: usize,
    /// Collisions resolved by ordinary velocity response
    pub responses: usize,
    /// Collisions dropped because an entity was already gone
    pub stale_skipped: usize,
    /// Entities created by reactions
    pub spawned: usize,
    /// Entities consumed by reactions
    pub consumed: usize,
}

/// Owns every entity and advances them tick by tick
pub struct Simulator {
    entities: SlotMap<EntityId, Entity>,
    settings: Settings,
    rng: Pcg32,
    seed: u64,
    ticks: u64,
}

impl Simulator {
    /// Create an empty simulator; all randomness derives from `seed`
    pub fn new(settings: Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            entities: SlotMap::with_key(),
            settings,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            ticks: 0,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Seeded RNG shared with scene generation
    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Insert a caller-built entity after checking its invariants
    pub fn spawn(&mut self, entity: Entity) -> Result<EntityId> {
        entity.validate()?;
        Ok(self.entities.insert(entity))
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Edit an entity in place; the edit is rolled back if it breaks an
    /// entity invariant (see [`Entity::validate`])
    pub fn update(&mut self, id: EntityId, edit: impl FnOnce(&mut Entity)) -> Result<()> {
        let entity = self.entities.get_mut(id).ok_or(Error::UnknownEntity(id))?;
        let before = entity.clone();
        edit(entity);
        if let Err(e) = entity.validate() {
            *entity = before;
            return Err(e);
        }
        Ok(())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Read-only view for renderers, in stable arena order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn census(&self) -> Census {
        Census::from_entities(self.entities.values())
    }

    /// Set an electrode's field strength
    pub fn set_field(&mut self, id: EntityId, field: f64) -> Result<()> {
        let entity = self.entities.get_mut(id).ok_or(Error::UnknownEntity(id))?;
        let wall = entity.as_wall_mut().ok_or(Error::NotAWall(id))?;
        wall.field = field;
        Ok(())
    }

    /// Nudge an electrode's field by `steps` multiples of the configured step
    pub fn adjust_field(&mut self, id: EntityId, steps: i32) -> Result<f64> {
        let step = self.settings.field_step;
        let entity = self.entities.get_mut(id).ok_or(Error::UnknownEntity(id))?;
        let wall = entity.as_wall_mut().ok_or(Error::NotAWall(id))?;
        wall.field += f64::from(steps) * step;
        log::info!("electrode {id:?} field now {}", wall.field);
        Ok(wall.field)
    }

    /// Advance every entity by `dt`
    ///
    /// Phases run in strict order: distant interaction, integration,
    /// collision detection, resolution.
    pub fn simulate(&mut self, dt: f64) -> TickReport {
        self.ticks += 1;
        let mut report = TickReport {
            tick: self.ticks,
            ..Default::default()
        };

        let ids: Vec<EntityId> = self.entities.keys().collect();

        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                self.distant_interact(a, b, dt);
            }
        }

        for entity in self.entities.values_mut() {
            entity.integrate(dt);
        }

        let mut collisions = Vec::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if let Some(collision) = self.detect(a, b) {
                    collisions.push(collision);
                }
            }
        }
        report.collisions = collisions.len();

        let mut ctx = ReactionContext::new(&mut self.entities, &self.settings, &mut self.rng);
        for collision in collisions {
            if !ctx.entities.contains_key(collision.first) || !ctx.entities.contains_key(collision.second) {
                log::trace!("skipping stale collision {collision:?}");
                report.stale_skipped += 1;
                continue;
            }
            if resolve(&mut ctx, collision) {
                report.reactions += 1;
            } else {
                report.responses += 1;
            }
        }
        report.spawned = ctx.spawned;
        report.consumed = ctx.consumed;

        log::debug!(
            "tick {}: {} collisions, {} reactions, {} stale, {} entities",
            report.tick,
            report.collisions,
            report.reactions,
            report.stale_skipped,
            self.entities.len()
        );
        report
    }

    fn distant_interact(&mut self, a: EntityId, b: EntityId, dt: f64) {
        let Some([ea, eb]) = self.entities.get_disjoint_mut([a, b]) else {
            return;
        };
        let Some(distant) = interaction(ea.kind(), eb.kind()).distant else {
            return;
        };
        if needs_swap(ea.kind(), eb.kind()) {
            distant(eb, ea, dt, &self.settings);
        } else {
            distant(ea, eb, dt, &self.settings);
        }
    }

    fn detect(&self, a: EntityId, b: EntityId) -> Option<Collision> {
        let (ea, eb) = (self.entities.get(a)?, self.entities.get(b)?);
        let detect = interaction(ea.kind(), eb.kind()).detect?;
        let (_, _, swapped) = canonical(ea.kind(), eb.kind());
        let (first, second, ef, es) = if swapped {
            (b, a, eb, ea)
        } else {
            (a, b, ea, eb)
        };
        detect(ef, es).then_some(Collision { first, second })
    }

    /// Total linear momentum of all entities (walls contribute nothing)
    pub fn total_momentum(&self) -> DVec2 {
        self.entities.values().map(|e| e.vel * e.mass).sum()
    }

    /// Sum of kinetic energies
    pub fn total_kinetic_energy(&self) -> f64 {
        self.entities.values().map(Entity::kinetic_energy).sum()
    }
}

/// Try the chemical reaction first; fall back to the velocity response
///
/// Returns `true` when a reaction handled the collision.
fn resolve(ctx: &mut ReactionContext<'_>, collision: Collision) -> bool {
    let (Some(first), Some(second)) = (
        ctx.entities.get(collision.first),
        ctx.entities.get(collision.second),
    ) else {
        return false;
    };
    let pair = interaction(first.kind(), second.kind());

    if let Some(react) = pair.react {
        if react(ctx, collision) {
            return true;
        }
    }
    if let Some(respond) = pair.respond {
        if let Some([first, second]) = ctx.entities.get_disjoint_mut([collision.first, collision.second]) {
            respond(first, second);
        }
    }
    false
}
