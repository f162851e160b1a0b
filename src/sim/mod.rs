//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (arena order)
//! - No rendering or platform dependencies

pub mod census;
pub mod collision;
pub mod entity;
pub mod field;
pub mod interaction;
pub mod reaction;
pub mod scene;
pub mod world;

pub use census::{Census, CensusHistory};
pub use entity::{Atom, Body, Electron, Entity, EntityKind, Polarity, Wall};
pub use interaction::{PairInteraction, canonical, interaction, needs_swap};
pub use scene::{Bounds, Enclosure, ParticleKind, SceneLayout, enclose, populate, spawn_particle};
pub use world::{Collision, EntityId, Simulator, TickReport};
