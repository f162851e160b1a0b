//! Scene generation: the boundary box and randomly placed particles

use std::path::Path;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::world::{EntityId, Simulator};
use crate::consts::{ATOM_RADIUS_MAX, ATOM_RADIUS_MIN, DEFAULT_TICKS, ELECTRON_RADIUS, ION_SHARE, SPAWN_SPEED};
use crate::error::{Error, Result};
use crate::sphere_volume;

/// Axis-aligned arena extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: DVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Handles of the four boundary walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enclosure {
    pub top: EntityId,
    pub bottom: EntityId,
    pub left: EntityId,
    pub right: EntityId,
}

impl Enclosure {
    /// The two walls whose fields act along the x axis
    pub fn electrodes(&self) -> [EntityId; 2] {
        [self.left, self.right]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Electron,
    Atom,
    PositiveIon,
    NegativeIon,
}

/// Surround `bounds` with four uncharged walls
pub fn enclose(sim: &mut Simulator, bounds: Bounds) -> Result<Enclosure> {
    let top = sim.spawn(Entity::wall(DVec2::new(bounds.min.x, bounds.max.y), DVec2::X, 0.0))?;
    let bottom = sim.spawn(Entity::wall(bounds.min, DVec2::X, 0.0))?;
    let left = sim.spawn(Entity::wall(bounds.min, DVec2::Y, 0.0))?;
    let right = sim.spawn(Entity::wall(DVec2::new(bounds.max.x, bounds.min.y), DVec2::Y, 0.0))?;
    Ok(Enclosure {
        top,
        bottom,
        left,
        right,
    })
}

fn sample(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
    if lo < hi { rng.random_range(lo..hi) } else { (lo + hi) / 2.0 }
}

/// Spawn one particle at a random spot with a random velocity
pub fn spawn_particle(sim: &mut Simulator, bounds: Bounds, kind: ParticleKind) -> Result<EntityId> {
    let electron_mass = sim.settings().electron_mass;
    let density = sim.settings().atom_density;
    let rng = sim.rng_mut();

    let radius = sample(rng, ATOM_RADIUS_MIN, ATOM_RADIUS_MAX);
    let inset = 2.0 * radius;
    let pos = DVec2::new(
        sample(rng, bounds.min.x + inset, bounds.max.x - inset),
        sample(rng, bounds.min.y + inset, bounds.max.y - inset),
    );
    let vel = DVec2::new(
        rng.random_range(-SPAWN_SPEED..SPAWN_SPEED),
        rng.random_range(-SPAWN_SPEED..SPAWN_SPEED),
    );

    let entity = match kind {
        ParticleKind::Electron => Entity::electron(pos, vel, electron_mass, ELECTRON_RADIUS),
        ParticleKind::Atom | ParticleKind::PositiveIon | ParticleKind::NegativeIon => {
            let charge = match kind {
                ParticleKind::PositiveIon => 1,
                ParticleKind::NegativeIon => -1,
                _ => 0,
            };
            Entity::atom(pos, vel, sphere_volume(radius) * density, radius, charge)
        }
    };
    sim.spawn(entity)
}

/// Start-up population; a share of the atoms start as positive ions
pub fn populate(sim: &mut Simulator, bounds: Bounds, electrons: usize, atoms: usize) -> Result<()> {
    for _ in 0..electrons {
        spawn_particle(sim, bounds, ParticleKind::Electron)?;
    }
    for _ in 0..atoms {
        let kind = if sim.rng_mut().random_bool(ION_SHARE) {
            ParticleKind::PositiveIon
        } else {
            ParticleKind::Atom
        };
        spawn_particle(sim, bounds, kind)?;
    }
    log::info!("Populated arena with {electrons} electrons and {atoms} atoms");
    Ok(())
}

/// Arena size, population and run length for the headless driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayout {
    pub width: f64,
    pub height: f64,
    pub electrons: usize,
    pub atoms: usize,
    pub seed: u64,
    pub ticks: u64,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            width: 55.0,
            height: 24.0,
            electrons: 25,
            atoms: 25,
            seed: 0,
            ticks: DEFAULT_TICKS,
        }
    }
}

impl SceneLayout {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(DVec2::ZERO, DVec2::new(self.width, self.height))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || !self.height.is_finite() || self.width <= 0.0 || self.height <= 0.0 {
            return Err(Error::InvalidSettings(format!(
                "scene must have a finite positive size, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let layout: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        layout.validate()?;
        log::info!("Loaded scene layout from {}", path.display());
        Ok(layout)
    }

    /// Build the walls and the start-up population
    pub fn build(&self, sim: &mut Simulator) -> Result<Enclosure> {
        self.validate()?;
        let bounds = self.bounds();
        let enclosure = enclose(sim, bounds)?;
        populate(sim, bounds, self.electrons, self.atoms)?;
        Ok(enclosure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::EntityKind;

    fn sim(seed: u64) -> Simulator {
        Simulator::new(Settings::default(), seed).unwrap()
    }

    #[test]
    fn test_enclose_places_walls_on_edges() {
        let mut sim = sim(1);
        let bounds = Bounds::new(DVec2::ZERO, DVec2::new(10.0, 4.0));
        let walls = enclose(&mut sim, bounds).unwrap();

        let top = sim.get(walls.top).unwrap();
        assert_eq!(top.pos.y, 4.0);
        assert_eq!(top.as_wall().map(|w| w.direction), Some(DVec2::X));

        let right = sim.get(walls.right).unwrap();
        assert_eq!(right.pos.x, 10.0);
        assert_eq!(right.as_wall().map(|w| w.direction), Some(DVec2::Y));

        assert_eq!(sim.census().walls, 4);
        for id in walls.electrodes() {
            assert_eq!(sim.get(id).and_then(|e| e.as_wall()).map(|w| w.field), Some(0.0));
        }
    }

    #[test]
    fn test_spawned_particles_respect_ranges() {
        let mut sim = sim(2);
        let bounds = Bounds::new(DVec2::ZERO, DVec2::new(55.0, 24.0));
        for _ in 0..50 {
            let id = spawn_particle(&mut sim, bounds, ParticleKind::Atom).unwrap();
            let atom = sim.get(id).unwrap();
            let size = atom.as_atom().map_or(0.0, |a| a.size);
            assert!((ATOM_RADIUS_MIN..ATOM_RADIUS_MAX).contains(&size));
            assert!(bounds.contains(atom.pos));
            assert!(atom.pos.x >= 2.0 * size && atom.pos.x <= 55.0 - 2.0 * size);
            assert!(atom.vel.abs().max_element() <= SPAWN_SPEED);
            let expected_mass = sphere_volume(size) * sim.settings().atom_density;
            assert!((atom.mass - expected_mass).abs() < 1e-15);
        }

        let id = spawn_particle(&mut sim, bounds, ParticleKind::Electron).unwrap();
        let electron = sim.get(id).unwrap();
        assert_eq!(electron.as_electron().map(|e| e.radius), Some(ELECTRON_RADIUS));
        assert_eq!(electron.mass, sim.settings().electron_mass);
    }

    #[test]
    fn test_ion_kinds_carry_charge() {
        let mut sim = sim(3);
        let bounds = Bounds::new(DVec2::ZERO, DVec2::new(20.0, 20.0));
        let p = spawn_particle(&mut sim, bounds, ParticleKind::PositiveIon).unwrap();
        let n = spawn_particle(&mut sim, bounds, ParticleKind::NegativeIon).unwrap();
        assert_eq!(sim.get(p).and_then(|e| e.as_atom()).map(|a| a.charge), Some(1));
        assert_eq!(sim.get(n).and_then(|e| e.as_atom()).map(|a| a.charge), Some(-1));
    }

    #[test]
    fn test_tiny_bounds_do_not_panic() {
        let mut sim = sim(4);
        let bounds = Bounds::new(DVec2::ZERO, DVec2::new(1.0, 1.0));
        let id = spawn_particle(&mut sim, bounds, ParticleKind::Atom).unwrap();
        assert_eq!(sim.get(id).map(|e| e.pos), Some(DVec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_default_layout_population() {
        let mut sim = sim(5);
        let layout = SceneLayout::default();
        layout.build(&mut sim).unwrap();

        let census = sim.census();
        assert_eq!(census.electrons, 25);
        assert_eq!(census.atoms + census.positive_ions, 25);
        assert_eq!(census.negative_ions, 0);
        assert_eq!(census.walls, 4);
        assert_eq!(sim.iter().filter(|(_, e)| e.kind() == EntityKind::Wall).count(), 4);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let build = || {
            let mut sim = sim(9);
            SceneLayout::default().build(&mut sim).unwrap();
            sim.iter().map(|(_, e)| e.clone()).collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_layout_rejects_empty_arena() {
        let layout = SceneLayout {
            width: 0.0,
            ..Default::default()
        };
        assert!(matches!(layout.validate(), Err(Error::InvalidSettings(_))));
    }
}
