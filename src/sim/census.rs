//! Population counts over time

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity};
use crate::consts::CENSUS_SAMPLES;

/// Entity counts at one instant; ions are not counted as atoms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub electrons: usize,
    pub atoms: usize,
    pub positive_ions: usize,
    pub negative_ions: usize,
    pub walls: usize,
}

impl Census {
    pub fn from_entities<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut census = Self::default();
        for entity in entities {
            match entity.body() {
                Body::Electron(_) => census.electrons += 1,
                Body::Wall(_) => census.walls += 1,
                Body::Atom(a) if a.charge > 0 => census.positive_ions += 1,
                Body::Atom(a) if a.charge < 0 => census.negative_ions += 1,
                Body::Atom(_) => census.atoms += 1,
            }
        }
        census
    }

    /// Largest particle count in this sample
    pub fn max_count(&self) -> usize {
        self.electrons
            .max(self.atoms)
            .max(self.positive_ions)
            .max(self.negative_ions)
    }
}

/// Bounded ring of census samples; the oldest sample is dropped when full
#[derive(Debug, Clone)]
pub struct CensusHistory {
    samples: VecDeque<Census>,
    capacity: usize,
}

impl Default for CensusHistory {
    fn default() -> Self {
        Self::with_capacity(CENSUS_SAMPLES)
    }
}

impl CensusHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, census: Census) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(census);
    }

    pub fn latest(&self) -> Option<&Census> {
        self.samples.back()
    }

    /// Highest particle count across the retained samples (graph scale)
    pub fn peak(&self) -> usize {
        self.samples.iter().map(Census::max_count).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Census> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn test_census_counts_each_kind() {
        let entities = [
            Entity::electron(DVec2::ZERO, DVec2::ZERO, 1e-4, 0.2),
            Entity::electron(DVec2::X, DVec2::ZERO, 1e-4, 0.2),
            Entity::wall(DVec2::ZERO, DVec2::Y, 0.0),
            Entity::atom(DVec2::ZERO, DVec2::ZERO, 1e-3, 1.0, 0),
            Entity::atom(DVec2::ZERO, DVec2::ZERO, 1e-3, 1.0, 2),
            Entity::atom(DVec2::ZERO, DVec2::ZERO, 1e-3, 1.0, -1),
            Entity::atom(DVec2::ZERO, DVec2::ZERO, 1e-3, 1.0, -3),
        ];
        let census = Census::from_entities(&entities);
        assert_eq!(
            census,
            Census {
                electrons: 2,
                atoms: 1,
                positive_ions: 1,
                negative_ions: 2,
                walls: 1,
            }
        );
        assert_eq!(census.max_count(), 2);
    }

    #[test]
    fn test_history_drops_oldest() {
        let mut history = CensusHistory::with_capacity(3);
        assert!(history.is_empty());
        assert_eq!(history.peak(), 0);

        for electrons in [9, 1, 2, 3] {
            history.record(Census {
                electrons,
                ..Default::default()
            });
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.latest().map(|c| c.electrons), Some(3));
        // The 9 fell out of the window
        assert_eq!(history.peak(), 3);
    }

    #[test]
    fn test_walls_do_not_set_peak() {
        let mut history = CensusHistory::default();
        history.record(Census {
            walls: 50,
            atoms: 4,
            ..Default::default()
        });
        assert_eq!(history.peak(), 4);
    }
}
