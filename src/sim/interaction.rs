//! Pairwise interaction table
//!
//! One entry per unordered pair of entity kinds. Handlers are written for the
//! canonical order `kind(first) <= kind(second)`; callers swap their handles
//! before invoking one.

use super::collision::{
    detect_atom_atom, detect_electron_atom, detect_electron_electron, detect_electron_wall,
    detect_wall_atom, respond_atom_atom, respond_electron_atom, respond_electron_electron,
    respond_electron_wall, respond_wall_atom,
};
use super::entity::{Entity, EntityKind};
use super::field::{distant_electron_wall, distant_wall_atom};
use super::reaction::{ReactionContext, react_atom_atom, react_electron_atom};
use super::world::Collision;
use crate::settings::Settings;

/// Velocity-only effect applied before integration
pub type DistantFn = fn(&mut Entity, &mut Entity, f64, &Settings);
/// Overlap test on post-integration positions
pub type DetectFn = fn(&Entity, &Entity) -> bool;
/// Velocity correction for a detected collision
pub type RespondFn = fn(&mut Entity, &mut Entity);
/// Structural change; `true` means the response is skipped
pub type ReactFn = fn(&mut ReactionContext<'_>, Collision) -> bool;

/// Handlers for one kind pair; `None` means "no such effect"
#[derive(Clone, Copy)]
pub struct PairInteraction {
    pub distant: Option<DistantFn>,
    pub detect: Option<DetectFn>,
    pub respond: Option<RespondFn>,
    pub react: Option<ReactFn>,
}

impl PairInteraction {
    const NONE: Self = Self {
        distant: None,
        detect: None,
        respond: None,
        react: None,
    };
}

const ELECTRON_ELECTRON: PairInteraction = PairInteraction {
    distant: None,
    detect: Some(detect_electron_electron),
    respond: Some(respond_electron_electron),
    react: None,
};

const ELECTRON_WALL: PairInteraction = PairInteraction {
    distant: Some(distant_electron_wall),
    detect: Some(detect_electron_wall),
    respond: Some(respond_electron_wall),
    react: None,
};

const ELECTRON_ATOM: PairInteraction = PairInteraction {
    distant: None,
    detect: Some(detect_electron_atom),
    respond: Some(respond_electron_atom),
    react: Some(react_electron_atom),
};

const WALL_WALL: PairInteraction = PairInteraction::NONE;

const WALL_ATOM: PairInteraction = PairInteraction {
    distant: Some(distant_wall_atom),
    detect: Some(detect_wall_atom),
    respond: Some(respond_wall_atom),
    react: None,
};

const ATOM_ATOM: PairInteraction = PairInteraction {
    distant: None,
    detect: Some(detect_atom_atom),
    respond: Some(respond_atom_atom),
    react: Some(react_atom_atom),
};

static INTERACTIONS: [[PairInteraction; EntityKind::COUNT]; EntityKind::COUNT] = [
    [ELECTRON_ELECTRON, ELECTRON_WALL, ELECTRON_ATOM],
    [ELECTRON_WALL, WALL_WALL, WALL_ATOM],
    [ELECTRON_ATOM, WALL_ATOM, ATOM_ATOM],
];

/// Handlers for a kind pair, independent of argument order
#[inline]
pub fn interaction(a: EntityKind, b: EntityKind) -> &'static PairInteraction {
    &INTERACTIONS[a.index()][b.index()]
}

/// Whether a pair held as `(a, b)` must be swapped into canonical order
#[inline]
pub fn needs_swap(a: EntityKind, b: EntityKind) -> bool {
    a > b
}

/// The pair in canonical order, and whether it had to be swapped
#[inline]
pub fn canonical(a: EntityKind, b: EntityKind) -> (EntityKind, EntityKind, bool) {
    if needs_swap(a, b) { (b, a, true) } else { (a, b, false) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [EntityKind; 3] = [EntityKind::Electron, EntityKind::Wall, EntityKind::Atom];

    fn shape(p: &PairInteraction) -> [bool; 4] {
        [
            p.distant.is_some(),
            p.detect.is_some(),
            p.respond.is_some(),
            p.react.is_some(),
        ]
    }

    #[test]
    fn test_table_is_symmetric() {
        for a in KINDS {
            for b in KINDS {
                assert_eq!(shape(interaction(a, b)), shape(interaction(b, a)));
            }
        }
    }

    #[test]
    fn test_wall_wall_has_no_handlers() {
        assert_eq!(shape(interaction(EntityKind::Wall, EntityKind::Wall)), [false; 4]);
    }

    #[test]
    fn test_only_walls_act_at_a_distance() {
        for a in KINDS {
            for b in KINDS {
                let involves_wall = a == EntityKind::Wall || b == EntityKind::Wall;
                let has_distant = interaction(a, b).distant.is_some();
                assert_eq!(has_distant, involves_wall && a != b);
            }
        }
    }

    #[test]
    fn test_reactions_only_involve_atoms() {
        assert!(interaction(EntityKind::Electron, EntityKind::Atom).react.is_some());
        assert!(interaction(EntityKind::Atom, EntityKind::Atom).react.is_some());
        assert!(interaction(EntityKind::Electron, EntityKind::Electron).react.is_none());
        assert!(interaction(EntityKind::Wall, EntityKind::Atom).react.is_none());
    }

    #[test]
    fn test_canonical_swap() {
        assert!(needs_swap(EntityKind::Atom, EntityKind::Electron));
        assert!(needs_swap(EntityKind::Wall, EntityKind::Electron));
        assert!(!needs_swap(EntityKind::Electron, EntityKind::Atom));
        assert!(!needs_swap(EntityKind::Atom, EntityKind::Atom));
        assert_eq!(
            canonical(EntityKind::Atom, EntityKind::Wall),
            (EntityKind::Wall, EntityKind::Atom, true)
        );
        assert_eq!(
            canonical(EntityKind::Electron, EntityKind::Electron),
            (EntityKind::Electron, EntityKind::Electron, false)
        );
    }
}
