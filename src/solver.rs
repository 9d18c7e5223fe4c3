//! Iterative positional solver.
//!
//! Each pass resolves the single deepest tile contact, strips the velocity that
//! points into it and folds the contact's classification into a [`SolveResult`].
//! Flags only ever turn on within one solve.

use glam::Vec2;
use tracing::trace;

use crate::api::TileGridApi;
use crate::broadphase::find_best_contact;
use crate::config::{ContactThresholds, SolverSettings};
use crate::types::*;

/// Default ground normal: flat floor in y-down space.
pub const UP_NORMAL: Vec2 = Vec2::new(0.0, -1.0);

/// How one contact normal reads to the character.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactClass {
    pub wall: bool,
    pub ceiling: bool,
    pub ground: bool,
}

impl ContactThresholds {
    pub fn classify(&self, n: Vec2) -> ContactClass {
        ContactClass {
            wall: n.x.abs() >= self.wall_normal_x && n.y.abs() <= self.wall_slack_y,
            ceiling: n.y >= self.ceiling_normal_y,
            ground: n.y <= self.ground_normal_y,
        }
    }
}

/// Accumulated outcome of one solve call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolveResult {
    pub hit_wall: bool,
    pub hit_ceiling: bool,
    pub grounded: bool,
    /// Normal of the latest ground-classified contact, [`UP_NORMAL`] if none.
    pub ground_normal: Vec2,
    /// Iterations that resolved a contact.
    pub contacts: usize,
}

impl Default for SolveResult {
    fn default() -> Self {
        Self {
            hit_wall: false,
            hit_ceiling: false,
            grounded: false,
            ground_normal: UP_NORMAL,
            contacts: 0,
        }
    }
}

impl SolveResult {
    /// Fold one classified contact in. Never clears a flag already set.
    pub fn absorb(mut self, normal: Vec2, class: ContactClass) -> Self {
        self.hit_wall |= class.wall;
        self.hit_ceiling |= class.ceiling;
        if class.ground {
            self.grounded = true;
            self.ground_normal = normal;
        }
        self.contacts += 1;
        self
    }
}

/// Remove the part of `velocity` heading into a surface with normal `n`.
#[inline]
pub fn strip_inward(velocity: Vec2, n: Vec2) -> Vec2 {
    let vn = velocity.dot(n);
    if vn < 0.0 { velocity - n * vn } else { velocity }
}

/// Push `capsule` out of the grid, adjusting `velocity`, for up to
/// `settings.iterations` contacts.
pub fn solve<G: TileGridApi>(
    capsule: &mut Capsule,
    velocity: &mut Vec2,
    grid: &G,
    settings: &SolverSettings,
) -> SolveResult {
    let mut acc = SolveResult::default();
    for iter in 0..settings.iterations {
        let Some(contact) = find_best_contact(capsule, grid) else {
            break;
        };
        capsule.center += contact.normal * contact.penetration;
        *velocity = strip_inward(*velocity, contact.normal);

        let class = settings.thresholds.classify(contact.normal);
        trace!(iter, normal = ?contact.normal, depth = contact.penetration, ?class, "resolved contact");
        acc = acc.absorb(contact.normal, class);
    }
    acc
}
