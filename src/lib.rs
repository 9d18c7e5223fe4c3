//! tilecap: kinematic capsule collision and platformer character control on 2D tile grids.
//!
//! World space is y-down; a flat floor has normal `(0, -1)`.

pub mod types;
pub mod api;
pub mod config;
pub mod error;
pub mod math;
pub mod grid;
pub mod broadphase;
pub mod narrowphase;
pub mod solver;
pub mod controller;
pub mod debug;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::config::{ContactThresholds, ControllerConfig, SolverSettings};
pub use crate::error::{Error, Result};
pub use crate::grid::TileGrid;
pub use crate::narrowphase::Narrowphase;
pub use crate::solver::{SolveResult, UP_NORMAL};
pub use crate::controller::{CharacterController, ControllerState, MotionSnapshot};
pub use crate::debug::{DebugColor, draw_grid_colliders};
