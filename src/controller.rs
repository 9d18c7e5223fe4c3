//! Platformer character controller.
//!
//! One fixed tick runs: timers, horizontal acceleration, gravity, jump, a
//! horizontal sub-move (with step-up over short ledges), a vertical sub-move,
//! ground snapping and finally projection of velocity onto the ground tangent.
//! Grounded for a tick is the OR of every solve the tick keeps plus the snap.

use glam::Vec2;
use tracing::{debug, trace};

use crate::api::{KinematicControllerApi, TileGridApi};
use crate::broadphase::find_best_contact;
use crate::config::{ControllerConfig, SolverSettings};
use crate::error::Result;
use crate::math;
use crate::solver::{self, SolveResult, UP_NORMAL};
use crate::types::*;

/// Horizontal deltas at or below this never trigger a step-up.
const MIN_STEP_DX: f32 = 0.001;

/// Mutable per-actor state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControllerState {
    pub capsule: Capsule,
    pub velocity: Vec2,
    pub grounded: bool,
    pub ground_normal: Vec2,
    /// `grounded` as it was at the start of the current tick.
    pub was_grounded: bool,
    pub coyote_timer: f32,
    pub jump_buffer_timer: f32,
}

/// Position + velocity, for speculative moves that may be rolled back.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Clone, Debug)]
pub struct CharacterController {
    cfg: ControllerConfig,
    solver: SolverSettings,
    state: ControllerState,
    stats: TickStats,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl CharacterController {
    /// Build without validation. A `half_height` below `radius` degrades to a circle.
    pub fn new(cfg: ControllerConfig) -> Self {
        if cfg.half_height < cfg.radius {
            debug!(
                radius = cfg.radius,
                half_height = cfg.half_height,
                "capsule shorter than its diameter; treating as a circle"
            );
        }
        let capsule = Capsule::new(Vec2::ZERO, cfg.radius, cfg.half_height);
        Self {
            solver: cfg.solver_settings(),
            cfg,
            state: ControllerState {
                capsule,
                velocity: Vec2::ZERO,
                grounded: false,
                ground_normal: UP_NORMAL,
                was_grounded: false,
                coyote_timer: 0.0,
                jump_buffer_timer: 0.0,
            },
            stats: TickStats::default(),
        }
    }

    /// Validate `cfg` first.
    pub fn try_new(cfg: ControllerConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::new(cfg))
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.cfg
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn capsule(&self) -> &Capsule {
        &self.state.capsule
    }

    /// Counters from the most recent [`tick`](KinematicControllerApi::tick).
    pub fn last_tick_stats(&self) -> TickStats {
        self.stats
    }

    /// Move without touching velocity, timers or ground state.
    pub fn set_position(&mut self, position: Vec2) {
        self.state.capsule.center = position;
    }

    pub fn snapshot(&self) -> MotionSnapshot {
        MotionSnapshot {
            position: self.state.capsule.center,
            velocity: self.state.velocity,
        }
    }

    pub fn restore(&mut self, snap: MotionSnapshot) {
        self.state.capsule.center = snap.position;
        self.state.velocity = snap.velocity;
    }

    fn solve<G: TileGridApi>(&mut self, grid: &G) -> SolveResult {
        let res = solver::solve(&mut self.state.capsule, &mut self.state.velocity, grid, &self.solver);
        self.stats.solves += 1;
        self.stats.contacts += res.contacts;
        res
    }

    /// Move by `dx` and resolve; climbs a short ledge instead when the move
    /// hits a wall while standing on level-ish ground.
    fn move_horizontal<G: TileGridApi>(&mut self, dx: f32, jumped: bool, grid: &G) -> SolveResult {
        let before = self.snapshot();
        self.state.capsule.center.x += dx;
        let plain = self.solve(grid);

        let groundish = self.state.was_grounded || plain.grounded;
        let on_slope = plain.grounded && plain.ground_normal.x.abs() > self.cfg.step_slope_normal_x;
        if jumped || !groundish || on_slope || !plain.hit_wall || dx.abs() <= MIN_STEP_DX {
            return plain;
        }

        let after = self.snapshot();
        self.restore(before);
        match self.try_step_up(dx, grid) {
            Some(res) => res,
            None => {
                self.restore(after);
                plain
            }
        }
    }

    /// Lift by `step_height`, move by `dx`, settle back down.
    ///
    /// On failure the motion snapshot taken on entry is restored verbatim.
    fn try_step_up<G: TileGridApi>(&mut self, dx: f32, grid: &G) -> Option<SolveResult> {
        let snap = self.snapshot();
        self.stats.step_up_attempts += 1;

        self.state.capsule.center.y -= self.cfg.step_height;
        let lifted = self.solve(grid);
        if lifted.hit_ceiling {
            debug!(position = ?snap.position, "step-up blocked by ceiling");
            self.restore(snap);
            return None;
        }

        self.state.capsule.center.x += dx;
        let across = self.solve(grid);
        if across.hit_wall {
            debug!(position = ?snap.position, "step-up blocked by wall");
            self.restore(snap);
            return None;
        }

        let mut res = across;
        if lifted.grounded && !across.grounded {
            res.grounded = true;
            res.ground_normal = lifted.ground_normal;
        }
        if let Some(n) = self.try_ground_snap(grid) {
            res.grounded = true;
            res.ground_normal = n;
        }
        self.stats.step_ups += 1;
        debug!(from = ?snap.position, to = ?self.state.capsule.center, "stepped up");
        Some(res)
    }

    /// Probe `snap_distance` down; on ground, move onto it and return its normal.
    fn try_ground_snap<G: TileGridApi>(&mut self, grid: &G) -> Option<Vec2> {
        let mut probe = self.state.capsule;
        probe.center.y += self.cfg.snap_distance;

        let contact = find_best_contact(&probe, grid)?;
        if !self.solver.thresholds.classify(contact.normal).ground {
            return None;
        }
        probe.center += contact.normal * contact.penetration;
        self.state.capsule = probe;
        self.state.coyote_timer = self.cfg.coyote_time;
        self.stats.snaps += 1;
        trace!(normal = ?contact.normal, "snapped to ground");
        Some(contact.normal)
    }

    fn update_timers(&mut self, dt: f32, jump_pressed: bool) {
        let st = &mut self.state;
        st.coyote_timer = if st.grounded {
            self.cfg.coyote_time
        } else {
            (st.coyote_timer - dt).max(0.0)
        };
        st.jump_buffer_timer = if jump_pressed {
            self.cfg.jump_buffer
        } else {
            (st.jump_buffer_timer - dt).max(0.0)
        };
    }

    /// Returns true when a jump was launched this tick.
    fn try_jump(&mut self) -> bool {
        let st = &mut self.state;
        if st.jump_buffer_timer > 0.0 && st.coyote_timer > 0.0 {
            st.velocity.y = -self.cfg.jump_speed;
            st.grounded = false;
            st.coyote_timer = 0.0;
            st.jump_buffer_timer = 0.0;
            debug!(position = ?st.capsule.center, "jump");
            true
        } else {
            false
        }
    }
}

impl KinematicControllerApi for CharacterController {
    fn position(&self) -> Vec2 {
        self.state.capsule.center
    }

    fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    fn ground_normal(&self) -> Vec2 {
        self.state.ground_normal
    }

    fn bounds_aabb(&self) -> Aabb {
        self.state.capsule.aabb()
    }

    fn teleport_to(&mut self, position: Vec2) {
        let st = &mut self.state;
        st.capsule.center = position;
        st.velocity = Vec2::ZERO;
        st.grounded = false;
        st.was_grounded = false;
        st.ground_normal = UP_NORMAL;
        st.coyote_timer = 0.0;
        st.jump_buffer_timer = 0.0;
        debug!(?position, "teleported");
    }

    fn tick<G: TileGridApi>(&mut self, dt: f32, move_axis: f32, jump_pressed: bool, grid: &G) {
        if !(dt.is_finite() && dt > 0.0) {
            trace!(dt, "skipping tick with unusable dt");
            return;
        }
        self.stats = TickStats::default();
        self.state.was_grounded = self.state.grounded;

        self.update_timers(dt, jump_pressed);

        let target_vx = math::clamp(move_axis, -1.0, 1.0) * self.cfg.move_speed;
        let accel = if self.state.grounded { self.cfg.accel_ground } else { self.cfg.accel_air };
        let vel = &mut self.state.velocity;
        vel.x = math::move_towards(vel.x, target_vx, accel * dt);
        vel.y = (vel.y + self.cfg.gravity * dt).min(self.cfg.max_fall);

        let jumped = self.try_jump();
        let delta = self.state.velocity * dt;

        let res_x = self.move_horizontal(delta.x, jumped, grid);

        self.state.capsule.center.y += delta.y;
        let res_y = self.solve(grid);

        // Ground contacts found while launching don't count.
        let (mut grounded, mut ground_normal) = match (res_y.grounded, res_x.grounded) {
            _ if jumped => (false, UP_NORMAL),
            (true, _) => (true, res_y.ground_normal),
            (false, true) => (true, res_x.ground_normal),
            (false, false) => (false, UP_NORMAL),
        };

        if !grounded && self.state.was_grounded && self.state.velocity.y >= 0.0 {
            if let Some(n) = self.try_ground_snap(grid) {
                grounded = true;
                ground_normal = n;
                if self.state.velocity.y > 0.0 {
                    self.state.velocity.y = 0.0;
                }
            }
        }

        self.state.grounded = grounded;
        self.state.ground_normal = ground_normal;

        if grounded {
            let tangent = math::normalize_eps(math::perp(ground_normal));
            let v = self.state.velocity;
            self.state.velocity = tangent * v.dot(tangent);
        }

        match (self.state.was_grounded, grounded) {
            (false, true) => debug!(position = ?self.state.capsule.center, normal = ?ground_normal, "landed"),
            (true, false) => debug!(position = ?self.state.capsule.center, "left ground"),
            _ => {}
        }
    }
}
