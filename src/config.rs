//! Controller tuning.
//!
//! Everything here is gameplay feel, not correctness: thresholds and speeds can be
//! changed freely per actor. Units are pixels and seconds, y grows downward.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cutoffs that sort a contact normal into wall / ceiling / ground.
///
/// Normals point out of the geometry, so a floor under the actor has `n.y ≈ -1`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactThresholds {
    /// `n.y <= ground_normal_y` counts as ground.
    pub ground_normal_y: f32,
    /// `|n.x| >= wall_normal_x` (and small `|n.y|`) counts as a wall.
    pub wall_normal_x: f32,
    /// Largest `|n.y|` a wall normal may have.
    pub wall_slack_y: f32,
    /// `n.y >= ceiling_normal_y` counts as a ceiling.
    pub ceiling_normal_y: f32,
}

impl Default for ContactThresholds {
    fn default() -> Self {
        Self {
            ground_normal_y: -0.6,
            wall_normal_x: 0.90,
            wall_slack_y: 0.25,
            ceiling_normal_y: 0.65,
        }
    }
}

/// What the solver needs out of a [`ControllerConfig`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SolverSettings {
    pub iterations: u32,
    pub thresholds: ContactThresholds,
}

impl Default for SolverSettings {
    fn default() -> Self {
        ControllerConfig::default().solver_settings()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub radius: f32,
    /// Center to top/bottom; clamped up to `radius` when smaller.
    pub half_height: f32,

    /// px/s
    pub move_speed: f32,
    /// px/s²
    pub accel_ground: f32,
    pub accel_air: f32,

    /// px/s², positive pulls toward +y (down).
    pub gravity: f32,
    /// Terminal fall speed, px/s.
    pub max_fall: f32,

    /// Launch speed; applied as `-jump_speed` on y.
    pub jump_speed: f32,
    /// Seconds after leaving ground during which a jump is still honored.
    pub coyote_time: f32,
    /// Seconds an early jump press is remembered before landing.
    pub jump_buffer: f32,

    /// Downward probe length used to re-attach to ground.
    pub snap_distance: f32,
    pub solver_iterations: u32,
    pub thresholds: ContactThresholds,

    /// Largest ledge climbed without jumping.
    pub step_height: f32,
    /// Ground normals with `|n.x|` above this are slopes; step-up is skipped on them.
    pub step_slope_normal_x: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            radius: 18.0,
            half_height: 44.0,
            move_speed: 520.0,
            accel_ground: 7000.0,
            accel_air: 4200.0,
            gravity: 2600.0,
            max_fall: 1800.0,
            jump_speed: 980.0,
            coyote_time: 0.10,
            jump_buffer: 0.10,
            snap_distance: 4.0,
            solver_iterations: 6,
            thresholds: ContactThresholds::default(),
            step_height: 12.0,
            step_slope_normal_x: 0.2,
        }
    }
}

impl ControllerConfig {
    pub fn solver_settings(&self) -> SolverSettings {
        SolverSettings {
            iterations: self.solver_iterations,
            thresholds: self.thresholds,
        }
    }

    /// Reject values the controller cannot produce sensible motion from.
    ///
    /// `half_height < radius` is allowed (the capsule degenerates to a circle).
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("radius", self.radius), ("half_height", self.half_height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::NonPositive { field, value });
            }
        }
        for (field, value) in [
            ("move_speed", self.move_speed),
            ("accel_ground", self.accel_ground),
            ("accel_air", self.accel_air),
            ("gravity", self.gravity),
            ("max_fall", self.max_fall),
            ("jump_speed", self.jump_speed),
            ("coyote_time", self.coyote_time),
            ("jump_buffer", self.jump_buffer),
            ("snap_distance", self.snap_distance),
            ("step_height", self.step_height),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::Negative { field, value });
            }
        }
        if self.solver_iterations == 0 {
            return Err(Error::NoSolverIterations);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_offending_field() {
        let cfg = ControllerConfig { radius: 0.0, ..Default::default() };
        assert_eq!(cfg.validate(), Err(Error::NonPositive { field: "radius", value: 0.0 }));

        let cfg = ControllerConfig { gravity: -1.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::Negative { field: "gravity", .. })));

        let cfg = ControllerConfig { jump_speed: f32::NAN, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::Negative { field: "jump_speed", .. })));

        let cfg = ControllerConfig { solver_iterations: 0, ..Default::default() };
        assert_eq!(cfg.validate(), Err(Error::NoSolverIterations));
    }

    #[test]
    fn test_short_half_height_is_accepted() {
        let cfg = ControllerConfig { radius: 20.0, half_height: 10.0, ..Default::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let cfg: ControllerConfig =
            serde_json::from_str(r#"{ "move_speed": 300.0, "thresholds": { "ground_normal_y": -0.7 } }"#)
                .unwrap();
        assert_eq!(cfg.move_speed, 300.0);
        assert_eq!(cfg.thresholds.ground_normal_y, -0.7);
        assert_eq!(cfg.thresholds.wall_normal_x, 0.90);
        assert_eq!(cfg.radius, 18.0);
        assert_eq!(cfg.solver_iterations, 6);

        let json = serde_json::to_string(&cfg).unwrap();
        let back: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
