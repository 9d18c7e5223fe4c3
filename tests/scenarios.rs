//! End-to-end controller behavior on small hand-built levels.

use glam::Vec2;
use tilecap::broadphase::find_best_contact;
use tilecap::*;
use tracing_subscriber::EnvFilter;

const DT: f32 = 1.0 / 60.0;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Teleport so the capsule bottom hovers 1px over `floor_y`, then settle.
fn settle_on(c: &mut CharacterController, g: &TileGrid, x: f32, floor_y: f32) {
    let hh = c.config().half_height;
    c.teleport_to(Vec2::new(x, floor_y - hh - 1.0));
    for _ in 0..10 {
        c.tick(DT, 0.0, false, g);
    }
    assert!(c.is_grounded(), "failed to settle at x={x}");
}

/// 64px cells, solid floor rows 10..=11 (top at y=640).
fn flat_level() -> TileGrid {
    let mut g = TileGrid::new(20, 12);
    g.fill_rect(0, 10, 19, 11, ColliderType::Solid);
    g
}

#[test]
fn drop_onto_flat_floor_comes_to_rest() {
    init_logging();
    let g = flat_level();
    let mut c = CharacterController::default();
    c.teleport_to(Vec2::new(300.0, 640.0 - 44.0 - 100.0));

    let mut first_grounded = None;
    for i in 0..120 {
        c.tick(DT, 0.0, false, &g);
        if c.is_grounded() && first_grounded.is_none() {
            first_grounded = Some(i);
        }
    }
    let landed = first_grounded.expect("never landed");
    assert!(landed < 60, "took {landed} ticks");

    assert!(c.is_grounded());
    assert!(c.velocity().y.abs() < 1e-3);
    assert_eq!(c.ground_normal(), UP_NORMAL);
    assert!((c.position().y - (640.0 - 44.0)).abs() < 0.01);
    let residual = find_best_contact(c.capsule(), &g).map_or(0.0, |ct| ct.penetration);
    assert!(residual <= 0.01, "residual penetration {residual}");
}

/// 20px cells, floor top at y=700, ledge starting at x=600 that is
/// `ledge_cells` tall. Step height raised to 24 so one cell is climbable.
fn ledge_level(ledge_cells: i32) -> (TileGrid, CharacterController) {
    let mut g = TileGrid::with_cell_size(60, 40, 20.0).unwrap();
    g.fill_rect(0, 35, 59, 36, ColliderType::Solid);
    g.fill_rect(30, 35 - ledge_cells, 59, 34, ColliderType::Solid);
    let cfg = ControllerConfig { step_height: 24.0, ..Default::default() };
    let mut c = CharacterController::try_new(cfg).unwrap();
    settle_on(&mut c, &g, 400.0, 700.0);
    (g, c)
}

#[test]
fn short_ledge_is_stepped_over() {
    init_logging();
    let (g, mut c) = ledge_level(1);
    let mut step_ups = 0;
    let mut highest = f32::INFINITY;
    for _ in 0..60 {
        c.tick(DT, 1.0, false, &g);
        step_ups += c.last_tick_stats().step_ups;
        highest = highest.min(c.position().y);
    }
    assert!(step_ups >= 1);
    assert!(c.position().x > 600.0 + 18.0);
    assert!(c.is_grounded());
    assert!((c.position().y - (680.0 - 44.0)).abs() < 0.05);
    // never rose more than a step plus a snap above the ledge top
    assert!(highest > 680.0 - 44.0 - 24.0 - 4.0 - 1.0, "rose to {highest}");
}

#[test]
fn tall_ledge_blocks() {
    init_logging();
    let (g, mut c) = ledge_level(2);
    let mut attempts = 0;
    let mut step_ups = 0;
    for _ in 0..60 {
        c.tick(DT, 1.0, false, &g);
        attempts += c.last_tick_stats().step_up_attempts;
        step_ups += c.last_tick_stats().step_ups;
        assert!(c.position().x <= 600.0 - 18.0 + 0.01);
    }
    assert!(attempts > 0);
    assert_eq!(step_ups, 0);
    assert!(c.velocity().x.abs() < 1e-3);
    assert!(c.is_grounded());
}

#[test]
fn ramp_keeps_ground_and_steady_speed() {
    init_logging();
    // flat floor until x=640, then a 45° ramp of six cells up to a platform at y=576
    let mut g = TileGrid::new(30, 20);
    g.fill_rect(0, 15, 9, 15, ColliderType::Solid);
    for k in 0..6 {
        g.set(10 + k, 14 - k, ColliderType::Slope45Up);
        g.fill_rect(10 + k, 15 - k, 10 + k, 15, ColliderType::Solid);
    }
    g.fill_rect(16, 9, 29, 15, ColliderType::Solid);

    let mut c = CharacterController::default();
    settle_on(&mut c, &g, 200.0, 960.0);

    let mut speeds = Vec::new();
    for _ in 0..200 {
        c.tick(DT, 1.0, false, &g);
        let x = c.position().x;
        if x > 1000.0 {
            break;
        }
        if (704.0..=960.0).contains(&x) {
            assert!(c.is_grounded(), "lost ground on ramp at x={x}");
            let s = std::f32::consts::FRAC_1_SQRT_2;
            assert!((c.ground_normal() - Vec2::new(-s, -s)).length() < 0.05);
        }
        if (800.0..=960.0).contains(&x) {
            speeds.push(c.velocity());
        }
    }
    assert!(speeds.len() >= 10, "only {} ramp samples", speeds.len());

    let mags: Vec<f32> = speeds.iter().map(|v| v.length()).collect();
    let lo = mags.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = mags.iter().copied().fold(0.0, f32::max);
    assert!(hi / lo < 1.02, "speed drifted {lo}..{hi}");
    for v in &speeds {
        // moving along the ramp, up and to the right
        assert!((v.x + v.y).abs() < 0.02 * v.length());
        assert!((v.x - 520.0).abs() < 0.1 * 520.0, "vx {}", v.x);
    }
}

#[test]
fn buffered_jump_fires_on_landing() {
    init_logging();
    let g = flat_level();
    let mut c = CharacterController::default();
    c.teleport_to(Vec2::new(300.0, 640.0 - 44.0 - 150.0));

    let mut pressed_at = None;
    let mut launched = false;
    for i in 0..120 {
        let mut press = false;
        if pressed_at.is_none() {
            // press exactly one tick before the landing tick
            let mut next = c.clone();
            next.tick(DT, 0.0, false, &g);
            if !next.is_grounded() {
                next.tick(DT, 0.0, false, &g);
                press = next.is_grounded();
            }
        }
        c.tick(DT, 0.0, press, &g);

        if press {
            pressed_at = Some(i);
            assert!(!c.is_grounded());
            assert!(c.velocity().y > 0.0);
            continue;
        }
        match pressed_at.map(|p| i - p) {
            Some(1) => assert!(c.is_grounded()),
            Some(2) => {
                assert!(c.velocity().y < -900.0);
                assert!(!c.is_grounded());
                launched = true;
                break;
            }
            _ => {}
        }
    }
    assert!(launched);
}

/// Floor top at y=640 for x < 640, lower floor top at y=960 beyond.
fn edge_level() -> TileGrid {
    let mut g = TileGrid::new(40, 16);
    g.fill_rect(0, 10, 9, 15, ColliderType::Solid);
    g.fill_rect(10, 15, 39, 15, ColliderType::Solid);
    g
}

/// Walk right until the first tick that ends airborne.
fn walk_off_edge(c: &mut CharacterController, g: &TileGrid) {
    for _ in 0..120 {
        c.tick(DT, 1.0, false, g);
        if !c.is_grounded() {
            return;
        }
    }
    panic!("never left the ground");
}

#[test]
fn coyote_jump_just_after_leaving_ground() {
    init_logging();
    let g = edge_level();
    let mut c = CharacterController::default();
    settle_on(&mut c, &g, 300.0, 640.0);
    walk_off_edge(&mut c, &g);

    c.tick(DT, 1.0, true, &g);
    assert!(c.velocity().y < -900.0);
    assert!(!c.is_grounded());
}

#[test]
fn late_jump_does_not_launch() {
    init_logging();
    let g = edge_level();
    let mut c = CharacterController::default();
    settle_on(&mut c, &g, 300.0, 640.0);
    walk_off_edge(&mut c, &g);

    for _ in 0..10 {
        c.tick(DT, 1.0, false, &g);
    }
    c.tick(DT, 1.0, true, &g);
    assert!(c.velocity().y > 0.0);

    let mut landed = false;
    for _ in 0..120 {
        c.tick(DT, 1.0, false, &g);
        if c.is_grounded() {
            landed = true;
            break;
        }
    }
    assert!(landed);
    assert!(c.position().y > 900.0);
    for _ in 0..10 {
        c.tick(DT, 1.0, false, &g);
        assert!(c.velocity().y > -1e-3);
        assert!(c.is_grounded());
    }
}

#[test]
fn jump_tick_is_never_grounded() {
    init_logging();
    let g = flat_level();
    let mut c = CharacterController::default();
    settle_on(&mut c, &g, 300.0, 640.0);
    for _ in 0..5 {
        c.tick(DT, 1.0, false, &g);
    }
    c.tick(DT, 1.0, true, &g);
    assert!(!c.is_grounded());
    assert!(c.velocity().y < 0.0);
    assert_eq!(c.last_tick_stats().snaps, 0);
}

#[test]
fn config_from_json_drives_controller() {
    let cfg: ControllerConfig = serde_json::from_str(r#"{ "jump_speed": 500.0, "gravity": 1000.0 }"#).unwrap();
    let g = flat_level();
    let mut c = CharacterController::try_new(cfg).unwrap();
    settle_on(&mut c, &g, 300.0, 640.0);
    c.tick(DT, 0.0, true, &g);
    assert!((c.velocity().y + 500.0).abs() < 1e-3);
}
