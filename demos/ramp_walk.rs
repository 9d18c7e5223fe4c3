use glam::Vec2;
use tilecap::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Counts segments instead of rendering them.
#[derive(Default)]
struct SegmentCounter {
    segments: usize,
}

impl DebugDraw for SegmentCounter {
    fn draw_line(&mut self, _a: Vec2, _b: Vec2, _color: DebugColor) {
        self.segments += 1;
    }

    fn draw_polyline(&mut self, points: &[Vec2], _color: DebugColor, closed: bool) {
        self.segments += points.len().saturating_sub(1) + usize::from(closed && points.len() > 2);
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("tilecap=debug".parse()?))
        .init();

    // floor, a one-cell bump, then a 45° ramp up to a plateau
    let mut grid = TileGrid::new(40, 16);
    grid.fill_rect(0, 14, 39, 15, ColliderType::Solid);
    grid.set(8, 13, ColliderType::Slope45Up);
    grid.set(9, 13, ColliderType::Slope45Down);
    for k in 0..4 {
        grid.set(16 + k, 13 - k, ColliderType::Slope45Up);
        if k > 0 {
            grid.fill_rect(16 + k, 14 - k, 16 + k, 13, ColliderType::Solid);
        }
    }
    grid.fill_rect(20, 10, 39, 13, ColliderType::Solid);

    let mut player = CharacterController::try_new(ControllerConfig::default())?;
    player.teleport_to(Vec2::new(160.0, 700.0));

    let dt = 1.0 / 60.0;
    for frame in 0..240u32 {
        // hop once on the plateau
        let jump = frame == 200;
        player.tick(dt, 1.0, jump, &grid);
        if frame % 20 == 0 {
            let p = player.position();
            let v = player.velocity();
            println!(
                "t={:>3} pos=({:7.1},{:7.1}) vel=({:7.1},{:7.1}) grounded={} n=({:.2},{:.2})",
                frame, p.x, p.y, v.x, v.y, player.is_grounded(), player.ground_normal().x, player.ground_normal().y
            );
        }
    }

    let mut counter = SegmentCounter::default();
    draw_grid_colliders(&grid, &mut counter, DebugColor::TILE);
    player.debug_draw(&mut counter);
    println!("debug segments: {}", counter.segments);
    Ok(())
}
