//! Physics Toys entry point
//!
//! The web build is driven from JavaScript through `physics_toys::web`.
//! Natively this runs both scenes headless for a few seconds of simulated
//! time and logs what happened.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use physics_toys::Settings;
    use physics_toys::consts::MAX_FRAME_DT;
    use physics_toys::sim::{DoublePendulum, ParticleBox, Trace, pendulum_origin};
    use physics_toys::{auto_rotate_angle, clamp_frame_dt};

    const VIEW_WIDTH: f32 = 1280.0;
    const VIEW_HEIGHT: f32 = 720.0;
    const FRAMES: u32 = 600;
    const FRAME_DT: f32 = 1.0 / 60.0;

    env_logger::init();
    log::info!("Physics toys (native) starting...");

    let settings = Settings::load();
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);

    let mut world = ParticleBox::with_params(VIEW_WIDTH, VIEW_HEIGHT, settings.world.clone(), seed);
    settings.apply_to_world(&mut world);
    world.add_balls(settings.ball_count);
    let center = world.box_geometry().center;
    if !world.add_obstacle(center, settings.obstacle_radius) {
        log::warn!("Center obstacle did not fit in the box");
    }
    log::info!("Particle box seeded with {} (seed {})", world.particles().len(), seed);

    let mut pendulum = DoublePendulum::default();
    let mut trace = Trace::default();
    settings.apply_to_pendulum(&mut pendulum, &mut trace);
    let origin = pendulum_origin(VIEW_WIDTH, VIEW_HEIGHT);

    for frame in 0..FRAMES {
        let time_ms = frame as f64 * FRAME_DT as f64 * 1000.0;
        if settings.auto_rotate {
            world.set_box_angle(auto_rotate_angle(time_ms));
        }
        world.step(FRAME_DT);

        pendulum.step(clamp_frame_dt(FRAME_DT, MAX_FRAME_DT));
        let (_, lower) = pendulum.bob_positions(origin);
        trace.record(lower);

        if frame % 60 == 0 {
            log::info!(
                "t={:.1}s energy={:.0} penetration={:.2} pendulum=({:.3}, {:.3}) trace={}",
                time_ms / 1000.0,
                world.kinetic_energy(),
                world.total_penetration(),
                pendulum.state().angle1,
                pendulum.state().angle2,
                trace.len()
            );
        }
    }

    println!(
        "Simulated {} frames: {} particles, kinetic energy {:.0}, {} trace points",
        FRAMES,
        world.particles().len(),
        world.kinetic_energy(),
        trace.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
