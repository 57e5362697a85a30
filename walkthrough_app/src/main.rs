//! Headless walkthrough demo
//!
//! Builds a small level out of boxes and a ramp, then drives the avatar
//! through a scripted route: walk, jump onto a ledge, climb the ramp and
//! finally run off the edge of the world to trigger a respawn.
//!
//! Usage: `walkthrough [config.toml|config.ron]`

use avatar_physics::foundation::logging;
use avatar_physics::prelude::*;
use rand::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

/// One leg of the scripted route
struct Leg {
    name: &'static str,
    frames: u32,
    facing: Vec3,
    intent: MovementIntent,
}

impl Leg {
    fn new(name: &'static str, frames: u32, facing: Vec3, forward: f32) -> Self {
        Self {
            name,
            frames,
            facing,
            intent: MovementIntent { forward, right: 0.0, jump: false },
        }
    }

    fn jumping(mut self) -> Self {
        self.intent.jump = true;
        self
    }
}

/// Axis-aligned box as twelve triangles, outward winding
fn box_mesh(name: &str, center: Vec3, half: Vec3, yaw: f32) -> Result<WorldMesh, PhysicsError> {
    let vertices: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            )
        })
        .collect();
    let indices: [u32; 36] = [
        0, 4, 6, 0, 6, 2, // -X
        1, 3, 7, 1, 7, 5, // +X
        0, 1, 5, 0, 5, 4, // -Y
        2, 6, 7, 2, 7, 3, // +Y
        0, 2, 3, 0, 3, 1, // -Z
        4, 5, 7, 4, 7, 6, // +Z
    ];
    let rotation = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
    let transform = Transform::new(center, rotation, Vec3::new(1.0, 1.0, 1.0));
    WorldMesh::from_indexed(name, &vertices, &indices, &transform)
}

fn build_level(rng: &mut impl Rng) -> Result<MeshArena, PhysicsError> {
    let mut arena = MeshArena::new();

    arena.insert(box_mesh("floor", Vec3::new(0.0, -0.5, 0.0), Vec3::new(20.0, 0.5, 20.0), 0.0)?);
    arena.insert(box_mesh("ledge", Vec3::new(0.0, 0.5, -8.0), Vec3::new(4.0, 0.5, 2.0), 0.0)?);
    arena.insert(box_mesh("wall", Vec3::new(-12.0, 2.0, 0.0), Vec3::new(0.5, 2.0, 10.0), 0.0)?);

    // Ramp from the floor at z = 12 up to y = 3 at z = 4
    let ramp = WorldMesh::new(
        "ramp",
        vec![
            Triangle::new(Vec3::new(6.0, 0.0, 12.0), Vec3::new(10.0, 0.0, 12.0), Vec3::new(10.0, 3.0, 4.0)),
            Triangle::new(Vec3::new(6.0, 0.0, 12.0), Vec3::new(10.0, 3.0, 4.0), Vec3::new(6.0, 3.0, 4.0)),
        ],
    );
    arena.insert(ramp);

    for i in 0..6 {
        let center = Vec3::new(rng.gen_range(-10.0..-3.0), 0.4, rng.gen_range(2.0..14.0));
        let yaw = rng.gen_range(0.0..std::f32::consts::TAU);
        arena.insert(box_mesh(&format!("crate_{i}"), center, Vec3::new(0.4, 0.4, 0.4), yaw)?);
    }

    // Decorative banner; excluded from the index
    let banner = WorldMesh::new(
        "banner",
        vec![Triangle::new(Vec3::new(-2.0, 3.0, -10.0), Vec3::new(2.0, 3.0, -10.0), Vec3::new(0.0, 5.0, -10.0))],
    )
    .non_collidable();
    arena.insert(banner);

    Ok(arena)
}

fn load_config() -> Result<PhysicsConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading physics config from {}", path);
            let config = PhysicsConfig::load_from_file(&path)?;
            config.validate()?;
            Ok(config)
        }
        None => Ok(PhysicsConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(log::LevelFilter::Info);

    let config = load_config()?;
    let mut sim = Simulation::new(config)?;
    let mut rng = StdRng::seed_from_u64(7);

    // Nothing loaded yet: the avatar is parked
    let pose = sim.tick_elapsed(FRAME, &FrameInput::default());
    log::info!("Before load: {:?} at {:?}", pose.state, pose.start);

    let level = build_level(&mut rng)?;
    let index = sim.load_world(&level)?;
    log::info!(
        "Level: {} meshes, {} triangles, {} leaves, depth {}",
        level.len(),
        index.triangle_count(),
        index.leaf_count(),
        index.depth()
    );

    let north = Vec3::new(0.0, 0.0, -1.0);
    let east = Vec3::new(1.0, 0.0, 0.0);
    let south = Vec3::new(0.0, 0.0, 1.0);
    let route = [
        Leg::new("settle", 30, north, 0.0),
        Leg::new("walk to ledge", 20, north, 0.3),
        Leg::new("jump onto ledge", 40, north, 0.3).jumping(),
        Leg::new("cross ledge", 30, north, 0.3),
        Leg::new("head east", 60, east, 0.3),
        Leg::new("walk to ramp foot", 90, south, 0.3),
        Leg::new("climb ramp", 90, north, 0.3),
        Leg::new("run off the world", 300, east, 0.4),
    ];

    let mut respawns = 0;
    for leg in &route {
        let input = FrameInput::new(leg.intent).facing(leg.facing);
        for frame in 0..leg.frames {
            let before = sim.pose().start;
            let pose = sim.tick_elapsed(FRAME, &input);
            if before.y < -20.0 && pose.start == sim.config().spawn_start {
                respawns += 1;
                log::info!("Respawned during '{}' at frame {}", leg.name, frame);
            }
        }
        let pose = sim.pose();
        log::info!(
            "{:<20} foot ({:6.2}, {:6.2}, {:6.2}) {:?}",
            leg.name,
            pose.start.x,
            pose.start.y,
            pose.start.z,
            pose.state
        );
    }
    log::info!("Respawns: {}", respawns);

    // Same controls a desktop or VR host would feed in
    let input_config = sim.config().input.clone();
    let mut keys = KeyboardMovement::new();
    keys.key_down(KeyCode::D);
    keys.key_down(KeyCode::Shift);
    for _ in 0..30 {
        let input = FrameInput::new(keys.intent(FRAME, &input_config)).facing(north);
        sim.tick_elapsed(FRAME, &input);
    }
    keys.release_all();

    let stick = MovementIntent::from_thumbstick(0.0, -1.0, input_config.thumbstick_scale);
    for _ in 0..30 {
        sim.tick_elapsed(FRAME, &FrameInput::new(stick).facing(north));
    }
    let pose = sim.pose();
    log::info!("After keyboard and stick: foot {:?}, grounded {}", pose.start, pose.on_floor);

    sim.unload_world();
    let pose = sim.tick_elapsed(FRAME, &FrameInput::default());
    log::info!("After unload: {:?} at {:?}", pose.state, pose.start);

    Ok(())
}
