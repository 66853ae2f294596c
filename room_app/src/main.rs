//! Headless room walkthrough demo
//!
//! Assembles the furnished-room scene, walks a collision-resolved camera
//! through it for a few seconds of simulated time, casts a pick ray at
//! whatever ends up in front of the camera, and records one frame of draw
//! calls. Pass a `.ron` or `.toml` layout path to replace the built-in
//! room; pass `--dump <path>` to write the built-in room out instead.

use std::error::Error;

use walk_engine::prelude::*;
use walk_engine::scene::{build_scene, GeometryDescription, PlacementDescription};

/// The furnished room: four walls (two of them with window cutouts), floor
/// and ceiling sharing one slab geometry, two lamps, a nightstand, a chair,
/// a television, and two window panes sharing one frame geometry.
fn room_description() -> SceneDescription {
    let geometry = |name: &str, source: &str| GeometryDescription {
        name: name.to_string(),
        source: source.to_string(),
    };
    let place = |name: &str,
                 translation: [f32; 3],
                 rotation: [f32; 3],
                 scale: [f32; 3],
                 geometry: &str| PlacementDescription {
        name: name.to_string(),
        translation,
        rotation,
        scale,
        geometry: geometry.to_string(),
    };

    SceneDescription {
        geometries: vec![
            geometry("plain wall", "meshes/wall.obj"),
            geometry("window wall", "meshes/wall_window.obj"),
            geometry("slab", "meshes/slab.obj"),
            geometry("nightstand lamp", "meshes/lamp_small.obj"),
            geometry("ceiling lamp", "meshes/lamp_ceiling.obj"),
            geometry("nightstand", "meshes/nightstand.obj"),
            geometry("chair", "meshes/chair.obj"),
            geometry("tv", "meshes/tv.obj"),
            geometry("window pane", "meshes/window.obj"),
        ],
        placements: vec![
            place("north wall", [-0.6, 0.0, -3.0], [0.0, 90.0, 0.0], [0.3, 0.45, 0.3], "plain wall"),
            place("east wall", [4.6, 0.0, 1.9], [0.0, 0.0, 0.0], [0.31, 0.45, 0.3], "window wall"),
            place("west wall", [-5.0, 0.0, 1.9], [0.0, 0.0, 0.0], [0.3, 0.45, 0.3], "plain wall"),
            place("south wall", [0.0, 0.0, 7.2], [0.0, -90.0, 0.0], [0.32, 0.45, 0.3], "window wall"),
            place("floor", [0.0, 0.0, 3.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0], "slab"),
            place("ceiling", [0.0, 5.0, 3.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0], "slab"),
            place("reading lamp", [2.0, 2.0, -1.2], [-90.0, 0.0, 0.0], [0.02, 0.02, 0.02], "nightstand lamp"),
            place("main lamp", [-1.0, 5.5, 2.0], [-90.0, 0.0, 0.0], [0.013, 0.013, 0.013], "ceiling lamp"),
            place("nightstand", [2.0, 0.0, -0.8], [0.0, 0.0, 0.0], [0.6, 0.6, 0.6], "nightstand"),
            place("chair", [-1.5, 0.0, -1.2], [0.0, 0.0, 0.0], [2.5, 2.5, 2.5], "chair"),
            place("tv", [-1.0, 0.0, 5.0], [-90.0, 0.0, 0.0], [0.03, 0.03, 0.03], "tv"),
            place("east window", [4.4, 2.75, 0.0], [0.0, 180.0, 0.0], [0.7, 0.67, 0.8], "window pane"),
            place("south window", [1.92, 2.75, 6.97], [0.0, 90.0, 0.0], [0.7, 0.67, 0.8], "window pane"),
        ],
    }
}

/// Box-shaped stand-in point cloud, centered on the origin, sized like the
/// mesh the source names.
fn box_points(width: f32, height: f32, length: f32) -> Vec<Point3> {
    let (hx, hy, hz) = (width * 0.5, height * 0.5, length * 0.5);
    let mut points = Vec::with_capacity(8);
    for &x in &[-hx, hx] {
        for &y in &[-hy, hy] {
            for &z in &[-hz, hz] {
                points.push(Point3::new(x, y, z));
            }
        }
    }
    points
}

/// Resolve a geometry source to vertex positions.
///
/// Real OBJ files next to the binary win; anything missing falls back to a
/// proportioned box so the demo runs from a bare checkout.
fn load_points(source: &str) -> Result<Vec<Point3>, String> {
    if std::path::Path::new(source).exists() {
        return ObjPoints::load(source).map_err(|e| e.to_string());
    }
    let points = match source {
        "meshes/wall.obj" | "meshes/wall_window.obj" => box_points(1.0, 12.0, 32.0),
        "meshes/slab.obj" => box_points(10.0, 0.2, 9.0),
        "meshes/lamp_small.obj" => box_points(20.0, 20.0, 60.0),
        "meshes/lamp_ceiling.obj" => box_points(40.0, 40.0, 50.0),
        "meshes/nightstand.obj" => box_points(1.2, 2.0, 1.2),
        "meshes/chair.obj" => box_points(0.5, 0.6, 0.5),
        "meshes/tv.obj" => box_points(50.0, 10.0, 35.0),
        "meshes/window.obj" => box_points(0.2, 2.0, 3.0),
        other => return Err(format!("no built-in stand-in for `{other}`")),
    };
    Ok(points)
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let description = match args.next().as_deref() {
        Some("--dump") => {
            let path = args.next().ok_or("--dump needs a path")?;
            let description = room_description();
            description.save_to_file(&path)?;
            log::info!("wrote built-in layout to {path}");
            return Ok(());
        }
        Some(path) => SceneDescription::load_from_file(path)?,
        None => room_description(),
    };

    let mut scene = build_scene(&description, load_points)?;
    let mut controller = WalkController::new(&ControllerConfig::default());
    log::info!(
        "camera at {:?}, facing {:?}",
        controller.position(),
        controller.front()
    );

    // Three simulated seconds at 60 Hz: walk toward the north wall, turn,
    // and strafe along it. Collision resolution keeps the camera inside
    // the room the whole way.
    let delta_time = 1.0 / 60.0;
    for frame in 0..180 {
        if frame == 90 {
            controller.look(60.0, 0.0);
        }
        let direction = if frame < 120 {
            MoveDirection::Forward
        } else {
            MoveDirection::Right
        };
        let applied = controller.walk(direction, delta_time, &mut scene);
        if frame % 60 == 59 {
            log::info!(
                "frame {frame}: at {:?}, last step {:.3} units",
                controller.position(),
                applied.magnitude()
            );
        }
    }

    // Pick whatever the camera ended up looking at.
    let ray = Ray::new(controller.position(), controller.front())?;
    let mut hits = scene.query_intersections(&ray);
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    match hits.first() {
        Some(hit) => {
            let name = scene
                .node(hit.node)
                .map_or("<gone>", |node| node.name.as_str());
            log::info!(
                "looking at `{name}` {:.2} units ahead ({} candidates)",
                hit.distance,
                hits.len()
            );
        }
        None => log::info!("looking at empty space"),
    }

    // One frame of rendering: shadow pass first, then the color pass.
    let mut backend = RecordingBackend::default();
    scene.draw_depth(&mut backend);
    scene.draw(&mut backend);
    log::info!(
        "frame recorded: {} depth draws, {} color draws, {} nodes",
        backend.depth_draws.len(),
        backend.draws.len(),
        scene.node_count()
    );

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
