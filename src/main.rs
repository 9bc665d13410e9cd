use rastra::engine::{CullMode, Engine, RenderMode};
use rastra::window::{
    FpsCounter, FrameLimiter, Key, Window, WindowEvent, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use rastra::Mesh;

const MOVE_SPEED: f32 = 3.0;
const TURN_SPEED: f32 = 1.5;

fn main() {
    if let Err(e) = run() {
        eprintln!("rastra: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut window = Window::new("rastra", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut engine = Engine::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    load_scene(&mut engine)?;

    let mut limiter = FrameLimiter::new(&window);
    let mut fps_counter = FpsCounter::new();
    let mut is_running = true;

    while is_running {
        let delta_time = limiter.wait_and_get_delta(&window) as f32 / 1000.0;

        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => is_running = false,
                WindowEvent::Resize(w, h) => {
                    engine.resize(w, h);
                    window.resize(w, h)?;
                }
                WindowEvent::KeyPress(key) => process_key(&mut engine, key, delta_time),
            }
        }

        engine.update();
        engine.render();
        window.present(engine.frame_buffer())?;

        if let Some(fps) = fps_counter.tick() {
            window.set_title(&format!("rastra - {:.1} fps", fps));
        }
    }

    Ok(())
}

/// Load the scene from command-line arguments: `rastra [mesh.obj [texture.png]]`.
/// Without arguments a built-in cube is shown.
fn load_scene(engine: &mut Engine) -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();

    match args.get(1) {
        Some(obj_path) => {
            let texture = match args.get(2) {
                Some(texture_path) => Some(
                    engine
                        .load_texture(texture_path)
                        .map_err(|e| e.to_string())?,
                ),
                None => None,
            };
            let mesh = engine.load_mesh(obj_path).map_err(|e| e.to_string())?;
            mesh.set_texture(texture);
        }
        None => {
            engine.add_mesh(Mesh::cube());
        }
    }

    Ok(())
}

fn process_key(engine: &mut Engine, key: Key, delta_time: f32) {
    match key {
        Key::Num1 => engine.set_render_mode(RenderMode::WireframeVertices),
        Key::Num2 => engine.set_render_mode(RenderMode::Wireframe),
        Key::Num3 => engine.set_render_mode(RenderMode::Filled),
        Key::Num4 => engine.set_render_mode(RenderMode::FilledWireframe),
        Key::Num5 => engine.set_render_mode(RenderMode::Textured),
        Key::Num6 => engine.set_render_mode(RenderMode::TexturedWireframe),
        Key::C => engine.set_cull_mode(CullMode::Backface),
        Key::X => engine.set_cull_mode(CullMode::None),
        Key::W | Key::S => {
            let camera = engine.camera_mut();
            let sign = if key == Key::W { 1.0 } else { -1.0 };
            camera.set_forward_velocity(camera.direction() * (sign * MOVE_SPEED * delta_time));
            let velocity = camera.forward_velocity();
            camera.update_position(velocity);
        }
        Key::A => engine.camera_mut().rotate_yaw(-TURN_SPEED * delta_time),
        Key::D => engine.camera_mut().rotate_yaw(TURN_SPEED * delta_time),
        Key::Up => engine.camera_mut().rotate_pitch(-TURN_SPEED * delta_time),
        Key::Down => engine.camera_mut().rotate_pitch(TURN_SPEED * delta_time),
    }
}
