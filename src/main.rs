//! Headless capture run over the synthetic sky.
//!
//! Usage: `omnicam [options.toml]`
//!
//! Drives the projection manager with the CPU backend for a few seconds of
//! scripted input (a drag, a zoom, a lens switch), then writes the last
//! output image to `omnicam-preview.png`. With `[persistence] enabled =
//! true` every frame is recorded as well.

use std::path::Path;

use glam::{Quat, Vec3};
use omnicam::backend::{SoftwareBackend, SyntheticSky};
use omnicam::camera::Viewpoint;
use omnicam::input::{InputEvent, InputProcessor, MouseButton};
use omnicam::{OmniError, Options, ProjectionManager};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const FRAMES: u32 = 120;
const DT: f32 = 1.0 / 60.0;

/// Input events for frame `frame` of the scripted run.
fn script(frame: u32) -> Vec<InputEvent> {
    let center = (WIDTH as f32 * 0.5, HEIGHT as f32 * 0.5);
    match frame {
        10 => vec![
            InputEvent::CursorMoved {
                x: center.0,
                y: center.1,
            },
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            },
        ],
        11..=49 => {
            let t = (frame - 10) as f32 / 40.0;
            vec![InputEvent::CursorMoved {
                x: center.0 + 300.0 * t,
                y: center.1 - 120.0 * t,
            }]
        }
        50 => vec![InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        }],
        60 => vec![InputEvent::KeyPressed { key: "Tab".into() }],
        70..=79 => vec![InputEvent::Scroll { delta: 2.0 }],
        100 => vec![InputEvent::KeyPressed { key: "KeyH".into() }],
        _ => Vec::new(),
    }
}

fn load_options() -> Result<Options, OmniError> {
    if let Some(path) = std::env::args().nth(1) {
        log::info!("loading options from {path}");
        return Options::load(Path::new(&path));
    }
    let mut options = Options::default();
    options.capture.cubemap_size = 256;
    options.capture.output_size = 256;
    Ok(options)
}

fn main() -> Result<(), OmniError> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let options = load_options()?;
    let mut input =
        InputProcessor::with_key_bindings(options.keybindings.clone());
    let backend = SoftwareBackend::new(SyntheticSky::default());
    let mut manager = ProjectionManager::new(backend, options)
        .with_viewpoint(Viewpoint::new(Vec3::ZERO, Quat::IDENTITY));

    manager.on_start(WIDTH, HEIGHT);
    input.handle_event(InputEvent::Resized {
        width: WIDTH,
        height: HEIGHT,
    });

    for frame in 0..FRAMES {
        for event in script(frame) {
            input.handle_event(event);
        }
        let tick = input.take_frame();
        let step = manager.on_tick(DT, &tick).dt;
        manager.viewpoint_mut().position.z += step;
        let report = manager.on_late_tick();
        if let Some(Err(e)) = report.persisted {
            log::warn!("frame {}: {e}", report.frame);
        }
    }

    log::info!(
        "{} frames, lens {}, fov {:?}, {:.1} fps",
        manager.frame(),
        manager.lens_kind(),
        manager.fov(),
        manager.clock().fps()
    );
    if let Some(output) = manager.output() {
        output.image().save("omnicam-preview.png")?;
        log::info!("wrote omnicam-preview.png");
    }
    manager.on_stop();
    Ok(())
}
