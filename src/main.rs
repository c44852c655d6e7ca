// main.rs — demo panorama viewer driven by the natural panoramic controls

mod renderer;

use renderer::Renderer;

use panorama_controls::{Camera, ControlsConfig, PanoramaControls, Viewport};

use winit::{
    dpi::{LogicalSize, PhysicalPosition},
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use glam::Vec2;
use image::io::Reader as ImageReader;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const DEFAULT_FOV_Y: f32 = 1.2217305; // 70 degrees

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Natural Panoramic Controls")
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)
            .unwrap(),
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone()));
    let size = renderer.size;
    let mut camera = Camera::new(DEFAULT_FOV_Y, size.width as f32 / size.height as f32);
    let mut controls = PanoramaControls::new(ControlsConfig::default());

    // A synthetic grid so drag and momentum are visible before any image is
    // loaded.
    renderer.load_panorama(placeholder_panorama());

    // Interaction state.
    let mut cursor_pos: PhysicalPosition<f64> = PhysicalPosition::new(0.0, 0.0);
    let mut active_touch: Option<u64> = None;

    // FPS bookkeeping.
    let mut last_frame_time = Instant::now();
    let mut frame_count = 0;
    let mut fps = 0.0;

    let mut is_loading = false;

    // Panoramas decode off-thread and arrive over this channel.
    let (tx, rx): (Sender<image::RgbaImage>, Receiver<image::RgbaImage>) = channel();

    // Honor a path given on the command line.
    if let Some(path) = std::env::args().nth(1) {
        is_loading = true;
        start_load_image(PathBuf::from(path), tx.clone());
    }

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if let Ok(rgba) = rx.try_recv() {
            renderer.load_panorama(rgba);
            is_loading = false;
        }

        match event {
            Event::WindowEvent { event, .. } => {
                // Let egui claim the event first so dragging a slider does
                // not also swing the camera.
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.consumed {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        renderer.resize(new_size);
                        camera.aspect = new_size.width as f32 / new_size.height.max(1) as f32;
                    }

                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed {
                            if let Some(VirtualKeyCode::O) = input.virtual_keycode {
                                if let Some(path) = pick_panorama_file() {
                                    is_loading = true;
                                    start_load_image(path, tx.clone());
                                }
                            }
                        }
                    }

                    WindowEvent::MouseInput { state, button, .. } => {
                        if button == MouseButton::Left {
                            match state {
                                ElementState::Pressed => {
                                    controls.pointer_down(Vec2::new(
                                        cursor_pos.x as f32,
                                        cursor_pos.y as f32,
                                    ));
                                }
                                ElementState::Released => {
                                    controls.pointer_up(Instant::now());
                                }
                            }
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor_pos = position;
                        controls.pointer_move(Vec2::new(position.x as f32, position.y as f32));
                    }

                    // Single-contact touch mirrors the mouse; extra fingers
                    // are ignored.
                    WindowEvent::Touch(touch) => {
                        let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                        match touch.phase {
                            TouchPhase::Started if active_touch.is_none() => {
                                active_touch = Some(touch.id);
                                controls.pointer_down(pos);
                            }
                            TouchPhase::Moved if active_touch == Some(touch.id) => {
                                controls.pointer_move(pos);
                            }
                            TouchPhase::Ended | TouchPhase::Cancelled
                                if active_touch == Some(touch.id) =>
                            {
                                active_touch = None;
                                controls.pointer_up(Instant::now());
                            }
                            _ => {}
                        }
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                        };
                        camera.fov_y =
                            (camera.fov_y - scroll * 0.05).clamp(0.35, 2.4);
                    }

                    WindowEvent::DroppedFile(path) => {
                        is_loading = true;
                        start_load_image(path, tx.clone());
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                frame_count += 1;
                let now = Instant::now();
                if now.duration_since(last_frame_time).as_secs_f32() >= 1.0 {
                    fps = frame_count as f32 / now.duration_since(last_frame_time).as_secs_f32();
                    frame_count = 0;
                    last_frame_time = now;
                }

                let viewport =
                    Viewport::new(renderer.size.width as f32, renderer.size.height as f32);
                controls.update(&mut camera, viewport, now);
                renderer.update_camera(&camera);

                let mut next_image = None;
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    draw_ui(
                        ctx,
                        &mut camera,
                        &mut controls,
                        &mut next_image,
                        fps,
                        is_loading,
                    );
                });

                if let Some(path) = next_image {
                    is_loading = true;
                    start_load_image(path, tx.clone());
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                    Err(e) => log::error!("render error: {e:?}"),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}

fn pick_panorama_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &["jpg", "jpeg", "png", "bmp"])
        .pick_file()
}

fn start_load_image(path: PathBuf, tx: Sender<image::RgbaImage>) {
    thread::spawn(move || {
        log::info!("loading panorama from {path:?}");

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                log::error!("failed to open {path:?}: {e}");
                return;
            }
        };
        let reader = BufReader::new(file);

        let img_result = ImageReader::new(reader)
            .with_guessed_format()
            .map_err(image::ImageError::IoError)
            .and_then(|mut r| {
                r.no_limits();
                r.decode()
            });

        match img_result {
            Ok(img) => {
                let rgba = img.to_rgba8();
                log::info!("decoded panorama {}x{}", rgba.width(), rgba.height());
                if tx.send(rgba).is_err() {
                    log::error!("main thread went away before the panorama finished loading");
                }
            }
            Err(e) => log::error!("failed to decode {path:?}: {e}"),
        }
    });
}

/// Equirectangular test pattern: a longitude/latitude grid over a sky and
/// ground gradient, with a marker at yaw zero.
fn placeholder_panorama() -> image::RgbaImage {
    let (w, h) = (1024u32, 512u32);
    image::RgbaImage::from_fn(w, h, |x, y| {
        let lon = x as f32 / w as f32; // 0..1 around
        let lat = y as f32 / h as f32; // 0 at the zenith
        let on_meridian = (lon * 24.0).fract() < 0.02;
        let on_parallel = (lat * 12.0).fract() < 0.04;
        if on_meridian || on_parallel {
            return image::Rgba([230, 230, 230, 255]);
        }
        if (lon - 0.5).abs() < 0.01 && (lat - 0.5).abs() < 0.05 {
            return image::Rgba([220, 60, 60, 255]);
        }
        let sky = (1.0 - lat).powf(1.5);
        image::Rgba([
            (40.0 + 60.0 * sky) as u8,
            (60.0 + 80.0 * sky) as u8,
            (90.0 + 120.0 * sky) as u8,
            255,
        ])
    })
}

fn draw_ui(
    ctx: &egui::Context,
    camera: &mut Camera,
    controls: &mut PanoramaControls,
    next_image: &mut Option<PathBuf>,
    fps: f32,
    is_loading: bool,
) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Open panorama…").clicked() {
                if let Some(path) = pick_panorama_file() {
                    *next_image = Some(path);
                }
            }

            if ui.button("Reset view").clicked() {
                camera.yaw = 0.0;
                camera.pitch = 0.0;
                camera.fov_y = DEFAULT_FOV_Y;
            }

            ui.separator();
            ui.checkbox(&mut controls.enabled, "Controls");

            let config = controls.config_mut();
            ui.checkbox(&mut config.damping_enabled, "Inertia");
            ui.add(
                egui::Slider::new(&mut config.friction, 1.0e-7..=1.0e-5)
                    .logarithmic(true)
                    .text("friction"),
            );
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if is_loading {
                ui.label(egui::RichText::new("Loading…").color(egui::Color32::YELLOW));
                ui.label("|");
            }

            let state = if controls.is_panning() {
                "panning"
            } else if controls.is_decaying() {
                "decaying"
            } else {
                "rest"
            };
            ui.label(state);
            ui.label("|");
            ui.label(format!("Yaw: {:.1}°", camera.yaw.to_degrees()));
            ui.label("|");
            ui.label(format!("Pitch: {:.1}°", camera.pitch.to_degrees()));
            ui.label("|");
            ui.label(format!("FOV: {:.1}°", camera.fov_y.to_degrees()));
            ui.label("|");
            ui.label(format!("FPS: {fps:.1}"));
        });
    });
}
