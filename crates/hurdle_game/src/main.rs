//! Hurdle -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All simulation
//! runs inside `RedrawRequested` using a **fixed-timestep** model (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- consume fixed-dt slices for deterministic simulation
//!   3. Rebuild the quad mesh from session state
//!   4. Upload camera uniform, issue the draw call, composite egui overlay
//!
//! The simulation itself is pure data in `hurdle_core`; this binary owns the
//! window, the GPU surface, and the mapping from raw key events to the two
//! edge-triggered flags the session consumes per step.
//!
//! Hot reload: the tuning config is watched via mtime polling and reloaded at
//! frame boundaries. A reload starts a fresh run, so every run plays out under
//! one consistent tuning from its first tick to its last.

use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use hurdle_core::config::{load_config_from_path, ConfigWatcher, RunnerConfig};
use hurdle_core::input::{InputState, Key};
use hurdle_core::session::{GameSession, SessionInput};
use hurdle_core::time::TimeState;
use hurdle_overlay::{Overlay, OverlayStats};
use hurdle_platform::window::PlatformConfig;
use hurdle_render::{GpuContext, QuadPipeline, QuadVertex, ScreenCamera};

const CONFIG_PATH: &str = "assets/config/runner.json";

const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;
const GROUND_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const ACTOR_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const EYE_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const OBSTACLE_COLOR: [f32; 4] = [0.545, 0.271, 0.075, 1.0];
const HITBOX_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 0.35];

struct QuadSpec {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    color: [f32; 4],
}

/// All mutable engine state lives here. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (time, input, camera) -- updated every frame
///  - **Session** (simulation state + tuning config) -- hot-reloadable from disk
///  - **GPU resources** (vertex/index/camera buffers) -- rebuilt when the scene changes
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: ScreenCamera,
    quad_pipeline: QuadPipeline,
    overlay: Overlay,

    // --- Hot-reloadable content -------------------------------------------------
    config_path: std::path::PathBuf,
    config_watcher: ConfigWatcher,
    session: GameSession,
    show_hitboxes: bool,
    paused: bool,
    single_step_requested: bool,

    // --- Per-frame GPU mesh state -----------------------------------------------
    // The quad mesh is rebuilt on the CPU whenever the simulation steps, then
    // streamed into these GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    index_count: u32,
    quad_count: u32,
}

impl EngineState {
    fn new(window: Arc<Window>, config: RunnerConfig) -> Self {
        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new(config.fixed_dt());
        let input = InputState::new();
        let camera = ScreenCamera::new(config.screen_width, config.screen_height);
        let quad_pipeline = QuadPipeline::new(&gpu.device, gpu.surface_format);
        let overlay = Overlay::new(&gpu.device, gpu.surface_format, &window);

        let config_path = std::path::PathBuf::from(CONFIG_PATH);
        let config_watcher = ConfigWatcher::new(config_path.clone());
        let session = GameSession::new(config).unwrap_or_else(|err| {
            panic!("Failed to start a run: {}", err);
        });

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = quad_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            time,
            input,
            camera,
            quad_pipeline,
            overlay,
            config_path,
            config_watcher,
            session,
            show_hitboxes: false,
            paused: false,
            single_step_requested: false,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            index_count: 0,
            quad_count: 0,
        };

        state.rebuild_scene_mesh();
        state
    }

    fn reload_config(&mut self, reason: &str) {
        let config = match load_config_from_path(&self.config_path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Config reload failed ({reason}): {err}");
                return;
            }
        };
        let session = match GameSession::new(config) {
            Ok(session) => session,
            Err(err) => {
                log::error!("Config reload failed ({reason}): {err}");
                return;
            }
        };

        // Rebuild only what the new tuning actually touches. The window keeps
        // its startup size; a changed logical canvas simply maps onto it.
        if session.config().target_tick_rate != self.session.config().target_tick_rate {
            self.time = TimeState::new(session.config().fixed_dt());
        }
        self.camera = ScreenCamera::new(
            session.config().screen_width,
            session.config().screen_height,
        );
        log::info!(
            "Config reloaded ({reason}), starting a fresh run (previous score {})",
            self.session.score()
        );
        self.session = session;
    }

    fn rebuild_scene_mesh(&mut self) {
        let (vertices, indices) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.quad_count = (vertices.len() / 4) as u32;
        self.index_count = indices.len() as u32;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn build_mesh(&self) -> (Vec<QuadVertex>, Vec<u32>) {
        let config = self.session.config();
        let obstacle_count = self.session.obstacles().len();
        let quad_estimate = 5
            + obstacle_count
            + if self.show_hitboxes {
                1 + obstacle_count
            } else {
                0
            };
        let mut vertices = Vec::with_capacity(quad_estimate * 4);
        let mut indices = Vec::with_capacity(quad_estimate * 6);

        // Ground band across the full width.
        add_quad(
            &mut vertices,
            &mut indices,
            QuadSpec {
                x: 0.0,
                y: config.ground_top(),
                width: config.screen_width,
                height: config.ground_height,
                color: GROUND_COLOR,
            },
        );

        // Actor body with an eye and two legs. The legs hang below the body
        // box into the ground band; only the body box collides.
        let actor = self.session.actor();
        add_quad(
            &mut vertices,
            &mut indices,
            QuadSpec {
                x: actor.x,
                y: actor.y,
                width: actor.width,
                height: actor.height,
                color: ACTOR_COLOR,
            },
        );
        add_quad(
            &mut vertices,
            &mut indices,
            QuadSpec {
                x: actor.x + 7.0,
                y: actor.y + 7.0,
                width: 6.0,
                height: 6.0,
                color: EYE_COLOR,
            },
        );
        add_quad(
            &mut vertices,
            &mut indices,
            QuadSpec {
                x: actor.x + 5.0,
                y: actor.y + actor.height,
                width: 8.0,
                height: 10.0,
                color: ACTOR_COLOR,
            },
        );
        add_quad(
            &mut vertices,
            &mut indices,
            QuadSpec {
                x: actor.x + 25.0,
                y: actor.y + actor.height,
                width: 8.0,
                height: 10.0,
                color: ACTOR_COLOR,
            },
        );

        for obstacle in self.session.obstacles() {
            add_quad(
                &mut vertices,
                &mut indices,
                QuadSpec {
                    x: obstacle.x,
                    y: obstacle.y,
                    width: obstacle.width,
                    height: obstacle.height,
                    color: OBSTACLE_COLOR,
                },
            );
        }

        // Hitbox overlay renders the exact boxes the collision check reads,
        // as translucent quads on top of everything.
        if self.show_hitboxes {
            let actor_box = actor.bounding_box();
            add_quad(
                &mut vertices,
                &mut indices,
                QuadSpec {
                    x: actor_box.x,
                    y: actor_box.y,
                    width: actor_box.w,
                    height: actor_box.h,
                    color: HITBOX_COLOR,
                },
            );
            for obstacle in self.session.obstacles() {
                let obstacle_box = obstacle.bounding_box();
                add_quad(
                    &mut vertices,
                    &mut indices,
                    QuadSpec {
                        x: obstacle_box.x,
                        y: obstacle_box.y,
                        width: obstacle_box.w,
                        height: obstacle_box.h,
                        color: HITBOX_COLOR,
                    },
                );
            }
        }

        (vertices, indices)
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }
}

struct App {
    platform_config: PlatformConfig,
    runner_config: RunnerConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        let config_path = std::path::PathBuf::from(CONFIG_PATH);
        let runner_config = if config_path.exists() {
            load_config_from_path(&config_path).unwrap_or_else(|err| {
                panic!(
                    "Failed to load initial config '{}': {}",
                    config_path.display(),
                    err
                );
            })
        } else {
            log::warn!(
                "Config '{}' not found, using built-in defaults",
                config_path.display()
            );
            RunnerConfig::default()
        };

        let (width, height) = runner_config.window_size();
        let platform_config = PlatformConfig {
            width,
            height,
            ..PlatformConfig::default()
        };

        Self {
            platform_config,
            runner_config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = hurdle_platform::window::create_window(event_loop, &self.platform_config);
        log::info!(
            "Window created: {}x{}",
            self.platform_config.width,
            self.platform_config.height
        );
        self.state = Some(EngineState::new(window, self.runner_config.clone()));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(engine_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(engine_key),
                            ElementState::Released => state.input.key_up(engine_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.time.begin_frame();
                let mut scene_changed = false;

                while state.time.should_step() {
                    if state.input.is_just_pressed(Key::Escape) {
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::F3) {
                        state.overlay.toggle_debug();
                    }
                    if state.input.is_just_pressed(Key::F4) {
                        state.show_hitboxes = !state.show_hitboxes;
                        scene_changed = true;
                        log::info!(
                            "Hitboxes: {}",
                            if state.show_hitboxes { "ON" } else { "OFF" }
                        );
                    }

                    if state.config_watcher.should_reload() {
                        state.reload_config("file watcher");
                        scene_changed = true;
                    }

                    // Skip simulation update when paused (unless single-step requested)
                    if state.paused && !state.single_step_requested {
                        break;
                    }
                    state.single_step_requested = false;

                    let session_input = SessionInput {
                        jump_pressed: state.input.is_just_pressed(Key::Space)
                            || state.input.is_just_pressed(Key::Up)
                            || state.input.is_just_pressed(Key::W),
                        restart_pressed: state.input.is_just_pressed(Key::R),
                    };
                    let was_game_over = state.session.is_game_over();
                    state.session.tick(&session_input);

                    // A restart spends the press. Left alone, a frame that
                    // runs several fixed steps would read the same edge again
                    // on the next step and turn it into a jump on the fresh run.
                    if was_game_over && !state.session.is_game_over() {
                        for key in [Key::Space, Key::Up, Key::W, Key::R] {
                            state.input.consume_press(key);
                        }
                    }
                }

                if scene_changed || state.time.steps_this_frame > 0 {
                    state.rebuild_scene_mesh();
                }

                // Render phase reads finalized simulation state from this frame.
                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state.overlay.prepare(
                        &state.window,
                        &state.time,
                        &OverlayStats {
                            score: state.session.score(),
                            game_over: state.session.is_game_over(),
                            first_run: state.session.is_first_run(),
                            obstacle_count: state.session.obstacles().len(),
                            spawn_interval: state.session.spawn_interval(),
                            spawn_counter: state.session.spawn_counter(),
                            quad_count: state.quad_count,
                            paused: state.paused,
                            hitboxes_visible: state.show_hitboxes,
                        },
                    );

                // Handle overlay button actions
                if overlay_actions.toggle_pause {
                    state.paused = !state.paused;
                    log::info!(
                        "Simulation {}",
                        if state.paused { "PAUSED" } else { "RESUMED" }
                    );
                }
                if overlay_actions.single_step {
                    state.single_step_requested = true;
                }
                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.quad_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    if state.index_count > 0 {
                        render_pass.draw_indexed(0..state.index_count, 0, 0..1);
                    }
                }

                state.overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                // Only clear edge-triggered input (just_pressed / just_released)
                // after at least one fixed step consumed it. Otherwise a press
                // that lands on a frame with 0 simulation steps is silently lost.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<QuadVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn add_quad(vertices: &mut Vec<QuadVertex>, indices: &mut Vec<u32>, spec: QuadSpec) {
    let base_index = vertices.len() as u32;

    vertices.push(QuadVertex {
        position: [spec.x, spec.y],
        color: spec.color,
    });
    vertices.push(QuadVertex {
        position: [spec.x + spec.width, spec.y],
        color: spec.color,
    });
    vertices.push(QuadVertex {
        position: [spec.x + spec.width, spec.y + spec.height],
        color: spec.color,
    });
    vertices.push(QuadVertex {
        position: [spec.x, spec.y + spec.height],
        color: spec.color,
    });

    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::Space => Some(Key::Space),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::F4 => Some(Key::F4),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Hurdle starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
