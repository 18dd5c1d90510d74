//! HUD and debug window rendered via egui on top of the game scene.
//!
//! The HUD (score and the two prompts) runs every frame; the debug window
//! only runs while `debug_visible` is true (toggled by F3). egui event
//! handling is always active so the debug window can intercept clicks when
//! it is shown.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use hurdle_core::time::TimeState;
use winit::window::Window;

/// Snapshot of session and renderer state for one overlay frame.
#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub score: u32,
    pub game_over: bool,
    /// Intro prompt gate: no score yet and the run is still live.
    pub first_run: bool,
    pub obstacle_count: usize,
    pub spawn_interval: u32,
    pub spawn_counter: u32,
    pub quad_count: u32,
    /// Whether simulation is paused
    pub paused: bool,
    /// Whether collision boxes are being drawn
    pub hitboxes_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayActions {
    /// User clicked the pause toggle
    pub toggle_pause: bool,
    /// User clicked the single-step button (advance one fixed step while paused)
    pub single_step: bool,
}

pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl Overlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    pub fn toggle_debug(&mut self) {
        self.debug_visible = !self.debug_visible;
        log::info!(
            "Debug window: {}",
            if self.debug_visible { "ON" } else { "OFF" }
        );
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        stats: &OverlayStats,
    ) -> (
        Vec<egui::ClippedPrimitive>,
        egui::TexturesDelta,
        OverlayActions,
    ) {
        let mut actions = OverlayActions::default();
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            draw_hud(ctx, stats);

            if self.debug_visible {
                egui::Window::new("Debug")
                    .default_pos([10.0, 50.0])
                    .show(ctx, |ui| {
                        ui.label(format!("FPS: {:.1}", time.smoothed_fps));
                        ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
                        ui.label(format!("Steps this frame: {}", time.steps_this_frame));
                        ui.label(format!("Total steps: {}", time.fixed_step_count));
                        ui.label(format!("Frame: {}", time.frame_count));

                        ui.separator();
                        ui.label(format!("Score: {}", stats.score));
                        ui.label(format!(
                            "Phase: {}",
                            if stats.game_over { "game over" } else { "active" }
                        ));
                        ui.label(format!("Obstacles: {}", stats.obstacle_count));
                        ui.label(format!(
                            "Spawn: {}/{} ticks",
                            stats.spawn_counter, stats.spawn_interval
                        ));
                        ui.label(format!("Quads: {}", stats.quad_count));
                        if stats.hitboxes_visible {
                            ui.label("Hitboxes: ON (F4)");
                        }

                        ui.separator();
                        ui.horizontal(|ui| {
                            let pause_label = if stats.paused { "Resume" } else { "Pause" };
                            if ui.button(pause_label).clicked() {
                                actions.toggle_pause = true;
                            }
                            if stats.paused && ui.button("Step").clicked() {
                                actions.single_step = true;
                            }
                        });
                        if stats.paused {
                            ui.label("\u{23f8} PAUSED");
                        }
                    });
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta, actions)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn draw_hud(ctx: &egui::Context, stats: &OverlayStats) {
    egui::Area::new(egui::Id::new("hud_score"))
        .fixed_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("Score: {}", stats.score))
                    .size(24.0)
                    .color(egui::Color32::BLACK),
            );
        });

    if stats.game_over {
        egui::Area::new(egui::Id::new("hud_game_over"))
            .anchor(egui::Align2::CENTER_CENTER, [0.0, -20.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("GAME OVER!")
                            .size(36.0)
                            .strong()
                            .color(egui::Color32::RED),
                    );
                    ui.label(
                        egui::RichText::new("Press SPACE to restart")
                            .size(20.0)
                            .color(egui::Color32::BLACK),
                    );
                });
            });
    } else if stats.first_run {
        egui::Area::new(egui::Id::new("hud_intro"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 40.0])
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new("Press SPACE to jump!")
                        .size(24.0)
                        .color(egui::Color32::BLACK),
                );
            });
    }
}
