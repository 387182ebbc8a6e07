//! Red Runner -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- consume fixed-dt slices: state machine,
//!      background scroll, player movement, blink effect
//!   3. Rebuild the canvas mesh from the live nodes, stream it to the GPU
//!   4. Issue batched draw calls, composite the egui layer, present
//!
//! The game-state machine gates what each tick does: the parallax
//! background scrolls in every state, the player only while `Playing`,
//! the title text and blink only on `MainTitle`. Presentation pacing is
//! the surface's Fifo mode; the simulation never sleeps on its own.

mod assets;
mod background;
mod node;
mod player;
mod scene;

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{Assets, MusicPlayer};
use background::Background;
use node::{Node, StaticRenderer};
use player::Player;
use redrun_core::input::{InputState, Key};
use redrun_core::state::GameState;
use redrun_core::time::{Blink, TimeState};
use redrun_devtools::{OverlayStats, TitleScreen, UiLayer};
use redrun_platform::window::PlatformConfig;
use redrun_render::canvas::RED;
use redrun_render::{Canvas, DrawCall, GpuContext, ScreenSpace, SpriteHandle, SpritePipeline, SpriteVertex};
use scene::load_parallax_from_path;

const SCENE_PATH: &str = "assets/scenes/parallax.json";
const PLAYER_RUN_KEY: &str = "black-run";
const MENU_FACE_KEY: &str = "menuFace";
const MENU_FACE_POS: (f32, f32) = (20.0, -70.0);
// NOTE: this key is absent from the music table ("sovietMenuMusic" is the
// loaded key). The lookup failure is reported at startup and the game
// runs without music; do not quietly rename either side.
const MENU_THEME_KEY: &str = "sovietMenuTheme";
const MENU_THEME_VOLUME: f32 = 0.4;
const BLINK_INTERVAL: f32 = 0.2;
const TITLE_HEADING: &str = "Stalin.io";
const TITLE_PROMPT: &str = "Pressione Enter para começar!";
const TITLE_FOOTER: &str = "CCCP, 19XX";

/// All mutable engine state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
///
/// Ownership is split into three conceptual groups:
///  - **Core systems** (time, input, ui) -- updated every frame
///  - **Game state** (state machine, blink, player, background) -- the
///    asset store outlives every node that borrows from it by key
///  - **GPU mesh state** (canvas, buffers, bind groups) -- rebuilt from
///    the nodes each frame; buffers grow power-of-two, never shrink
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    sprite_pipeline: SpritePipeline,
    ui: UiLayer,

    assets: Assets,
    music: MusicPlayer,
    game_state: GameState,
    blink: Blink,
    player: Player,
    background: Background,
    menu_face: SpriteHandle,
    menu_face_renderer: StaticRenderer,

    canvas: Canvas,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    screen_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
}

impl EngineState {
    fn new(window: Arc<Window>, config: &PlatformConfig) -> Self {
        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new();
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let ui = UiLayer::new(&gpu.device, gpu.surface_format, &window);

        // Startup failures are fatal: there is no recovery path for a
        // missing render resource once the loop is running.
        let assets = Assets::load(&gpu.device, &gpu.queue, &sprite_pipeline)
            .unwrap_or_else(|err| panic!("Failed to load assets: {err}"));

        let mut music =
            MusicPlayer::new().unwrap_or_else(|err| panic!("Failed to initialize audio: {err}"));
        if let Err(err) = music.play(&assets, MENU_THEME_KEY, MENU_THEME_VOLUME) {
            log::error!("Menu theme unavailable: {err}");
        }

        let scene_path = Path::new(SCENE_PATH);
        let scene = load_parallax_from_path(scene_path).unwrap_or_else(|err| {
            panic!("Failed to load parallax scene '{}': {err}", scene_path.display())
        });
        let background = Background::from_scene(&scene, |key| assets.sprite(key))
            .unwrap_or_else(|err| panic!("Parallax scene '{}': {err}", scene.scene_id));
        log::info!(
            "Parallax scene loaded: {} ({} layers)",
            scene.scene_id,
            background.layer_count()
        );

        let player_sprite = assets
            .sprite(PLAYER_RUN_KEY)
            .unwrap_or_else(|err| panic!("Player sprite unavailable: {err}"));
        let player = Player::new(player_sprite, config.height);

        let menu_face = assets
            .sprite(MENU_FACE_KEY)
            .unwrap_or_else(|err| panic!("Title face unavailable: {err}"));

        // The window is fixed-size, so the projection uniform is written
        // exactly once.
        let screen = ScreenSpace::new(gpu.size.0, gpu.size.1);
        let screen_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Screen Uniform Buffer"),
                contents: bytemuck::cast_slice(&[screen.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let screen_bind_group = sprite_pipeline.create_screen_bind_group(&gpu.device, &screen_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        Self {
            window,
            gpu,
            time,
            input,
            sprite_pipeline,
            ui,
            assets,
            music,
            game_state: GameState::default(),
            blink: Blink::new(BLINK_INTERVAL),
            player,
            background,
            menu_face,
            menu_face_renderer: StaticRenderer { scale: 1.0 },
            canvas: Canvas::new(),
            vertex_buffer,
            index_buffer,
            screen_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
        }
    }

    /// One fixed simulation step: state dispatch, node updates, then the
    /// state transition for next tick.
    fn step(&mut self) {
        let now = self.time.now();
        let policy = self.game_state.policy();

        self.background.update(now, &self.input);
        if policy.run_gameplay {
            self.player.update(now, &self.input);
        }
        if policy.show_title {
            self.blink.tick(now);
        }

        let confirm = self.input.is_just_pressed(Key::Enter);
        let next = self.game_state.step(confirm);
        if next != self.game_state {
            log::info!("State transition: {} -> {}", self.game_state, next);
            self.game_state = next;
        }
    }

    /// Rebuild the canvas from the live nodes and stream it into the GPU
    /// buffers.
    fn rebuild_mesh(&mut self) {
        self.canvas.clear();
        self.background.render(&mut self.canvas);

        let policy = self.game_state.policy();
        if policy.run_gameplay {
            self.player.render(&mut self.canvas);
        }
        if policy.show_title {
            self.menu_face_renderer.render_tinted(
                &mut self.canvas,
                &self.menu_face,
                Vec2::new(MENU_FACE_POS.0, MENU_FACE_POS.1),
                RED,
            );
        }

        self.ensure_mesh_capacity(self.canvas.vertices().len(), self.canvas.indices().len());
        if !self.canvas.vertices().is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(self.canvas.vertices()),
            );
        }
        if !self.canvas.indices().is_empty() {
            self.gpu.queue.write_buffer(
                &self.index_buffer,
                0,
                bytemuck::cast_slice(self.canvas.indices()),
            );
        }
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
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = redrun_platform::window::create_window(event_loop, &self.config);
        self.state = Some(EngineState::new(window, &self.config));
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

        let egui_consumed = state.ui.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
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
                while state.time.should_step() {
                    if state.input.is_just_pressed(Key::Escape) {
                        event_loop.exit();
                        return;
                    }
                    if state.input.is_just_pressed(Key::F3) {
                        state.ui.toggle_debug();
                    }
                    state.step();
                }

                // Render phase reads finalized simulation state.
                state.rebuild_mesh();

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let policy = state.game_state.policy();
                let title = if policy.show_title {
                    Some(TitleScreen {
                        heading: TITLE_HEADING,
                        prompt: TITLE_PROMPT,
                        footer: TITLE_FOOTER,
                        prompt_primary: state.blink.primary_phase(),
                    })
                } else {
                    None
                };
                let stats = OverlayStats {
                    draw_calls: state.canvas.draw_calls().len() as u32,
                    texture_binds: count_texture_binds(state.canvas.draw_calls()) as u32,
                    sprite_count: state.canvas.quad_count() as u32,
                    state_label: state.game_state.label().to_string(),
                    music_label: state.music.status_label(),
                };
                let (egui_primitives, egui_textures_delta) =
                    state
                        .ui
                        .prepare(&state.window, &state.time, title, Some(stats));

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
                    let mut last_bound_texture_key: Option<&Arc<str>> = None;
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.screen_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    for draw in state.canvas.draw_calls() {
                        let Some(bind_group) = state.assets.texture_bind_group(&draw.texture_key)
                        else {
                            log::warn!("Skipping draw with unknown texture '{}'", draw.texture_key);
                            continue;
                        };
                        let need_rebind = match last_bound_texture_key {
                            Some(last) => **last != *draw.texture_key,
                            None => true,
                        };
                        if need_rebind {
                            render_pass.set_bind_group(1, bind_group, &[]);
                            last_bound_texture_key = Some(&draw.texture_key);
                        }
                        render_pass.draw_indexed(
                            draw.index_start..(draw.index_start + draw.index_count),
                            0,
                            0..1,
                        );
                    }
                }

                state.ui.upload(
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
                            label: Some("UI Render Pass"),
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
                        .ui
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.ui.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();

                // Only clear edge-triggered input after at least one fixed
                // step consumed it, so a press landing on a zero-step frame
                // is not silently lost.
                if state.time.steps_this_frame > 0 {
                    state.input.end_frame();
                }
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
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

fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0usize;
    let mut current: Option<&str> = None;
    for draw in draw_calls {
        let key: &str = &draw.texture_key;
        if current != Some(key) {
            current = Some(key);
            binds += 1;
        }
    }
    binds
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Red Runner starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
