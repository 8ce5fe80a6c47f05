//! EarthSim - Earth and Moon viewer
//!
//! A textured Earth and a self-lit Moon orbiting it in front of a galaxy
//! backdrop. Drag to rotate, scroll or use the slider to move in depth.

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use earthsim::config::{AppConfig, SliderConfig, ViewConfig};
use earthsim::input::{InputAction, InputMapper};
use earthsim::scene::{BuiltScene, SceneBuilder};
use earthsim::systems::{AnimationSystem, RenderError, RenderSystem, WindowSystem};
use earthsim_core::{GalaxyView, Scene, Slider, Vec3};
use earthsim_input::{OrbitController, SliderControl, ViewControl};

/// Stands in for the slider when it is hidden, so presses always rotate
struct HiddenSlider;

impl SliderControl for HiddenSlider {
    fn contains(&self, _x: f32, _y: f32) -> bool {
        false
    }

    fn value_at(&self, _x: f32) -> f32 {
        0.0
    }
}

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    scene: BuiltScene,
    slider: Slider,
    controller: OrbitController,
    animation: AnimationSystem,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let scene = Scene::load(&config.scene.path).unwrap_or_else(|e| {
            log::warn!(
                "Failed to load scene '{}': {}. Using the built-in scene.",
                config.scene.path,
                e
            );
            Scene::earth_moon()
        });

        let view = build_view(&config.view);
        let slider = build_slider(&config.slider, view.depth_range());

        let built = SceneBuilder::from_scene(&scene, view)
            .with_animation_paused(config.animation.start_paused)
            .build();

        log::info!(
            "Built scene '{}' with {} nodes",
            scene.name,
            built.graph.node_count()
        );

        // Configure controller from config
        let controller = OrbitController::new()
            .with_drag_sensitivity(config.view.drag_sensitivity)
            .with_scroll_pixels_per_line(config.view.scroll_pixels_per_line)
            .with_depth_step(config.view.depth_step)
            .with_rotate_step(config.view.rotate_step);

        let animation = AnimationSystem::new(&config.animation);

        Self {
            config,
            window: None,
            render: None,
            scene: built,
            slider,
            controller,
            animation,
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetView => {
                self.scene.view.reset();
                log::info!("View reset");
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::ToggleAnimation => {
                let paused = self.scene.animation.toggle_pause();
                self.animation.reset_clock();
                if let Some(window) = &self.window {
                    window.update_title(paused);
                }
                log::info!("Animation {}", if paused { "paused" } else { "running" });
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let scene = &mut self.scene;
        self.animation
            .update(&mut scene.graph, &scene.animation, &mut scene.view, scene.galaxy);
        self.slider.set_value(scene.view.depth());

        let Some(render) = &mut self.render else { return };
        render.sync(&mut scene.graph);

        let slider = self.config.slider.visible.then_some(&self.slider);
        match render.render_frame(&scene.graph, slider) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => render.reconfigure(),
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn slider_control(slider: &Slider, visible: bool) -> &dyn SliderControl {
    if visible {
        slider
    } else {
        &HiddenSlider
    }
}

/// Convert pixel scroll deltas to logical pixels; line deltas pass through
fn logical_scroll(delta: MouseScrollDelta, scale_factor: f64) -> MouseScrollDelta {
    match delta {
        MouseScrollDelta::PixelDelta(p) => {
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(p.x / scale_factor, p.y / scale_factor))
        }
        line => line,
    }
}

fn build_view(config: &ViewConfig) -> GalaxyView {
    let [x, y, z] = config.center;
    GalaxyView::new(Vec3::new(x, y, z)).with_depth_range(config.depth_min, config.depth_max)
}

fn build_slider(config: &SliderConfig, (min, max): (f32, f32)) -> Slider {
    Slider::new(min, max)
        .with_layout(config.x, config.y, config.width)
        .with_ticks(config.major_tick_unit, config.show_ticks)
        .with_tick_labels(config.show_tick_labels)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = RenderSystem::new(
            window.window().clone(),
            self.config.rendering.clone(),
            &self.config.camera,
            self.config.assets.clone(),
            self.config.window.vsync,
        );
        let mut render = match render {
            Ok(render) => render,
            Err(e) => {
                log::error!("Failed to initialise rendering: {}", e);
                event_loop.exit();
                return;
            }
        };
        render.load_scene(&self.scene.graph);

        window.update_title(self.scene.animation.is_paused());
        window.request_redraw();
        self.animation.reset_clock();
        self.window = Some(window);
        self.render = Some(render);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render {
                    render.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(action, event_loop);
                        return;
                    }
                    self.controller
                        .process_keyboard(key, event.state, &mut self.scene.view);
                }
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(render) = &mut self.render {
                    render.set_scale_factor(scale_factor);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                // Layout, slider and camera all work in logical pixels
                let position = position.to_logical::<f64>(self.scale_factor());
                let slider = slider_control(&self.slider, self.config.slider.visible);
                self.controller
                    .process_cursor_moved(position.x, position.y, &mut self.scene.view, slider);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let slider = slider_control(&self.slider, self.config.slider.visible);
                self.controller
                    .process_mouse_button(button, state, &mut self.scene.view, slider);
            }

            WindowEvent::Focused(false) => {
                self.controller.cancel_drag();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = logical_scroll(delta, self.scale_factor());
                self.controller.process_scroll(delta, &mut self.scene.view);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

fn main() {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    // Initialize logging; RUST_LOG still overrides the configured level
    env_logger::Builder::new()
        .parse_filters(&config.debug.log_level)
        .parse_default_env()
        .init();
    log::info!("Starting EarthSim");

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create and run application
    let mut app = App::new(config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
