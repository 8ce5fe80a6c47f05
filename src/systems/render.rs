//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Body, backdrop and overlay pipelines
//! - Per-body GPU resources kept in step with the scene graph
//! - Frame rendering

use std::sync::Arc;
use winit::window::Window;
use earthsim_core::{Material, Mat4, NodeKey, NodeKind, SceneGraph, Slider};
use earthsim_math::SphereMesh;
use earthsim_render::{
    camera::ScreenCamera,
    context::RenderContext,
    pipeline::{
        BackdropPipeline, BackdropResources, BodyMaps, BodyPipeline, BodyResources,
        FrameUniforms, ObjectUniforms, OverlayPipeline,
    },
    texture::load_or_fallback,
    GpuMesh, MapKind, SliderStyle, Texture, slider_geometry,
};
use crate::config::{AssetsConfig, CameraConfig, RenderingConfig};

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface or setup error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    body_pipeline: BodyPipeline,
    backdrop_pipeline: BackdropPipeline,
    overlay_pipeline: OverlayPipeline,
    /// Camera in logical pixels, so the scene layout ignores display scaling
    camera: ScreenCamera,
    scale_factor: f64,
    bodies: Vec<(NodeKey, BodyResources)>,
    backdrop: Option<BackdropResources>,
    render_config: RenderingConfig,
    assets: AssetsConfig,
    slider_style: SliderStyle,
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(
        window: Arc<Window>,
        render_config: RenderingConfig,
        camera_config: &CameraConfig,
        assets: AssetsConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let scale_factor = window.scale_factor();
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))
            .map_err(|e| RenderError::Other(e.to_string()))?;

        let (width, height) = (context.size.width, context.size.height);
        let body_pipeline = BodyPipeline::new(
            &context.device,
            &context.queue,
            context.config.format,
            width,
            height,
        );
        let backdrop_pipeline = BackdropPipeline::new(
            &context.device,
            context.config.format,
            body_pipeline.frame_layout(),
        );
        let overlay_pipeline = OverlayPipeline::new(&context.device, context.config.format);

        let (logical_w, logical_h) = logical_size(width, height, scale_factor);
        let camera = ScreenCamera::new(logical_w, logical_h).with_projection(
            camera_config.fov,
            camera_config.near,
            camera_config.far,
        );

        Ok(Self {
            context,
            body_pipeline,
            backdrop_pipeline,
            overlay_pipeline,
            camera,
            scale_factor,
            bodies: Vec::new(),
            backdrop: None,
            render_config,
            assets,
            slider_style: SliderStyle::default(),
        })
    }

    /// Create GPU resources for every sphere and backdrop in the graph
    pub fn load_scene(&mut self, graph: &SceneGraph) {
        self.bodies.clear();
        self.backdrop = None;

        for (key, node) in graph.iter() {
            let label = node.name.clone().unwrap_or_else(|| node.kind.label().to_string());
            match &node.kind {
                NodeKind::Sphere { radius, divisions, material } => {
                    let mesh = SphereMesh::new(*radius, *divisions);
                    let gpu_mesh = GpuMesh::from_sphere(&self.context.device, &mesh, &label);
                    let maps = self.load_maps(material, &label);
                    let body = self.body_pipeline.create_body(&self.context.device, gpu_mesh, maps, &label);
                    self.bodies.push((key, body));
                }
                NodeKind::Backdrop { image, depth } => {
                    if self.backdrop.is_some() {
                        log::warn!("Ignoring extra backdrop '{}'", label);
                        continue;
                    }
                    let model = graph.world_matrix(key).unwrap_or(earthsim_math::mat4::IDENTITY);
                    let texture = self.load_texture(image, MapKind::Backdrop, &label);
                    let backdrop = self.backdrop_pipeline.create_backdrop(
                        &self.context.device,
                        texture,
                        *depth,
                        model,
                    );
                    let (w, h) = backdrop.size();
                    log::info!("Backdrop '{}' is {}x{} at depth {}", image, w, h, depth);
                    self.backdrop = Some(backdrop);
                }
                NodeKind::Group | NodeKind::PointLight { .. } => {}
            }
        }

        log::info!("Loaded {} bodies", self.bodies.len());
    }

    fn load_texture(&self, path: &str, kind: MapKind, label: &str) -> Texture {
        let image = load_or_fallback(&self.assets.resolve(path), kind.fallback_color());
        Texture::from_image(&self.context.device, &self.context.queue, &image, kind, label)
    }

    fn load_maps(&self, material: &Material, label: &str) -> BodyMaps {
        let load = |path: &Option<String>, kind: MapKind| {
            path.as_deref().map(|p| self.load_texture(p, kind, label))
        };
        BodyMaps {
            diffuse: load(&material.diffuse_map, MapKind::Diffuse),
            specular: load(&material.specular_map, MapKind::Specular),
            bump: load(&material.bump_map, MapKind::Bump),
            self_illumination: load(&material.self_illumination_map, MapKind::SelfIllumination),
        }
    }

    /// Upload uniforms for bodies whose transform or material changed
    ///
    /// Returns the number of bodies updated. Clears every dirty flag.
    pub fn sync(&mut self, graph: &mut SceneGraph) -> usize {
        let mut updated = 0;
        for (key, body) in &self.bodies {
            let Some(node) = graph.get(*key) else { continue };
            if !node.is_dirty() {
                continue;
            }
            let (Some(world), Some(material)) = (graph.world_matrix(*key), node.material()) else {
                continue;
            };
            let uniforms = body_uniforms(world, material, body.map_flags());
            self.body_pipeline.update_body(&self.context.queue, body, &uniforms);
            updated += 1;
        }
        graph.clear_all_dirty();
        updated
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.body_pipeline.ensure_depth_texture(&self.context.device, width, height);
        let (w, h) = logical_size(width, height, self.scale_factor);
        self.camera.resize(w, h);
    }

    /// Handle a display scale change
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
        let (w, h) = logical_size(self.context.size.width, self.context.size.height, scale_factor);
        self.camera.resize(w, h);
    }

    /// Reconfigure the surface after it was lost
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Render a single frame
    pub fn render_frame(
        &mut self,
        graph: &SceneGraph,
        slider: Option<&Slider>,
    ) -> Result<(), RenderError> {
        let frame = frame_uniforms(&self.camera, graph);
        self.body_pipeline.update_frame(&self.context.queue, &frame);

        let overlay = slider
            .map(|s| slider_geometry(s, &self.slider_style))
            .unwrap_or_default();
        let (w, h) = self.camera.size();
        self.overlay_pipeline
            .update(&self.context.device, &self.context.queue, (w, h), &overlay);

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let bg = &self.render_config.clear_color;
        let clear = wgpu::Color {
            r: bg[0] as f64,
            g: bg[1] as f64,
            b: bg[2] as f64,
            a: bg[3] as f64,
        };

        {
            let mut pass = self.body_pipeline.begin_pass(&mut encoder, &view, clear);
            if let Some(backdrop) = &self.backdrop {
                self.backdrop_pipeline
                    .draw(&mut pass, self.body_pipeline.frame_bind_group(), backdrop);
            }
            self.body_pipeline
                .draw(&mut pass, self.bodies.iter().map(|(_, body)| body));
        }

        self.overlay_pipeline.render(&mut encoder, &view);

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}

/// Physical surface size in logical pixels, at least 1x1
fn logical_size(width: u32, height: u32, scale_factor: f64) -> (u32, u32) {
    let scale = if scale_factor.is_finite() && scale_factor > 0.0 { scale_factor } else { 1.0 };
    let fit = |n: u32| ((n as f64 / scale).round() as u32).max(1);
    (fit(width), fit(height))
}

/// Object uniforms for a body from its world matrix and material
fn body_uniforms(world: Mat4, material: &Material, map_flags: [f32; 4]) -> ObjectUniforms {
    let s = material.effective_specular_color();
    ObjectUniforms {
        diffuse_color: material.diffuse_color,
        specular: [s[0], s[1], s[2], material.specular_power],
        map_flags,
        ..ObjectUniforms::from_world(world)
    }
}

/// Frame uniforms: camera, and the first point light if any
fn frame_uniforms(camera: &ScreenCamera, graph: &SceneGraph) -> FrameUniforms {
    let eye = camera.eye();
    let mut frame = FrameUniforms {
        view_proj: camera.view_projection(),
        camera_pos: [eye.x, eye.y, eye.z, 1.0],
        ..FrameUniforms::default()
    };
    frame.set_light(
        graph
            .lights()
            .next()
            .map(|light| (light.position.to_array(), light.color)),
    );
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthsim_core::{Node, Vec3};
    use earthsim_math::mat4;

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
    }

    #[test]
    fn test_logical_size() {
        assert_eq!(logical_size(1400, 1000, 1.0), (1400, 1000));
        assert_eq!(logical_size(2800, 2000, 2.0), (1400, 1000));
        assert_eq!(logical_size(2100, 1500, 1.5), (1400, 1000));
        assert_eq!(logical_size(0, 0, 2.0), (1, 1));
        assert_eq!(logical_size(800, 600, 0.0), (800, 600));
    }

    #[test]
    fn test_logical_camera_keeps_layout_on_hidpi() {
        // On a 2x display the 1400x1000 logical window is 2800x2000 physical;
        // the rig center still projects to the middle of the window.
        let (w, h) = logical_size(2800, 2000, 2.0);
        let camera = ScreenCamera::new(w, h);
        let (px, py, _) = camera.project(Vec3::new(700.0, 500.0, 0.0)).unwrap();
        assert!((px - 700.0).abs() < 1e-2 && (py - 500.0).abs() < 1e-2, "{} {}", px, py);
    }

    #[test]
    fn test_body_uniforms_from_material() {
        let material = Material::from_rgb(0.5, 0.25, 1.0).with_specular_color(0.1, 0.2, 0.3);
        let world = mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let u = body_uniforms(world, &material, [1.0, 0.0, 0.0, 1.0]);

        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(u.diffuse_color, material.diffuse_color);
        assert_eq!(&u.specular[..3], &[0.1, 0.2, 0.3]);
        assert_eq!(u.specular[3], material.specular_power);
        assert_eq!(u.map_flags, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_frame_without_light_uses_headlight() {
        let graph = SceneGraph::new();
        let camera = ScreenCamera::new(1400, 1000);
        let frame = frame_uniforms(&camera, &graph);
        assert_eq!(frame.light_pos[3], 0.0);
        assert_eq!(frame.camera_pos[..3], camera.eye().to_array());
    }

    #[test]
    fn test_frame_uses_world_light_position() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_root(
            Node::group().with_transform(earthsim_core::Transform::from_translation(Vec3::new(10.0, 0.0, 0.0))),
        );
        graph.add_child(parent, Node::point_light([0.5, 0.5, 0.5])).unwrap();

        let frame = frame_uniforms(&ScreenCamera::new(800, 600), &graph);
        assert_eq!(frame.light_pos, [10.0, 0.0, 0.0, 1.0]);
        assert_eq!(frame.light_color, [0.5, 0.5, 0.5, 1.0]);
    }
}
