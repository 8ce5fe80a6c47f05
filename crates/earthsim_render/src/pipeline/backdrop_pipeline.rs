//! Unlit pipeline for the background image quad

use wgpu::util::DeviceExt;
use earthsim_math::{mat4, Mat4, Vec3};

use super::body_pipeline::DEPTH_FORMAT;
use super::types::BackdropVertex;
use crate::texture::Texture;

/// Build the two triangles of a backdrop quad
///
/// The quad is `width` x `height` pixels, centred on the node origin at Z =
/// `depth`, then placed by `model`. UV (0, 0) is the image's top-left corner.
pub fn backdrop_quad(width: f32, height: f32, depth: f32, model: Mat4) -> [BackdropVertex; 6] {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let corner = |x: f32, y: f32, u: f32, v: f32| BackdropVertex {
        position: mat4::transform_point(model, Vec3::new(x, y, depth)).to_array(),
        uv: [u, v],
    };
    let tl = corner(-hw, -hh, 0.0, 0.0);
    let tr = corner(hw, -hh, 1.0, 0.0);
    let bl = corner(-hw, hh, 0.0, 1.0);
    let br = corner(hw, hh, 1.0, 1.0);
    [tl, bl, br, tl, br, tr]
}

/// GPU resources for the backdrop
pub struct BackdropResources {
    vertex_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture: Texture,
}

impl BackdropResources {
    /// Source image size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.texture.image_size
    }
}

/// Render pipeline for the backdrop
pub struct BackdropPipeline {
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
}

impl BackdropPipeline {
    /// Create a new backdrop pipeline sharing the frame bind group layout
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Backdrop Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Backdrop Pipeline Layout"),
            bind_group_layouts: &[frame_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Backdrop Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/backdrop.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Backdrop Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Self::vertex_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self { pipeline, texture_layout }
    }

    /// Get the vertex buffer layout for BackdropVertex
    pub(crate) fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BackdropVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                // uv: vec2<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        }
    }

    /// Create the backdrop quad for an uploaded image
    ///
    /// The quad takes the source image's pixel size, even when the texture
    /// was downscaled to fit the device.
    pub fn create_backdrop(
        &self,
        device: &wgpu::Device,
        texture: Texture,
        depth: f32,
        model: Mat4,
    ) -> BackdropResources {
        let (w, h) = texture.image_size;
        let vertices = backdrop_quad(w as f32, h as f32, depth, model);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Backdrop Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Backdrop Bind Group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        BackdropResources { vertex_buffer, bind_group, texture }
    }

    /// Draw the backdrop into an open scene pass
    pub fn draw(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        frame_bind_group: &wgpu::BindGroup,
        backdrop: &BackdropResources,
    ) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, frame_bind_group, &[]);
        pass.set_bind_group(1, &backdrop.bind_group, &[]);
        pass.set_vertex_buffer(0, backdrop.vertex_buffer.slice(..));
        pass.draw(0..6, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_buffer_layout_stride() {
        let layout = BackdropPipeline::vertex_buffer_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<BackdropVertex>() as u64);
    }

    #[test]
    fn test_quad_centered_at_depth() {
        let quad = backdrop_quad(400.0, 200.0, 5000.0, mat4::IDENTITY);
        let min_x = quad.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_y = quad.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(min_x, -200.0);
        assert_eq!(max_y, 100.0);
        assert!(quad.iter().all(|v| v.position[2] == 5000.0));
    }

    #[test]
    fn test_quad_uv_top_left() {
        // Y points down, so the top-left corner has the smallest x and y
        let quad = backdrop_quad(10.0, 10.0, 0.0, mat4::IDENTITY);
        let tl = quad.iter().find(|v| v.uv == [0.0, 0.0]).unwrap();
        assert_eq!(tl.position, [-5.0, -5.0, 0.0]);
        let br = quad.iter().find(|v| v.uv == [1.0, 1.0]).unwrap();
        assert_eq!(br.position, [5.0, 5.0, 0.0]);
    }

    #[test]
    fn test_quad_follows_model() {
        let model = mat4::translation(Vec3::new(100.0, 0.0, 0.0));
        let quad = backdrop_quad(10.0, 10.0, 1.0, model);
        assert_eq!(quad[0].position, [95.0, -5.0, 1.0]);
    }
}
