//! Renderable geometry - bridges scene data to GPU buffers
//!
//! Sphere meshes are converted to [`MeshVertex`] buffers, and the depth
//! slider is turned into flat overlay triangles in window pixels. Tick labels
//! are drawn as seven-segment digits, so no font is needed.

use wgpu::util::DeviceExt;
use earthsim_core::Slider;
use earthsim_math::SphereMesh;
use crate::pipeline::{MeshVertex, OverlayVertex};

/// Convert a sphere mesh to GPU vertices
pub fn mesh_vertices(mesh: &SphereMesh) -> Vec<MeshVertex> {
    mesh.vertices.iter().map(MeshVertex::from).collect()
}

/// An indexed mesh uploaded to the GPU
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload a sphere mesh
    pub fn from_sphere(device: &wgpu::Device, mesh: &SphereMesh, label: &str) -> Self {
        let vertices = mesh_vertices(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded sphere '{}': {} vertices, {} triangles",
            label,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        }
    }
}

/// Colors and sizes for drawing the slider
#[derive(Clone, Debug, PartialEq)]
pub struct SliderStyle {
    pub track_color: [f32; 4],
    pub tick_color: [f32; 4],
    pub thumb_color: [f32; 4],
    /// Track bar thickness in pixels
    pub track_thickness: f32,
    /// Tick mark length below the track
    pub tick_length: f32,
    pub tick_thickness: f32,
    pub thumb_width: f32,
    pub thumb_height: f32,
    pub label_color: [f32; 4],
    /// Digit height in pixels
    pub label_height: f32,
    /// Segment thickness in pixels
    pub label_stroke: f32,
    /// Space between the tick mark and its label
    pub label_gap: f32,
}

impl Default for SliderStyle {
    fn default() -> Self {
        Self {
            track_color: [0.55, 0.55, 0.6, 0.9],
            tick_color: [0.8, 0.8, 0.8, 0.9],
            thumb_color: [0.95, 0.95, 0.95, 1.0],
            track_thickness: 4.0,
            tick_length: 6.0,
            tick_thickness: 1.0,
            thumb_width: 12.0,
            thumb_height: 20.0,
            label_color: [0.8, 0.8, 0.8, 0.9],
            label_height: 12.0,
            label_stroke: 1.5,
            label_gap: 4.0,
        }
    }
}

/// Push an axis-aligned rectangle as two triangles
fn push_rect(out: &mut Vec<OverlayVertex>, x0: f32, y0: f32, x1: f32, y1: f32, color: [f32; 4]) {
    let v = |x: f32, y: f32| OverlayVertex { position: [x, y], color };
    out.extend_from_slice(&[v(x0, y0), v(x0, y1), v(x1, y1), v(x0, y0), v(x1, y1), v(x1, y0)]);
}

/// Lit segments per digit, bits a..g = top, upper right, lower right,
/// bottom, lower left, upper left, middle
const DIGIT_SEGMENTS: [u8; 10] = [
    0b011_1111, // 0
    0b000_0110, // 1
    0b101_1011, // 2
    0b100_1111, // 3
    0b110_0110, // 4
    0b110_1101, // 5
    0b111_1101, // 6
    0b000_0111, // 7
    0b111_1111, // 8
    0b110_1111, // 9
];

/// Middle segment only
const MINUS_SEGMENTS: u8 = 0b100_0000;

/// Text for a tick label: whole numbers without decimals, else one decimal
pub fn tick_label(value: f32) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-3 {
        // Avoid "-0"
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Horizontal advance of one label character
fn glyph_advance(c: char, style: &SliderStyle) -> f32 {
    let spacing = style.label_stroke * 2.0;
    match c {
        '.' => style.label_stroke + spacing,
        _ => style.label_height * 0.5 + spacing,
    }
}

/// Width of a label, without trailing spacing
fn label_width(text: &str, style: &SliderStyle) -> f32 {
    let total: f32 = text.chars().map(|c| glyph_advance(c, style)).sum();
    (total - style.label_stroke * 2.0).max(0.0)
}

fn push_glyph(out: &mut Vec<OverlayVertex>, c: char, x0: f32, y0: f32, style: &SliderStyle) {
    let color = style.label_color;
    let (w, h, t) = (style.label_height * 0.5, style.label_height, style.label_stroke);

    if c == '.' {
        push_rect(out, x0, y0 + h - t, x0 + t, y0 + h, color);
        return;
    }

    let mask = match c {
        '-' => MINUS_SEGMENTS,
        _ => match c.to_digit(10) {
            Some(d) => DIGIT_SEGMENTS[d as usize],
            None => return,
        },
    };
    let mid = y0 + h / 2.0;
    let segments = [
        (x0, y0, x0 + w, y0 + t),
        (x0 + w - t, y0, x0 + w, mid),
        (x0 + w - t, mid, x0 + w, y0 + h),
        (x0, y0 + h - t, x0 + w, y0 + h),
        (x0, mid, x0 + t, y0 + h),
        (x0, y0, x0 + t, mid),
        (x0, mid - t / 2.0, x0 + w, mid + t / 2.0),
    ];
    for (bit, &(ax, ay, bx, by)) in segments.iter().enumerate() {
        if mask & (1 << bit) != 0 {
            push_rect(out, ax, ay, bx, by, color);
        }
    }
}

/// Overlay triangles for a label centered on `center_x` with its top at `top`
pub fn label_geometry(text: &str, center_x: f32, top: f32, style: &SliderStyle) -> Vec<OverlayVertex> {
    let mut out = Vec::new();
    let mut x = center_x - label_width(text, style) / 2.0;
    for c in text.chars() {
        push_glyph(&mut out, c, x, top, style);
        x += glyph_advance(c, style);
    }
    out
}

/// Overlay triangles for a slider: track, tick marks, labels, then the thumb
pub fn slider_geometry(slider: &Slider, style: &SliderStyle) -> Vec<OverlayVertex> {
    let ticks = if slider.show_ticks { slider.ticks() } else { Vec::new() };
    let mut out = Vec::with_capacity(6 * (ticks.len() + 2));

    let cy = slider.track_y();
    let half_track = style.track_thickness / 2.0;
    push_rect(
        &mut out,
        slider.x,
        cy - half_track,
        slider.x + slider.width,
        cy + half_track,
        style.track_color,
    );

    let tick_top = cy + half_track + 2.0;
    let half_tick = style.tick_thickness / 2.0;
    for tick in &ticks {
        push_rect(
            &mut out,
            tick.x - half_tick,
            tick_top,
            tick.x + half_tick,
            tick_top + style.tick_length,
            style.tick_color,
        );
    }

    if slider.show_tick_labels {
        let label_top = tick_top + style.tick_length + style.label_gap;
        for tick in &ticks {
            out.extend(label_geometry(&tick_label(tick.value), tick.x, label_top, style));
        }
    }

    let tx = slider.thumb_x();
    push_rect(
        &mut out,
        tx - style.thumb_width / 2.0,
        cy - style.thumb_height / 2.0,
        tx + style.thumb_width / 2.0,
        cy + style.thumb_height / 2.0,
        style.thumb_color,
    );

    out
}
