//! Sprite / UI shading unit.
//!
//! Vertices are already in NDC; the vertex stage does no projection. The
//! fragment stage samples one texture, scales it, and optionally converts the
//! result to grayscale.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use crate::coords::Rect;
use crate::paint::Color;
use crate::texture::Sample2d;

use super::contract::{sampler_entry, texture_entry};
use super::{BindGroupContract, BindingSlot, ClipVertex, Interpolate, ShadingUnit, UnitContract};

pub const SHADER_SOURCE: &str = include_str!("shaders/sprite.wgsl");

pub const TEXTURE_SLOT: BindingSlot = BindingSlot::new(0, 0);
pub const SAMPLER_SLOT: BindingSlot = BindingSlot::new(0, 1);

/// Metadata value written for grayscale sprites. The shader treats any
/// non-zero value the same way.
pub const GRAYSCALE_FLAG: u32 = 1;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2], // NDC
    pub uv: [f32; 2],
    pub alpha_scale: f32,
    pub color_scale: f32,
    pub metadata: u32,
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2, // uv
        2 => Float32,   // alpha_scale
        3 => Float32,   // color_scale
        4 => Uint32     // metadata
    ];

    pub fn new(position: Vec2, uv: Vec2, alpha_scale: f32, color_scale: f32, grayscale: bool) -> Self {
        Self {
            position: position.to_array(),
            uv: uv.to_array(),
            alpha_scale,
            color_scale,
            metadata: if grayscale { GRAYSCALE_FLAG } else { 0 },
        }
    }

    #[inline]
    pub fn grayscale(&self) -> bool {
        self.metadata != 0
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Per-quad scale factors and grayscale switch.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteStyle {
    pub alpha_scale: f32,
    pub color_scale: f32,
    pub grayscale: bool,
}

impl Default for SpriteStyle {
    fn default() -> Self {
        Self {
            alpha_scale: 1.0,
            color_scale: 1.0,
            grayscale: false,
        }
    }
}

impl SpriteStyle {
    const HOVER_DIM: f32 = 0.8;
    const PRESS_DIM: f32 = 0.8;

    /// Button feedback: each active state darkens by 20%.
    pub fn interactive(hovered: bool, pressed: bool) -> Self {
        let mut color_scale = 1.0;
        if hovered {
            color_scale *= Self::HOVER_DIM;
        }
        if pressed {
            color_scale *= Self::PRESS_DIM;
        }
        Self {
            color_scale,
            ..Self::default()
        }
    }

    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }
}

/// Two CCW triangles covering `rect`.
///
/// `rect` is in normalized screen space (`[0, 1]²`, bottom-left origin).
/// `uv_rect` uses texture orientation: its `min` lands on the quad's top-left corner.
pub fn sprite_quad(rect: Rect, uv_rect: Rect, style: SpriteStyle) -> [SpriteVertex; 6] {
    let ndc = rect.normalized().to_ndc();
    let uv = uv_rect.normalized();
    let (p0, p1) = (ndc.min(), ndc.max());
    let (t0, t1) = (uv.min(), uv.max());

    let v = |x: f32, y: f32, u: f32, w: f32| {
        SpriteVertex::new(
            Vec2::new(x, y),
            Vec2::new(u, w),
            style.alpha_scale,
            style.color_scale,
            style.grayscale,
        )
    };

    let bl = v(p0.x, p0.y, t0.x, t1.y);
    let br = v(p1.x, p0.y, t1.x, t1.y);
    let tr = v(p1.x, p1.y, t1.x, t0.y);
    let tl = v(p0.x, p1.y, t0.x, t0.y);

    [bl, br, tr, bl, tr, tl]
}

pub fn contract() -> UnitContract {
    log::debug!("building sprite unit contract");
    UnitContract {
        label: "vellum sprite",
        source: SHADER_SOURCE,
        vertex_entry: "vs_main",
        fragment_entry: "fs_main",
        vertex_buffers: vec![SpriteVertex::layout()],
        bind_groups: vec![BindGroupContract {
            group: TEXTURE_SLOT.group,
            label: "vellum sprite texture bgl",
            entries: vec![
                texture_entry(TEXTURE_SLOT.binding),
                sampler_entry(SAMPLER_SLOT.binding),
            ],
        }],
        immediate_size: 0,
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteVaryings {
    pub uv: Vec2,
    pub alpha_scale: f32,
    pub color_scale: f32,
    pub metadata: u32,
}

impl Interpolate for SpriteVaryings {
    fn interpolate(v: [&Self; 3], w: [f32; 3]) -> Self {
        Self {
            uv: Vec2::interpolate(v.map(|v| &v.uv), w),
            alpha_scale: f32::interpolate(v.map(|v| &v.alpha_scale), w),
            color_scale: f32::interpolate(v.map(|v| &v.color_scale), w),
            metadata: u32::interpolate(v.map(|v| &v.metadata), w),
        }
    }
}

/// Sprite unit with its texture/sampler pair bound.
#[derive(Debug, Copy, Clone)]
pub struct SpriteUnit<'a, S> {
    pub texture: &'a S,
}

impl<'a, S: Sample2d> SpriteUnit<'a, S> {
    pub fn new(texture: &'a S) -> Self {
        Self { texture }
    }
}

impl<S: Sample2d> ShadingUnit for SpriteUnit<'_, S> {
    type Vertex = SpriteVertex;
    type Instance = ();
    type Varyings = SpriteVaryings;

    fn contract() -> UnitContract {
        contract()
    }

    fn vertex(&self, vertex: &SpriteVertex, _: &()) -> ClipVertex<SpriteVaryings> {
        let [x, y] = vertex.position;
        ClipVertex {
            clip_position: Vec4::new(x, y, 0.0, 1.0),
            varyings: SpriteVaryings {
                uv: Vec2::from_array(vertex.uv),
                alpha_scale: vertex.alpha_scale,
                color_scale: vertex.color_scale,
                metadata: vertex.metadata,
            },
        }
    }

    fn fragment(&self, input: &SpriteVaryings) -> Color {
        let scaled = self
            .texture
            .sample(input.uv)
            .scaled(input.color_scale, input.alpha_scale);
        if input.metadata != 0 {
            scaled.grayscale()
        } else {
            scaled
        }
    }
}
