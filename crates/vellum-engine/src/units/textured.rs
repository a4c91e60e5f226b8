//! Textured instanced shading unit (diffuse only, lit-camera uniform).

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::paint::Color;
use crate::texture::Sample2d;

use super::contract::{sampler_entry, texture_entry, uniform_entry};
use super::{
    BindGroupContract, BindingSlot, ClipVertex, InstanceRaw, LitCameraUniform, ShadingUnit,
    UnitContract,
};

pub const SHADER_SOURCE: &str = include_str!("shaders/textured.wgsl");

pub const CAMERA_SLOT: BindingSlot = BindingSlot::new(0, 0);
pub const TEXTURE_SLOT: BindingSlot = BindingSlot::new(1, 0);
pub const SAMPLER_SLOT: BindingSlot = BindingSlot::new(1, 1);

/// Mesh vertex. `normal` is part of the buffer layout but unused by this unit.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl ModelVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2, // tex_coords
        2 => Float32x3  // normal
    ];

    pub fn new(position: Vec3, tex_coords: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            tex_coords: tex_coords.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub fn contract() -> UnitContract {
    log::debug!("building textured unit contract");
    UnitContract {
        label: "vellum textured",
        source: SHADER_SOURCE,
        vertex_entry: "vs_main",
        fragment_entry: "fs_main",
        vertex_buffers: vec![ModelVertex::layout(), InstanceRaw::layout()],
        bind_groups: vec![
            BindGroupContract {
                group: CAMERA_SLOT.group,
                label: "vellum textured camera bgl",
                entries: vec![uniform_entry::<LitCameraUniform>(
                    CAMERA_SLOT.binding,
                    wgpu::ShaderStages::VERTEX,
                )],
            },
            BindGroupContract {
                group: TEXTURE_SLOT.group,
                label: "vellum textured diffuse bgl",
                entries: vec![
                    texture_entry(TEXTURE_SLOT.binding),
                    sampler_entry(SAMPLER_SLOT.binding),
                ],
            },
        ],
        immediate_size: 0,
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TexturedUnit<'a, S> {
    pub camera: LitCameraUniform,
    pub diffuse: &'a S,
}

impl<'a, S: Sample2d> TexturedUnit<'a, S> {
    pub fn new(camera: LitCameraUniform, diffuse: &'a S) -> Self {
        Self { camera, diffuse }
    }
}

impl<S: Sample2d> ShadingUnit for TexturedUnit<'_, S> {
    type Vertex = ModelVertex;
    type Instance = InstanceRaw;
    type Varyings = Vec2;

    fn contract() -> UnitContract {
        contract()
    }

    fn vertex(&self, vertex: &ModelVertex, instance: &InstanceRaw) -> ClipVertex<Vec2> {
        let world = instance.model_matrix() * Vec3::from_array(vertex.position).extend(1.0);
        ClipVertex {
            clip_position: self.camera.view_proj() * world,
            varyings: Vec2::from_array(vertex.tex_coords),
        }
    }

    fn fragment(&self, tex_coords: &Vec2) -> Color {
        self.diffuse.sample(*tex_coords)
    }
}
