//! Flat-color instanced shading unit.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::paint::Color;

use super::contract::uniform_entry;
use super::{
    BindGroupContract, BindingSlot, CameraUniform, ClipVertex, InstanceRaw, ShadingUnit,
    UnitContract,
};

pub const SHADER_SOURCE: &str = include_str!("shaders/flat.wgsl");

pub const CAMERA_SLOT: BindingSlot = BindingSlot::new(0, 0);

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FlatVertex {
    pub position: [f32; 3],
}

impl FlatVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn new(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FlatVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Immediate data block: the fill color, straight alpha.
///
/// Host usage: `pass.set_immediates(0, flat_color.as_bytes())`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FlatColor {
    pub color: [f32; 4],
}

impl FlatColor {
    pub const SIZE: u32 = std::mem::size_of::<FlatColor>() as u32;

    pub fn new(color: Color) -> Self {
        Self {
            color: color.to_array(),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl From<Color> for FlatColor {
    fn from(c: Color) -> Self {
        Self::new(c)
    }
}

pub fn contract() -> UnitContract {
    log::debug!("building flat-color unit contract");
    UnitContract {
        label: "vellum flat",
        source: SHADER_SOURCE,
        vertex_entry: "vs_main",
        fragment_entry: "fs_main",
        vertex_buffers: vec![FlatVertex::layout(), InstanceRaw::layout()],
        bind_groups: vec![BindGroupContract {
            group: CAMERA_SLOT.group,
            label: "vellum flat camera bgl",
            entries: vec![uniform_entry::<CameraUniform>(
                CAMERA_SLOT.binding,
                wgpu::ShaderStages::VERTEX,
            )],
        }],
        immediate_size: FlatColor::SIZE,
    }
}

/// Flat-color unit with its camera uniform and immediate color bound.
#[derive(Debug, Copy, Clone)]
pub struct FlatColorUnit {
    pub camera: CameraUniform,
    pub color: FlatColor,
}

impl FlatColorUnit {
    pub fn new(camera: CameraUniform, color: impl Into<FlatColor>) -> Self {
        Self {
            camera,
            color: color.into(),
        }
    }
}

impl ShadingUnit for FlatColorUnit {
    type Vertex = FlatVertex;
    type Instance = InstanceRaw;
    type Varyings = ();

    fn contract() -> UnitContract {
        contract()
    }

    fn vertex(&self, vertex: &FlatVertex, instance: &InstanceRaw) -> ClipVertex<()> {
        let world = instance.model_matrix() * Vec3::from_array(vertex.position).extend(1.0);
        ClipVertex {
            clip_position: self.camera.view_proj() * world,
            varyings: (),
        }
    }

    fn fragment(&self, _: &()) -> Color {
        Color::from_array(self.color.color)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec4};

    use super::*;
    use crate::units::{reflect, shade_triangle_at, Camera, Instance, Interpolation};

    fn red_unit(camera: CameraUniform) -> FlatColorUnit {
        FlatColorUnit::new(camera, Color::new(1.0, 0.0, 0.0, 1.0))
    }

    #[test]
    fn record_sizes() {
        assert_eq!(FlatVertex::layout().array_stride, 12);
        assert_eq!(FlatColor::SIZE, 16);
        assert_eq!(FlatColor::new(Color::white()).as_bytes().len(), 16);
    }

    #[test]
    fn identity_camera_and_instance_pass_positions_through() {
        let unit = red_unit(CameraUniform::identity());
        let out = unit.vertex(&FlatVertex::new(Vec3::new(0.5, -0.25, 0.75)), &InstanceRaw::identity());
        assert_eq!(out.clip_position, Vec4::new(0.5, -0.25, 0.75, 1.0));
    }

    #[test]
    fn clip_is_view_proj_times_model_times_position() {
        let camera = Camera {
            eye: Vec3::new(2.0, 3.0, 6.0),
            ..Camera::default()
        };
        let instance = Instance::at(Vec3::new(1.0, 0.0, -2.0)).to_raw();
        let unit = red_unit(CameraUniform::from_camera(&camera));
        let p = Vec3::new(0.2, 0.4, 0.6);

        let out = unit.vertex(&FlatVertex::new(p), &instance);
        let expected = camera.build_view_projection_matrix()
            * Mat4::from_translation(Vec3::new(1.0, 0.0, -2.0))
            * p.extend(1.0);
        assert!(out.clip_position.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn every_fragment_is_the_immediate_color() {
        let camera = CameraUniform::from_camera(&Camera::default());
        let unit = red_unit(camera);
        let tri = [
            FlatVertex::new(Vec3::new(-1.0, 0.0, 0.0)),
            FlatVertex::new(Vec3::new(1.0, 0.0, 0.0)),
            FlatVertex::new(Vec3::new(0.0, 1.0, -1.0)),
        ];
        let instance = Instance::at(Vec3::new(0.0, 0.0, -3.0)).to_raw();

        for bary in [[1.0, 0.0, 0.0], [0.2, 0.3, 0.5], [0.0, 0.1, 0.9]] {
            for mode in [Interpolation::Linear, Interpolation::PerspectiveCorrect] {
                let c = shade_triangle_at(&unit, [&tri[0], &tri[1], &tri[2]], &instance, bary, mode).unwrap();
                assert_eq!(c, Color::new(1.0, 0.0, 0.0, 1.0));
            }
        }
    }

    #[test]
    fn immediate_bytes_are_rgba_f32() {
        let fc = FlatColor::new(Color::new(1.0, 0.0, 0.0, 1.0));
        let floats: &[f32] = bytemuck::cast_slice(fc.as_bytes());
        assert_eq!(floats, &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn wgsl_matches_contract() {
        reflect::assert_contract_matches(&contract());
    }
}
