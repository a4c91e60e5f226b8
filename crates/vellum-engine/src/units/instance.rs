use std::f32::consts::FRAC_PI_4;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Per-instance model matrix, uploaded as four column vectors.
///
/// Shared by the flat-color and textured units; occupies vertex locations
/// 5 through 8 on the second vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        5 => Float32x4, // model col 0
        6 => Float32x4, // model col 1
        7 => Float32x4, // model col 2
        8 => Float32x4  // model col 3
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    pub fn identity() -> Self {
        Mat4::IDENTITY.into()
    }

    /// Rebuilds the matrix the same way the WGSL `mat4x4<f32>(c0, c1, c2, c3)` constructor does.
    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl Default for InstanceRaw {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Mat4> for InstanceRaw {
    fn from(m: Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Instance {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Instance {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Scale, then rotate, then translate.
    pub fn to_raw(&self) -> InstanceRaw {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position).into()
    }
}

/// `per_row × per_row` instances on the XZ plane, shifted back by half the row
/// extent so the grid straddles the origin.
///
/// Each instance is tilted 45° about its own direction from the origin. An
/// instance sitting exactly on the origin has no direction and stays unrotated.
pub fn instance_grid(per_row: u32, spacing: f32) -> Vec<Instance> {
    if per_row == 0 {
        log::warn!("instance_grid: zero instances per row, grid is empty");
        return Vec::new();
    }

    let half = per_row as f32 * spacing * 0.5;
    let displacement = Vec3::new(half, 0.0, half);

    (0..per_row)
        .flat_map(|z| {
            (0..per_row).map(move |x| {
                let position = Vec3::new(x as f32 * spacing, 0.0, z as f32 * spacing) - displacement;
                let rotation = position
                    .try_normalize()
                    .map_or(Quat::IDENTITY, |axis| Quat::from_axis_angle(axis, FRAC_PI_4));
                Instance {
                    position,
                    rotation,
                    scale: Vec3::ONE,
                }
            })
        })
        .collect()
}
