use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};

/// Perspective camera looking at a target point.
///
/// Right-handed, +Y up, depth mapped to wgpu's `0..1` range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    /// Vertical field of view in radians.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.0, 2.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 45f32.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Uniform block at group 0 / binding 0 of the flat-color unit.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::identity()
    }
}

impl CameraUniform {
    pub fn identity() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    pub fn from_camera(camera: &Camera) -> Self {
        let mut u = Self::identity();
        u.update_view_proj(camera);
        u
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_view_projection_matrix().to_cols_array_2d();
    }

    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}

/// Uniform block at group 0 / binding 0 of the textured unit.
///
/// `view_pos` leads so the matrix lands on a 16-byte boundary without padding.
/// The vertex stage reads only `view_proj`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LitCameraUniform {
    pub view_pos: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl Default for LitCameraUniform {
    fn default() -> Self {
        Self {
            view_pos: [0.0, 0.0, 0.0, 1.0],
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

impl LitCameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        let mut u = Self::default();
        u.update_view_proj(camera);
        u
    }

    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_pos = camera.eye.extend(1.0).to_array();
        self.view_proj = camera.build_view_projection_matrix().to_cols_array_2d();
    }

    #[inline]
    pub fn view_pos(&self) -> Vec4 {
        Vec4::from_array(self.view_pos)
    }

    #[inline]
    pub fn view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_proj)
    }
}
