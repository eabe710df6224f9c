//! Perspective camera for the corridor view

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Mat4, Quat, Vec3};

/// Perspective camera carried by the rig.
///
/// Only the rig writes `position`; everything else reads snapshots.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    /// Fixed orientation; the rig never turns the camera
    pub rotation: Quat,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near: 50.0,
            far: 100_000.0,
        }
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Tilt the view up by `pitch` degrees about the local X axis
    pub fn with_pitch_degrees(mut self, pitch: f32) -> Self {
        self.rotation = Quat::from_rotation_x(pitch.to_radians());
        self
    }

    /// World to camera space
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation.conjugate()) * Mat4::from_translation(-self.position)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Look direction; -Z before pitch
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Keep the projection matched to the output size. Zero height is ignored.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 45.0, 16.0 / 9.0)
    }
}

/// Per-frame camera block as laid out in the renderer's uniform buffer.
/// `position` is padded to 16 bytes for vec3 alignment.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
    pub near: f32,
    pub far: f32,
    pub _pad2: [f32; 2],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: camera.position.to_array(),
            _pad: 0.0,
            near: camera.near,
            far: camera.far,
            _pad2: [0.0; 2],
        }
    }
}
