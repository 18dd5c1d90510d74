use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Orthographic camera over the fixed logical canvas.
///
/// The simulation works in y-down screen pixels with the origin at the
/// top-left, so the projection flips y: logical (0, 0) lands in the top-left
/// corner of the surface regardless of the physical resolution.
pub struct ScreenCamera {
    pub logical_width: f32,
    pub logical_height: f32,
}

impl ScreenCamera {
    pub fn new(logical_width: f32, logical_height: f32) -> Self {
        Self {
            logical_width,
            logical_height,
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let proj = Mat4::orthographic_rh(
            0.0,
            self.logical_width,
            self.logical_height,
            0.0,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
