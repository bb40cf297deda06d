use cgmath::SquareMatrix;

/// Model-view-projection matrix as bound at `@group(0) @binding(0)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MvpUniform {
    pub mvp: [[f32; 4]; 4],
}

impl MvpUniform {
    pub fn new() -> Self {
        Self {
            mvp: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update(&mut self, mvp: cgmath::Matrix4<f32>) {
        self.mvp = mvp.into();
    }
}

impl Default for MvpUniform {
    fn default() -> Self {
        Self::new()
    }
}
